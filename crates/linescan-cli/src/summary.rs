use std::path::Path;

use console::Style;
use linescan_core::session::AnalysisSettings;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn format_peak(peak: Option<f64>) -> String {
    match peak {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "no structure selected".to_string(),
    }
}

pub fn print_analysis_summary(folder: &Path, settings: &AnalysisSettings) {
    let s = Styles::new();
    let result = &settings.result;
    let (height, width) = settings.frame.dim();

    println!();
    println!("  {}", s.title.apply_to("Linescan Analysis"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(17)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Folder"), s.path.apply_to(folder.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(settings.all_frames.frame_count())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{width}x{height}"))
    );
    let selection = match settings.frame_index {
        Some(i) => format!("frame {}/{}", i + 1, settings.all_frames.frame_count()),
        None => "average".to_string(),
    };
    println!("  {:<14}{}", s.label.apply_to("Analyzed"), s.value.apply_to(selection));
    if let Some(ref ts) = settings.acquisition.timestamp {
        println!("  {:<14}{}", s.label.apply_to("Acquired"), s.value.apply_to(ts));
    }
    println!();

    // Preprocessing
    println!("  {}", s.header.apply_to("Preprocessing"));
    match (settings.floor_values, settings.floor_percentile) {
        (Some((red, green)), Some(p)) => println!(
            "    {:<12}{}",
            s.label.apply_to("Floor"),
            s.value.apply_to(format!("{p}th percentile (red {red}, green {green})"))
        ),
        (Some((value, _)), None) => println!(
            "    {:<12}{}",
            s.label.apply_to("Floor"),
            s.value.apply_to(format!("{value}"))
        ),
        _ => println!("    {:<12}{}", s.label.apply_to("Floor"), s.disabled.apply_to("off")),
    }
    if settings.filter_width_px > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Filter"),
            s.value.apply_to(format!(
                "{} px ({:.2} ms)",
                settings.filter_width_px, settings.filter_time_ms
            ))
        );
    } else {
        println!("    {:<12}{}", s.label.apply_to("Filter"), s.disabled.apply_to("off"));
    }
    println!();

    // Ranges
    println!("  {}", s.header.apply_to("Ranges"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Baseline"),
        s.value.apply_to(format!(
            "rows {}-{}",
            settings.baseline.min(),
            settings.baseline.max()
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Structure"),
        s.value.apply_to(format!(
            "columns {}-{}",
            settings.structure.min(),
            settings.structure.max()
        ))
    );
    println!();

    // Results
    println!("  {}", s.header.apply_to("Results"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Baseline G/R"),
        s.value.apply_to(format!("{:.4}", result.baseline_ratio))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Peak ΔG/R"),
        s.value.apply_to(format_peak(result.peak_value))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Peak (time)"),
        s.value.apply_to(format_peak(result.time_course.peak_value))
    );
    println!();
}
