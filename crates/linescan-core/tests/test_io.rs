mod common;

use linescan_core::error::LinescanError;
use linescan_core::io::{load_channel_image, load_linescan_folder, FolderContents};

use common::write_channel_png;

#[test]
fn test_load_channel_keeps_raw_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("single_Ch1_000001.png");
    write_channel_png(&path, 6, 4, 1234);

    let frame = load_channel_image(&path).unwrap();
    assert_eq!(frame.dim(), (4, 6));
    assert_eq!(frame.data[[3, 5]], 1234.0);
}

#[test]
fn test_folder_pairs_channels_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    for (i, value) in [(2, 300u16), (1, 100)] {
        write_channel_png(&dir.path().join(format!("LineScan_Cycle0000{i}_Ch1_000001.png")), 5, 3, value);
        write_channel_png(&dir.path().join(format!("LineScan_Cycle0000{i}_Ch2_000001.png")), 5, 3, value / 2);
    }
    std::fs::write(dir.path().join("LineScan.xml"), "<xml/>").unwrap();

    let contents = FolderContents::scan(dir.path()).unwrap();
    assert_eq!(contents.frame_count().unwrap(), 2);

    let loaded = std::cell::Cell::new(0);
    let frames = contents.load_frames(|n| loaded.set(n)).unwrap();
    assert_eq!(loaded.get(), 2);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].red().data[[0, 0]], 100.0);
    assert_eq!(frames[0].green().data[[0, 0]], 50.0);
    assert_eq!(frames[1].red().data[[2, 4]], 300.0);
}

#[test]
fn test_unpaired_channels_error() {
    let dir = tempfile::tempdir().unwrap();
    write_channel_png(&dir.path().join("a_Ch1_1.png"), 2, 2, 1);
    write_channel_png(&dir.path().join("b_Ch1_2.png"), 2, 2, 1);
    write_channel_png(&dir.path().join("a_Ch2_1.png"), 2, 2, 1);

    let result = load_linescan_folder(dir.path(), |_| {});
    assert!(matches!(result, Err(LinescanError::InvalidFolder(_))));
}

#[test]
fn test_empty_folder_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_linescan_folder(dir.path(), |_| {});
    assert!(matches!(result, Err(LinescanError::InvalidFolder(_))));
}

#[test]
fn test_channel_size_mismatch_reports_frame() {
    let dir = tempfile::tempdir().unwrap();
    write_channel_png(&dir.path().join("x_Ch1_1.png"), 4, 4, 1);
    write_channel_png(&dir.path().join("x_Ch2_1.png"), 4, 4, 1);
    write_channel_png(&dir.path().join("y_Ch1_1.png"), 4, 4, 1);
    write_channel_png(&dir.path().join("y_Ch2_1.png"), 5, 4, 1);

    match load_linescan_folder(dir.path(), |_| {}) {
        Err(LinescanError::DimensionMismatch { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn test_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file.png");
    write_channel_png(&file, 1, 1, 0);
    assert!(matches!(
        FolderContents::scan(&file),
        Err(LinescanError::InvalidFolder(_))
    ));
}
