use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use linescan_core::io::{load_channel_image, FolderContents};

#[derive(Args)]
pub struct InfoArgs {
    /// Acquisition folder
    pub folder: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let contents = FolderContents::scan(&args.folder)?;

    println!("Folder:      {}", contents.path.display());
    println!("Red files:   {}", contents.red_files.len());
    println!("Green files: {}", contents.green_files.len());

    match contents.frame_count() {
        Ok(frames) => println!("Frames:      {}", frames),
        Err(e) => println!("Frames:      unavailable ({e})"),
    }

    if let Some(first) = contents.red_files.first() {
        let frame = load_channel_image(first)?;
        println!("Dimensions:  {}x{}", frame.width(), frame.height());
    }

    Ok(())
}
