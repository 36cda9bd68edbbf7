pub mod folder;
pub mod image_io;

pub use folder::{load_linescan_folder, FolderContents};
pub use image_io::load_channel_image;
