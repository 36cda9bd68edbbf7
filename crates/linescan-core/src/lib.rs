pub mod analysis;
pub mod config;
pub mod consts;
pub mod detection;
pub mod error;
pub mod frame;
pub mod io;
pub mod range;
pub mod scheduler;
pub mod session;
pub mod stack;
