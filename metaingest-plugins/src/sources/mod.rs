//! Built-in sources.

pub mod file;

pub use file::{FileSource, FileSourceConfig, FileSourceFactory};
