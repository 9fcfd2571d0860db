//! Built-in sinks.

pub mod console;
pub mod file;
#[cfg(feature = "datahub-rest")]
pub mod rest;

pub use console::{ConsoleSink, ConsoleSinkConfig, ConsoleSinkFactory};
pub use file::{FileSink, FileSinkConfig, FileSinkFactory};
#[cfg(feature = "datahub-rest")]
pub use rest::{RestSink, RestSinkConfig, RestSinkFactory};
