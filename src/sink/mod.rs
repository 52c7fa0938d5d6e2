// src/sink/mod.rs
// =============================================================================
// This module delivers the finished export to the user.
//
// A Delivery is "these bytes, under this file name, with this MIME type".
// Sinks decide what delivering means:
// - console: print the JSON to stdout
// - file: write it to disk under the delivery's file name
//
// Rust concepts:
// - Traits: Sink is implemented by both output styles
// - Trait objects: main picks a sink at runtime (Box<dyn Sink>)
// =============================================================================

mod console;
mod file;

pub use console::ConsoleSink;
pub use file::FileSink;

use anyhow::Result;

pub const DEFAULT_FILE_NAME: &str = "internal-research.json";
pub const JSON_MIME: &str = "application/json";

// The serialized aggregate, ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub file_name: String,
    pub mime: &'static str,
    /// UTF-8 text; String guarantees the encoding
    pub body: String,
}

impl Delivery {
    pub fn json(file_name: impl Into<String>, body: String) -> Self {
        Self {
            file_name: file_name.into(),
            mime: JSON_MIME,
            body,
        }
    }
}

pub trait Sink {
    fn deliver(&self, delivery: &Delivery) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn deliver(&self, delivery: &Delivery) -> Result<()> {
        (**self).deliver(delivery)
    }
}
