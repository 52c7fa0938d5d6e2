// src/sink/console.rs
// Prints the export to a writer (stdout in the binary).

use super::{Delivery, Sink};
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::io::{self, Stdout, Write};

pub struct ConsoleSink<W: Write> {
    out: RefCell<W>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn deliver(&self, delivery: &Delivery) -> Result<()> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", delivery.body)
            .and_then(|_| out.flush())
            .with_context(|| format!("Failed to print {}", delivery.file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prints_body_followed_by_newline() {
        let sink = ConsoleSink::new(Vec::new());
        sink.deliver(&Delivery::json("x.json", r#"[{"id":1}]"#.to_string()))
            .unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "[{\"id\":1}]\n");
    }
}
