// src/progress.rs
// =============================================================================
// Human-readable status lines ("🔍 Fetching...", "✅ Wrote...").
//
// These go to stderr so stdout stays clean for the console sink, and they
// are dropped entirely under --quiet. Errors are not routed through here:
// main prints those itself, quiet or not.
// =============================================================================

use std::fmt::Display;
use std::io::{self, Stderr, Write};

pub struct Progress<W: Write> {
    out: W,
    quiet: bool,
}

impl Progress<Stderr> {
    pub fn stderr(quiet: bool) -> Self {
        Self::new(io::stderr(), quiet)
    }
}

impl<W: Write> Progress<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self { out, quiet }
    }

    pub fn line(&mut self, text: impl Display) {
        if self.quiet {
            return;
        }
        // A closed stderr is not worth failing the run over
        let _ = writeln!(self.out, "{}", text);
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
