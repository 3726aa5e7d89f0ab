//! Source locations and the single rendering format every vv component uses
//! for fatal errors:
//!
//! ```text
//! [<filename> <row>:<col>] <message>
//! [<filename> EOF] <message>
//! [Compiler error] <message>
//! ```
//!
//! Errors never batch: the first one is rendered and the process stops.

use std::fmt;

use serde::Serialize;

/// Where a diagnostic points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Location {
    /// 1-based row and column in the source file.
    At { row: usize, col: usize },
    /// End of input.
    Eof,
    /// Internal compiler state with no source position.
    Compiler,
}

impl Location {
    pub fn at(row: usize, col: usize) -> Self {
        Location::At { row, col }
    }
}

/// A rendered-on-demand error message with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    /// Format the diagnostic against a file name.
    ///
    /// ```
    /// use diagnostics::{Diagnostic, Location};
    ///
    /// let d = Diagnostic::new(Location::at(3, 7), "Unexpected new line");
    /// assert_eq!(d.render("main.vv"), "[main.vv 3:7] Unexpected new line");
    /// ```
    pub fn render(&self, filename: &str) -> String {
        match self.location {
            Location::At { row, col } => format!("[{filename} {row}:{col}] {}", self.message),
            Location::Eof => format!("[{filename} EOF] {}", self.message),
            Location::Compiler => format!("[Compiler error] {}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Location::At { row, col } => write!(f, "{row}:{col}: {}", self.message),
            Location::Eof => write!(f, "EOF: {}", self.message),
            Location::Compiler => write!(f, "compiler: {}", self.message),
        }
    }
}

/// Implemented by every component error so the driver can render it
/// without knowing which stage produced it.
pub trait Located: fmt::Display {
    fn location(&self) -> Location;

    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.location(), self.to_string())
    }
}

/// Print the diagnostic to stderr and terminate the process with status 1.
pub fn abort(filename: &str, diagnostic: &Diagnostic) -> ! {
    eprintln!("{}", diagnostic.render(filename));
    std::process::exit(1)
}
