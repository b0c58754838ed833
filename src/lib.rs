//! A Boolfuck interpreter and Brainfuck-to-Boolfuck transpiler.
//!
//! Boolfuck is Brainfuck shrunk to single bits: the tape holds bits, `+`
//! flips the selected one, `;` and `,` move one bit at a time to and from the
//! byte streams, and loops test the selected bit.
//!
//! Features and behaviors:
//! - The tape is unbounded in both directions; pages are allocated only as the
//!   cursor reaches them.
//! - Loops are matched at run time. An unmatched `]` is ignored, and a skipped
//!   `[` with no matching `]` ends the program (or errors in strict mode).
//! - Input and output are least significant bit first. EOF reads as zero.
//! - A newline is always written when the program finishes.
//!
//! Quick start:
//!
//! ```
//! use boof::{BoolfuckReader, BoolfuckWriter};
//!
//! // Translate a Brainfuck program that prints 'A' and run it.
//! let bool_code = BoolfuckWriter::new(b"++++++++[>++++++++<-]>+.").generate();
//! let mut bf = BoolfuckReader::new(bool_code.into_bytes());
//! let mut out = Vec::new();
//! bf.run_with_io(std::io::empty(), &mut out).expect("program should run");
//! assert_eq!(out, b"A\n");
//! ```

pub mod bitio;
pub mod cli_util;
pub mod commands;
pub mod config;
pub mod loader;
pub mod loops;
pub mod reader;
pub mod tape;
pub mod writer;

pub use reader::{BoolfuckReader, BoolfuckReaderError};
pub use tape::{AllocError, Tape};
pub use writer::{BoolfuckWriter, BoolfuckWriterError};

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging on stderr.
///
/// Use the `BOOF_LOG` environment variable to override the default filter,
/// which only shows warnings.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("BOOF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
