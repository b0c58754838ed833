//! Brainfuck to Boolfuck translation.
//!
//! Each Brainfuck cell becomes nine Boolfuck bits: one scratch bit followed by
//! the eight data bits, low bit first. Every Brainfuck instruction maps to a
//! fixed Boolfuck sequence, so translation is a table lookup per byte. Bytes
//! that are not Brainfuck instructions are dropped.
//!
//! Quick start:
//!
//! ```
//! use boof::BoolfuckWriter;
//!
//! let bool_code = BoolfuckWriter::new(b"<>").generate();
//! assert_eq!(bool_code, "<<<<<<<<<\n>>>>>>>>>\n");
//! ```

use std::io::{self, BufRead, BufReader, Read, Write};

use tracing::info;

/// Errors that can occur while translating a stream.
#[derive(Debug, thiserror::Error)]
pub enum BoolfuckWriterError {
    #[error("failed to read Brainfuck input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write Boolfuck output: {0}")]
    Write(#[source] io::Error),
}

/// Translates Brainfuck source into Boolfuck.
pub struct BoolfuckWriter<'writer> {
    input: &'writer [u8],
}

impl<'writer> BoolfuckWriter<'writer> {
    pub fn new(input: &'writer [u8]) -> Self {
        Self { input }
    }

    /// The Boolfuck sequence for one Brainfuck instruction.
    pub fn expansion(symbol: u8) -> Option<&'static str> {
        Some(match symbol {
            b'+' => ">[>]+<[+<]>>>>>>>>>[+]<<<<<<<<<",
            b'-' => ">>>>>>>>>+<<<<<<<<+[>+]<[<]>>>>>>>>>[+]<<<<<<<<<",
            b'<' => "<<<<<<<<<",
            b'>' => ">>>>>>>>>",
            b',' => ">,>,>,>,>,>,>,>,<<<<<<<<",
            b'.' => ">;>;>;>;>;>;>;>;<<<<<<<<",
            b'[' => ">>>>>>>>>+<<<<<<<<+[>+]<[<]>>>>>>>>>[+<<<<<<<<[>]+<[+<]",
            b']' => ">>>>>>>>>+<<<<<<<<+[>+]<[<]>>>>>>>>>]<[+<]",
            _ => return None,
        })
    }

    /// Translate the whole input, one line per Brainfuck instruction.
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for seq in self.input.iter().filter_map(|&b| Self::expansion(b)) {
            output.push_str(seq);
            output.push('\n');
        }
        output
    }

    /// Translate `input` into `output` without holding either in memory.
    ///
    /// Returns the number of Brainfuck instructions translated.
    pub fn translate_stream<R: Read, W: Write>(
        input: R,
        mut output: W,
    ) -> Result<u64, BoolfuckWriterError> {
        let mut input = BufReader::new(input);
        let mut count = 0u64;

        loop {
            let buf = input.fill_buf().map_err(BoolfuckWriterError::Read)?;
            if buf.is_empty() {
                break;
            }
            let len = buf.len();
            for seq in buf.iter().filter_map(|&b| Self::expansion(b)) {
                output
                    .write_all(seq.as_bytes())
                    .and_then(|_| output.write_all(b"\n"))
                    .map_err(BoolfuckWriterError::Write)?;
                count += 1;
            }
            input.consume(len);
        }

        output.flush().map_err(BoolfuckWriterError::Write)?;
        info!(instructions = count, "translated Brainfuck program");
        Ok(count)
    }
}
