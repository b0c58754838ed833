//! The Boolfuck interpreter.
//!
//! Boolfuck programs operate on single bits of an unbounded tape:
//!
//! - `+` flips the selected bit.
//! - `,` reads one bit from input into the selected bit.
//! - `;` writes the selected bit to output.
//! - `<` and `>` move the cursor.
//! - `[` enters a loop if the selected bit is set, otherwise skips past the
//!   matching `]`.
//! - `]` jumps back to the innermost open loop while the selected bit is set.
//!
//! Every other byte is ignored. Input and output are packed into bytes least
//! significant bit first; end of input reads as zero. When the program ends a
//! single newline is written and any partially filled output byte is dropped.
//!
//! Quick start:
//!
//! ```no_run
//! use boof::BoolfuckReader;
//!
//! // Writes 'A' (0b0100_0001, low bit first).
//! let code = "+;+;;;;;+;+;";
//! let mut bf = BoolfuckReader::new(code.as_bytes().to_vec());
//! bf.run().expect("program should run");
//! ```

use std::io::{self, Read, Write};

use tracing::{info, warn};

use crate::bitio::{BitReader, BitWriter};
use crate::loops::{LoopFrame, LoopStack, find_matching_close};
use crate::tape::{AllocError, Tape};

/// Errors that can stop a Boolfuck program.
#[derive(Debug, thiserror::Error)]
pub enum BoolfuckReaderError {
    /// A tape page or the loop stack could not be grown.
    #[error("{source} at instruction {ip}")]
    Alloc {
        ip: usize,
        #[source]
        source: AllocError,
    },

    /// Reading input or writing output failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// Strict mode only: a skipped loop was never closed.
    #[error("Unmatched '[' at line {line}, column {column} (instruction {ip})")]
    UnmatchedOpen { ip: usize, line: usize, column: usize },
}

impl BoolfuckReaderError {
    /// Instruction offset the error refers to.
    pub fn ip(&self) -> usize {
        match self {
            Self::Alloc { ip, .. } | Self::Io { ip, .. } | Self::UnmatchedOpen { ip, .. } => *ip,
        }
    }
}

/// Line/column of the instruction being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: usize,
    column: usize,
}

/// A Boolfuck interpreter.
///
/// Owns the program, the tape, and the loop stack. One value runs one
/// program; inspect [`tape`](Self::tape) and [`loop_depth`](Self::loop_depth)
/// afterwards if needed.
pub struct BoolfuckReader {
    code: Vec<u8>,
    tape: Tape,
    loops: LoopStack,
    strict: bool,
    debug: bool,
}

impl BoolfuckReader {
    /// Create an interpreter for `code` with the default page size.
    pub fn new(code: Vec<u8>) -> Self {
        Self::with_tape(code, Tape::new())
    }

    /// Create an interpreter whose tape pages hold `page_bytes` bytes.
    ///
    /// Fails when a page of that size cannot be allocated.
    pub fn with_page_bytes(code: Vec<u8>, page_bytes: usize) -> Result<Self, AllocError> {
        Ok(Self::with_tape(code, Tape::with_page_bytes(page_bytes)?))
    }

    fn with_tape(code: Vec<u8>, tape: Tape) -> Self {
        Self {
            code,
            tape,
            loops: LoopStack::new(),
            strict: false,
            debug: false,
        }
    }

    /// Report a skipped loop that runs off the end of the program instead of
    /// silently finishing.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Print a step-by-step table of executed instructions to stderr.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn loop_depth(&self) -> usize {
        self.loops.depth()
    }

    /// Run against the process's stdin and stdout.
    pub fn run(&mut self) -> Result<(), BoolfuckReaderError> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with_io(stdin.lock(), stdout.lock())
    }

    /// Run against arbitrary byte streams.
    pub fn run_with_io<R: Read, W: Write>(
        &mut self,
        input: R,
        output: W,
    ) -> Result<(), BoolfuckReaderError> {
        let mut input = BitReader::new(input);
        let mut output = BitWriter::new(output);

        let end = self.execute(&mut input, &mut output)?;
        let bytes = output.bytes_written();
        output
            .finish()
            .map_err(|source| BoolfuckReaderError::Io { ip: end, source })?;

        info!(
            pages = self.tape.page_count(),
            bytes_written = bytes,
            "program finished"
        );
        Ok(())
    }

    /// Main dispatch loop. Returns the offset execution stopped at.
    fn execute<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut BitWriter<W>,
    ) -> Result<usize, BoolfuckReaderError> {
        let code_len = self.code.len();
        let mut code_ptr = 0usize;
        let mut pos = Position { line: 1, column: 0 };
        let mut step = 0usize;

        if self.debug {
            eprintln!("STEP | LINE:COL | IP    | BIT | INSTR | ACTION");
            eprintln!("-----+----------+-------+-----+-------+------------------------------------");
        }

        while code_ptr < code_len {
            pos.column += 1;

            let ip = code_ptr;
            let instr = self.code[ip];
            let at = pos;
            let bit_before = self.tape.current_bit();
            let mut action: Option<String> = if self.debug { Some(String::new()) } else { None };

            match instr {
                b'+' => {
                    self.tape.flip_bit();
                    if let Some(a) = action.as_mut() {
                        *a = format!("Flip bit to {}", self.tape.current_bit() as u8);
                    }
                }
                b',' => {
                    // Make sure anything already written is visible before we block.
                    output
                        .flush()
                        .map_err(|source| BoolfuckReaderError::Io { ip: code_ptr, source })?;
                    let bit = input
                        .read_bit()
                        .map_err(|source| BoolfuckReaderError::Io { ip: code_ptr, source })?;
                    self.tape.set_bit(bit);
                    if let Some(a) = action.as_mut() {
                        *a = format!("Read bit {}", bit as u8);
                    }
                }
                b';' => {
                    output
                        .write_bit(bit_before)
                        .map_err(|source| BoolfuckReaderError::Io { ip: code_ptr, source })?;
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Write bit {} ({} pending)",
                            bit_before as u8,
                            output.pending_bits()
                        );
                    }
                }
                b'<' => {
                    self.tape
                        .move_left()
                        .map_err(|source| BoolfuckReaderError::Alloc { ip: code_ptr, source })?;
                    if let Some(a) = action.as_mut() {
                        *a = self.describe_cursor();
                    }
                }
                b'>' => {
                    self.tape
                        .move_right()
                        .map_err(|source| BoolfuckReaderError::Alloc { ip: code_ptr, source })?;
                    if let Some(a) = action.as_mut() {
                        *a = self.describe_cursor();
                    }
                }
                b'[' => {
                    if bit_before {
                        self.loops
                            .push(LoopFrame {
                                offset: code_ptr,
                                line: pos.line,
                                column: pos.column,
                            })
                            .map_err(|source| BoolfuckReaderError::Alloc { ip: code_ptr, source })?;
                        if let Some(a) = action.as_mut() {
                            *a = format!("Enter loop (depth {})", self.loops.depth());
                        }
                    } else {
                        match find_matching_close(&self.code, code_ptr) {
                            Some(close) => {
                                advance_position(&mut pos, &self.code[code_ptr + 1..=close]);
                                if let Some(a) = action.as_mut() {
                                    *a = format!("Bit is 0; skip to matching ']' at IP {close}");
                                }
                                code_ptr = close;
                            }
                            None if self.strict => {
                                return Err(BoolfuckReaderError::UnmatchedOpen {
                                    ip: code_ptr,
                                    line: pos.line,
                                    column: pos.column,
                                });
                            }
                            None => {
                                warn!(
                                    ip = code_ptr,
                                    line = pos.line,
                                    column = pos.column,
                                    "skipped loop is never closed; stopping at end of program"
                                );
                                if let Some(a) = action.as_mut() {
                                    *a = "Bit is 0; no matching ']', skip to end".to_string();
                                }
                                code_ptr = code_len;
                            }
                        }
                    }
                }
                b']' => match self.loops.top().copied() {
                    None => {
                        if let Some(a) = action.as_mut() {
                            *a = "No open loop; ignored".to_string();
                        }
                    }
                    Some(frame) if bit_before => {
                        if let Some(a) = action.as_mut() {
                            *a = format!("Bit is 1; jump back to '[' at IP {}", frame.offset);
                        }
                        code_ptr = frame.offset;
                        pos = Position { line: frame.line, column: frame.column };
                    }
                    Some(_) => {
                        self.loops.pop();
                        if let Some(a) = action.as_mut() {
                            *a = format!("Bit is 0; exit loop (depth {})", self.loops.depth());
                        }
                    }
                },
                b'\n' => {
                    pos.line += 1;
                    pos.column = 0;
                }
                _ => {}
            }

            if let Some(a) = action {
                if is_instruction(instr) {
                    eprintln!(
                        "{:<4} | {:>4}:{:<3} | {:<5} | {:<3} |  {}    | {}",
                        step, at.line, at.column, ip, bit_before as u8, instr as char, a
                    );
                    step += 1;
                }
            }

            code_ptr = code_ptr.saturating_add(1);
        }

        Ok(code_ptr.min(code_len))
    }

    fn describe_cursor(&self) -> String {
        let cursor = self.tape.cursor();
        format!(
            "Select page {} bit {} (pages: {})",
            cursor.page.index(),
            cursor.bit,
            self.tape.page_count()
        )
    }
}

/// Whether `b` is one of the seven Boolfuck instructions.
pub fn is_instruction(b: u8) -> bool {
    matches!(b, b'+' | b',' | b';' | b'<' | b'>' | b'[' | b']')
}

/// Account for the bytes a skip scan jumped over.
fn advance_position(pos: &mut Position, skipped: &[u8]) {
    for &b in skipped {
        if b == b'\n' {
            pos.line += 1;
            pos.column = 0;
        } else {
            pos.column += 1;
        }
    }
}
