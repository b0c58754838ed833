//! Run-time loop bookkeeping.
//!
//! Loops are not matched ahead of time. Entering a loop records where its `[`
//! sits; a `]` either jumps back to the most recent entry or pops it, based on
//! the guard bit at that moment. A loop whose guard is clear on entry is
//! skipped by scanning forward for its matching `]`.

use tracing::debug;

use crate::tape::AllocError;

/// Stack capacity is grown by this many frames at a time.
pub const LOOP_EXPAND_SIZE: usize = 16;

/// Where an entered loop's `[` lives in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopFrame {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Entry points of the loops currently open.
#[derive(Debug, Default)]
pub struct LoopStack {
    frames: Vec<LoopFrame>,
}

impl LoopStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: LoopFrame) -> Result<(), AllocError> {
        if self.frames.len() == self.frames.capacity() {
            self.frames
                .try_reserve_exact(LOOP_EXPAND_SIZE)
                .map_err(|_| AllocError("loop stack"))?;
            debug!(capacity = self.frames.capacity(), "grew loop stack");
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<LoopFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&LoopFrame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.frames.capacity()
    }
}

/// Find the `]` matching the `[` at `open`.
///
/// Returns `None` if the program ends before the loop is closed.
pub fn find_matching_close(code: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in code.iter().enumerate().skip(open + 1) {
        match b {
            b'[' => depth += 1,
            b']' if depth == 0 => return Some(i),
            b']' => depth -= 1,
            _ => {}
        }
    }
    None
}
