//! Unbounded, bit-addressable tape built from fixed-size pages.
//!
//! Pages are kept in an arena and linked to their left/right neighbors by
//! index. A new page is allocated only when the cursor steps past the edge of
//! the current one, and always as its immediate neighbor, so the chain never
//! has gaps. Dropping the [`Tape`] drops every page at once.

use tracing::debug;

/// Bytes per page unless configured otherwise (8192 bits).
pub const DEFAULT_PAGE_BYTES: usize = 1024;

/// Memory for one of the interpreter's growable structures could not be reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("failed to allocate memory for {0}")]
pub struct AllocError(pub &'static str);

/// Index of a page inside the tape's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(usize);

impl PageId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Page {
    body: Vec<u8>,
    prev: Option<PageId>,
    next: Option<PageId>,
}

impl Page {
    fn zeroed(bytes: usize) -> Result<Self, AllocError> {
        let mut body = Vec::new();
        body.try_reserve_exact(bytes)
            .map_err(|_| AllocError("tape page"))?;
        body.resize(bytes, 0);
        Ok(Self { body, prev: None, next: None })
    }
}

/// The currently selected bit: a page and a bit offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub page: PageId,
    pub bit: usize,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Bit tape with a single cursor.
#[derive(Debug)]
pub struct Tape {
    pages: Vec<Page>,
    page_bits: usize,
    cursor: Cursor,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// A tape with [`DEFAULT_PAGE_BYTES`]-sized pages.
    pub fn new() -> Self {
        Self::from_first_page(
            Page {
                body: vec![0; DEFAULT_PAGE_BYTES],
                prev: None,
                next: None,
            },
            DEFAULT_PAGE_BYTES * 8,
        )
    }

    /// A tape whose pages hold `page_bytes` bytes each (at least one).
    pub fn with_page_bytes(page_bytes: usize) -> Result<Self, AllocError> {
        let page_bytes = page_bytes.max(1);
        let page_bits = page_bytes
            .checked_mul(8)
            .ok_or(AllocError("tape page"))?;
        Ok(Self::from_first_page(Page::zeroed(page_bytes)?, page_bits))
    }

    fn from_first_page(page: Page, page_bits: usize) -> Self {
        Self {
            pages: vec![page],
            page_bits,
            cursor: Cursor { page: PageId(0), bit: 0 },
        }
    }

    pub fn page_bits(&self) -> usize {
        self.page_bits
    }

    /// Number of pages visited so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    fn locate(&self) -> (usize, u8) {
        (self.cursor.bit / 8, 1 << (self.cursor.bit % 8))
    }

    /// Read the selected bit.
    #[inline]
    pub fn current_bit(&self) -> bool {
        let (byte, mask) = self.locate();
        self.pages[self.cursor.page.0].body[byte] & mask != 0
    }

    /// Invert the selected bit.
    #[inline]
    pub fn flip_bit(&mut self) {
        let (byte, mask) = self.locate();
        self.pages[self.cursor.page.0].body[byte] ^= mask;
    }

    /// Overwrite the selected bit.
    #[inline]
    pub fn set_bit(&mut self, value: bool) {
        let (byte, mask) = self.locate();
        let cell = &mut self.pages[self.cursor.page.0].body[byte];
        if value {
            *cell |= mask;
        } else {
            *cell &= !mask;
        }
    }

    /// Select the bit to the left, crossing into (and if needed creating) the
    /// previous page.
    pub fn move_left(&mut self) -> Result<(), AllocError> {
        if self.cursor.bit > 0 {
            self.cursor.bit -= 1;
            return Ok(());
        }
        let page = self.neighbor(Side::Left)?;
        self.cursor = Cursor { page, bit: self.page_bits - 1 };
        Ok(())
    }

    /// Select the bit to the right, crossing into (and if needed creating) the
    /// next page.
    pub fn move_right(&mut self) -> Result<(), AllocError> {
        if self.cursor.bit + 1 < self.page_bits {
            self.cursor.bit += 1;
            return Ok(());
        }
        let page = self.neighbor(Side::Right)?;
        self.cursor = Cursor { page, bit: 0 };
        Ok(())
    }

    fn neighbor(&mut self, side: Side) -> Result<PageId, AllocError> {
        let current = self.cursor.page;
        let existing = match side {
            Side::Left => self.pages[current.0].prev,
            Side::Right => self.pages[current.0].next,
        };
        if let Some(id) = existing {
            return Ok(id);
        }

        self.pages
            .try_reserve(1)
            .map_err(|_| AllocError("tape page"))?;
        let mut page = Page::zeroed(self.page_bits / 8)?;
        let id = PageId(self.pages.len());
        match side {
            Side::Left => {
                page.next = Some(current);
                self.pages[current.0].prev = Some(id);
            }
            Side::Right => {
                page.prev = Some(current);
                self.pages[current.0].next = Some(id);
            }
        }
        self.pages.push(page);
        debug!(?side, pages = self.pages.len(), "allocated tape page");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tape_is_zeroed() {
        let tape = Tape::with_page_bytes(2).unwrap();
        assert!(!tape.current_bit());
        assert_eq!(tape.page_count(), 1);
        assert_eq!(tape.page_bits(), 16);
    }

    #[test]
    fn double_flip_restores_bit() {
        let mut tape = Tape::new();
        tape.flip_bit();
        assert!(tape.current_bit());
        tape.flip_bit();
        assert!(!tape.current_bit());
        for _ in 0..10 {
            tape.flip_bit();
        }
        assert!(!tape.current_bit());
    }

    #[test]
    fn set_bit_overwrites_without_touching_neighbors() {
        let mut tape = Tape::with_page_bytes(1).unwrap();
        tape.set_bit(true);
        tape.set_bit(true);
        assert!(tape.current_bit());
        tape.move_right().unwrap();
        assert!(!tape.current_bit());
        tape.move_left().unwrap();
        tape.set_bit(false);
        assert!(!tape.current_bit());
    }

    #[test]
    fn moving_right_off_the_page_allocates_one_neighbor() {
        let mut tape = Tape::with_page_bytes(1).unwrap();
        for _ in 0..7 {
            tape.move_right().unwrap();
        }
        assert_eq!(tape.page_count(), 1);
        assert_eq!(tape.cursor().bit, 7);

        tape.move_right().unwrap();
        assert_eq!(tape.page_count(), 2);
        assert_eq!(tape.cursor().bit, 0);
        assert_ne!(tape.cursor().page, PageId(0));
    }

    #[test]
    fn moving_left_from_origin_lands_on_last_bit_of_new_page() {
        let mut tape = Tape::with_page_bytes(1).unwrap();
        tape.move_left().unwrap();
        assert_eq!(tape.page_count(), 2);
        assert_eq!(tape.cursor().bit, 7);
    }

    #[test]
    fn round_trip_moves_return_to_origin_without_extra_pages() {
        let mut tape = Tape::with_page_bytes(1).unwrap();
        let origin = tape.cursor();
        let n = 20;
        for _ in 0..n {
            tape.move_right().unwrap();
        }
        for _ in 0..n {
            tape.move_left().unwrap();
        }
        assert_eq!(tape.cursor(), origin);
        // 20 bits to the right on 8-bit pages touches pages 0, 1 and 2.
        assert_eq!(tape.page_count(), 3);

        for _ in 0..n {
            tape.move_left().unwrap();
        }
        for _ in 0..n {
            tape.move_right().unwrap();
        }
        assert_eq!(tape.cursor(), origin);
        assert_eq!(tape.page_count(), 6);
    }

    #[test]
    fn revisited_pages_keep_their_bits() {
        let mut tape = Tape::with_page_bytes(1).unwrap();
        tape.move_left().unwrap();
        tape.flip_bit();
        for _ in 0..9 {
            tape.move_right().unwrap();
        }
        assert!(!tape.current_bit());
        for _ in 0..9 {
            tape.move_left().unwrap();
        }
        assert!(tape.current_bit());
        assert_eq!(tape.page_count(), 3);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let mut tape = Tape::with_page_bytes(0).unwrap();
        assert_eq!(tape.page_bits(), 8);
        tape.flip_bit();
        assert!(tape.current_bit());
    }

    #[test]
    fn oversized_pages_are_an_allocation_error() {
        // Bit count overflows usize.
        assert_eq!(
            Tape::with_page_bytes(usize::MAX).unwrap_err(),
            AllocError("tape page")
        );
        // Bit count fits, but no allocator can hand out that much.
        assert_eq!(
            Tape::with_page_bytes(usize::MAX / 8).unwrap_err(),
            AllocError("tape page")
        );
    }
}
