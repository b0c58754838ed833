//! Serial bit input/output over byte streams.
//!
//! Both directions are least-significant-bit first: the first bit read from a
//! byte is bit 0, and the first bit written lands in bit 0 of the next output
//! byte.

use std::io::{self, ErrorKind, Read, Write};

/// Hands out the bits of an input stream one at a time.
///
/// End of input reads as a zero byte.
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    byte: u8,
    consumed: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, byte: 0, consumed: 8 }
    }

    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.consumed > 7 {
            self.byte = self.next_byte()?;
            self.consumed = 0;
        }
        let bit = self.byte & (1 << self.consumed) != 0;
        self.consumed += 1;
        Ok(bit)
    }

    fn next_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(0),
                Ok(_) => return Ok(buf[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Packs bits into bytes and writes each byte once it is full.
#[derive(Debug)]
pub struct BitWriter<W> {
    inner: W,
    byte: u8,
    filled: u8,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, byte: 0, filled: 0, bytes_written: 0 }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.byte |= 1 << self.filled;
        } else {
            self.byte &= !(1 << self.filled);
        }
        self.filled += 1;

        if self.filled == 8 {
            self.inner.write_all(&[self.byte])?;
            self.bytes_written += 1;
            self.byte = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Bits waiting for the current byte to fill up.
    pub fn pending_bits(&self) -> u8 {
        self.filled
    }

    /// Full bytes written so far, not counting the final newline.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush before blocking on input so prompts are visible.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// End the stream: drop any partial byte, write a newline, flush, and
    /// return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_least_significant_bit_first() {
        let mut reader = BitReader::new(Cursor::new(vec![0b0000_0101u8]));
        let bits: Vec<bool> = (0..8).map(|_| reader.read_bit().unwrap()).collect();
        assert_eq!(bits, [true, false, true, false, false, false, false, false]);
    }

    #[test]
    fn refills_after_eight_bits() {
        let mut reader = BitReader::new(Cursor::new(vec![0x00, 0xff]));
        for _ in 0..8 {
            assert!(!reader.read_bit().unwrap());
        }
        for _ in 0..8 {
            assert!(reader.read_bit().unwrap());
        }
    }

    #[test]
    fn end_of_input_reads_as_zero() {
        let mut reader = BitReader::new(io::empty());
        for _ in 0..24 {
            assert!(!reader.read_bit().unwrap());
        }
    }

    #[test]
    fn writes_least_significant_bit_first() {
        let mut writer = BitWriter::new(Vec::new());
        for bit in [true, false, true, false, true, false, true, false] {
            writer.write_bit(bit).unwrap();
        }
        assert_eq!(writer.bytes_written(), 1);
        let out = writer.finish().unwrap();
        assert_eq!(out, vec![0x55, b'\n']);
    }

    #[test]
    fn partial_byte_is_dropped_on_finish() {
        let mut writer = BitWriter::new(Vec::new());
        for _ in 0..7 {
            writer.write_bit(true).unwrap();
        }
        assert_eq!(writer.pending_bits(), 7);
        let out = writer.finish().unwrap();
        assert_eq!(out, b"\n");
    }

    #[test]
    fn cleared_bits_overwrite_stale_state() {
        let mut writer = BitWriter::new(Vec::new());
        for _ in 0..8 {
            writer.write_bit(true).unwrap();
        }
        for _ in 0..8 {
            writer.write_bit(false).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), vec![0xff, 0x00, b'\n']);
    }
}
