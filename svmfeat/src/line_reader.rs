//! Growable line-oriented reader
//!
//! Yields one logical line per call from any [`Read`] source. The internal
//! buffer doubles whenever a line does not fit, so line length is bounded
//! only by memory. Each reader owns its buffer; nothing is shared between
//! parse sessions.

use std::io::{self, Read, Seek, SeekFrom};

use svmfeat_core::format::constants::DEFAULT_LINE_CAPACITY;

/// Line reader over a byte stream
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    /// Start of unconsumed data in `buf`
    start: usize,
    /// End of valid data in `buf`
    end: usize,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_LINE_CAPACITY, inner)
    }

    /// Create a reader whose buffer starts at `capacity` bytes (minimum 1)
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; capacity.max(1)],
            start: 0,
            end: 0,
            eof: false,
        }
    }

    /// Read the next line, including its trailing `\n` when present.
    ///
    /// Returns `Ok(None)` at end of stream. A final line without a newline
    /// is still returned.
    pub fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        let mut searched = 0;
        let line_end = loop {
            let unread = &self.buf[self.start + searched..self.end];
            if let Some(pos) = unread.iter().position(|&b| b == b'\n') {
                break self.start + searched + pos + 1;
            }
            searched = self.end - self.start;

            if self.eof {
                if self.start == self.end {
                    return Ok(None);
                }
                break self.end;
            }
            self.fill()?;
        };

        let line_start = self.start;
        self.start = line_end;
        Ok(Some(&self.buf[line_start..line_end]))
    }

    /// Current buffer size in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Pull more bytes from the inner reader, compacting or growing first
    fn fill(&mut self) -> io::Result<()> {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.end == self.buf.len() {
            let grown = self.buf.len() * 2;
            self.buf.resize(grown, 0);
        }

        loop {
            match self.inner.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read + Seek> LineReader<R> {
    /// Seek the inner stream back to its start.
    ///
    /// Buffered data is discarded; the grown buffer is kept.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.start = 0;
        self.end = 0;
        self.eof = false;
        Ok(())
    }
}
