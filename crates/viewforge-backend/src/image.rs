//! In-memory emit buffers
//!
//! Emission never touches disk: the backend writes a module image (and
//! optionally a symbol image) into these buffers, the engine rewinds them,
//! and the host loader reads them back from the start.

use std::io::{self, Cursor, Read, Write};

/// A seekable in-memory byte buffer holding one emitted image
#[derive(Debug, Clone, Default)]
pub struct ImageBuffer {
    cursor: Cursor<Vec<u8>>,
}

impl ImageBuffer {
    pub fn new() -> Self {
        Self {
            cursor: Cursor::new(Vec::new()),
        }
    }

    /// Reset the read/write position to the start of the buffer
    pub fn rewind(&mut self) {
        self.cursor.set_position(0);
    }

    /// Current read/write position
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Total number of bytes written, independent of position
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Full contents, independent of position
    pub fn bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl Write for ImageBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.cursor.flush()
    }
}

impl Read for ImageBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

/// The pair of buffers one emit attempt writes into
#[derive(Debug, Default)]
pub struct EmitBuffers {
    /// The module image itself
    pub binary: ImageBuffer,
    /// Separate debug-symbol image; absent when the host runtime cannot
    /// attach symbol streams
    pub symbols: Option<ImageBuffer>,
}

impl EmitBuffers {
    pub fn new(with_symbols: bool) -> Self {
        Self {
            binary: ImageBuffer::new(),
            symbols: with_symbols.then(ImageBuffer::new),
        }
    }

    /// Rewind both buffers to their start
    pub fn rewind(&mut self) {
        self.binary.rewind();
        if let Some(symbols) = self.symbols.as_mut() {
            symbols.rewind();
        }
    }
}
