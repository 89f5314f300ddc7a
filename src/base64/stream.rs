//! Streaming adapters that convert to/from Base64 lazily, one group at a
//! time, over any `std::io` source or sink.
//!
//! The adapters are plain composition: each struct owns the wrapped
//! reader/writer plus its own small accumulation buffer, and exposes only
//! the narrow `Read`/`Write` contract. Ownership of the inner handle
//! transfers on construction and is returned by the consuming finalizers.

use std::io::{self, Read, Write};

use super::alphabet::{classify, INVALID, MAX_LINE_LENGTH, NEW_LINE, PAD_BYTE, WHITESPACE};
use super::group::{decode_quartet, encode_group, DecodeError};

/// Sink adapter that Base64-encodes bytes written through it.
///
/// Bytes accumulate three at a time; every completed group is forwarded
/// to the inner writer as four symbols, with a line feed after every 76
/// symbols (never inside a group). Call [`finish`](Self::finish) to pad
/// and emit the final partial group; dropping an unfinished writer loses
/// the buffered tail.
pub struct EncodeWriter<W: Write> {
    inner: W,
    buf: [u8; 3],
    held: usize,
    line: usize,
}

impl<W: Write> EncodeWriter<W> {
    pub fn new(inner: W) -> Self {
        EncodeWriter {
            inner,
            buf: [0; 3],
            held: 0,
            line: 0,
        }
    }

    fn push_byte(&mut self, byte: u8) -> io::Result<()> {
        self.buf[self.held] = byte;
        self.held += 1;
        if self.held == 3 {
            self.inner.write_all(&encode_group(&self.buf, 3))?;
            self.held = 0;
            self.line += 4;
            if self.line == MAX_LINE_LENGTH {
                self.inner.write_all(&[NEW_LINE])?;
                self.line = 0;
            }
        }
        Ok(())
    }

    /// Pad and emit any buffered partial group, flush the sink, and
    /// return it.
    pub fn finish(mut self) -> io::Result<W> {
        if self.held > 0 {
            let group = encode_group(&self.buf[..self.held], self.held);
            self.inner.write_all(&group)?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for EncodeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &b in buf {
            self.push_byte(b)?;
        }
        Ok(buf.len())
    }

    /// Forwards to the sink. Padding happens in [`finish`](Self::finish),
    /// not here, so a mid-stream flush keeps the stream appendable.
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Sink adapter that decodes Base64 text written through it.
///
/// Symbols accumulate four at a time; each completed quartet is decoded
/// and its 1-3 bytes forwarded to the inner writer. Whitespace is
/// skipped; any other non-alphabet byte fails the write.
pub struct DecodeWriter<W: Write> {
    inner: W,
    buf: [u8; 4],
    // Input positions of the buffered symbols, for error reporting.
    positions: [usize; 4],
    held: usize,
    // Count of bytes consumed so far, for error positions.
    consumed: usize,
}

impl<W: Write> DecodeWriter<W> {
    pub fn new(inner: W) -> Self {
        DecodeWriter {
            inner,
            buf: [0; 4],
            positions: [0; 4],
            held: 0,
            consumed: 0,
        }
    }

    fn push_symbol(&mut self, raw: u8) -> io::Result<()> {
        let position = self.consumed;
        self.consumed += 1;

        let symbol = raw & 0x7f;
        let class = classify(symbol);
        if class == WHITESPACE {
            return Ok(());
        }
        if class == INVALID {
            return Err(DecodeError::InvalidByte {
                position,
                byte: raw,
            }
            .into());
        }

        self.buf[self.held] = symbol;
        self.positions[self.held] = position;
        self.held += 1;
        if self.held == 4 {
            let (bytes, sig) = decode_quartet(&self.buf)
                .map_err(|e| e.at_positions(&self.positions))?;
            self.inner.write_all(&bytes[..sig])?;
            self.held = 0;
        }
        Ok(())
    }

    /// Flush the sink and return it. Fails if a partial quartet is still
    /// buffered: the input was not properly padded.
    pub fn finish(mut self) -> io::Result<W> {
        if self.held > 0 {
            return Err(DecodeError::TruncatedInput {
                remaining: self.held,
            }
            .into());
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for DecodeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &b in buf {
            self.push_symbol(b)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Source adapter that serves the Base64 encoding of bytes pulled from
/// the wrapped reader.
///
/// Each group of up to three source bytes is served as four symbols. The
/// read side emits no line breaks; output is unwrapped Base64.
pub struct EncodeReader<R: Read> {
    inner: R,
    encoded: [u8; 4],
    // 4 = nothing cached.
    cursor: usize,
    done: bool,
}

impl<R: Read> EncodeReader<R> {
    pub fn new(inner: R) -> Self {
        EncodeReader {
            inner,
            encoded: [0; 4],
            cursor: 4,
            done: false,
        }
    }

    /// Return the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Pull up to three source bytes and cache their encoding.
    /// Returns false once the source is exhausted.
    fn refill(&mut self) -> io::Result<bool> {
        if self.done {
            return Ok(false);
        }

        let mut raw = [0u8; 3];
        let mut got = 0usize;
        'fill: while got < 3 {
            loop {
                match self.inner.read(&mut raw[got..got + 1]) {
                    Ok(0) => {
                        self.done = true;
                        break 'fill;
                    }
                    Ok(_) => {
                        got += 1;
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    // Fail loud only if nothing was read yet; a failure
                    // mid-group counts as end of input for that group.
                    Err(e) if got == 0 => return Err(e),
                    Err(_) => {
                        self.done = true;
                        break 'fill;
                    }
                }
            }
        }

        if got == 0 {
            return Ok(false);
        }
        self.encoded = encode_group(&raw[..got], got);
        self.cursor = 0;
        Ok(true)
    }
}

impl<R: Read> Read for EncodeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0usize;
        while filled < buf.len() {
            if self.cursor == 4 && !self.refill()? {
                break;
            }
            buf[filled] = self.encoded[self.cursor];
            self.cursor += 1;
            filled += 1;
        }
        Ok(filled)
    }
}

/// Source adapter that decodes Base64 text pulled from the wrapped reader.
///
/// Symbols are pulled one at a time, whitespace discarded, until a full
/// quartet accumulates; its 1-3 decoded bytes are then served on
/// successive reads. A quartet ending in padding terminates the stream.
/// A non-alphabet byte fails the read at the point it is seen, and a
/// source that ends mid-quartet is reported as improperly padded input.
pub struct DecodeReader<R: Read> {
    inner: R,
    decoded: [u8; 3],
    sig: usize,
    cursor: usize,
    done: bool,
    // Count of bytes consumed from the source, for error positions.
    consumed: usize,
}

impl<R: Read> DecodeReader<R> {
    pub fn new(inner: R) -> Self {
        DecodeReader {
            inner,
            decoded: [0; 3],
            sig: 0,
            cursor: 0,
            done: false,
            consumed: 0,
        }
    }

    /// Return the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Serve the next decoded byte, or `None` at end of stream.
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.cursor < self.sig {
            let b = self.decoded[self.cursor];
            self.cursor += 1;
            return Ok(Some(b));
        }
        if self.done {
            return Ok(None);
        }

        let mut quartet = [0u8; 4];
        // Source positions of the buffered symbols, for error reporting.
        let mut positions = [0usize; 4];
        let mut held = 0usize;
        while held < 4 {
            match self.read_symbol()? {
                Some(symbol) => {
                    quartet[held] = symbol;
                    positions[held] = self.consumed - 1;
                    held += 1;
                }
                None => {
                    self.done = true;
                    if held == 0 {
                        return Ok(None);
                    }
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        DecodeError::TruncatedInput { remaining: held },
                    ));
                }
            }
        }

        let (bytes, sig) =
            decode_quartet(&quartet).map_err(|e| e.at_positions(&positions))?;
        self.decoded = bytes;
        self.sig = sig;
        self.cursor = 1;
        // A padded quartet is always the last one of the stream.
        if quartet[3] == PAD_BYTE {
            self.done = true;
        }
        Ok(Some(bytes[0]))
    }

    /// Read one significant symbol from the source, skipping whitespace.
    /// `None` means the source is exhausted.
    fn read_symbol(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
            let position = self.consumed;
            self.consumed += 1;

            let symbol = byte[0] & 0x7f;
            let class = classify(symbol);
            if class == WHITESPACE {
                continue;
            }
            if class == INVALID {
                return Err(DecodeError::InvalidByte {
                    position,
                    byte: byte[0],
                }
                .into());
            }
            return Ok(Some(symbol));
        }
    }
}

impl<R: Read> Read for DecodeReader<R> {
    /// Calls the byte-at-a-time pull until `buf` is full or the stream
    /// ends; 0 is returned only at immediate end of stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.next_byte()? {
                Some(b) => {
                    buf[filled] = b;
                    filled += 1;
                }
                None => break,
            }
        }
        Ok(filled)
    }
}
