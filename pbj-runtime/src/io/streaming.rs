use std::io::Read;
use std::io::Write;

use crate::error::ProtobufError;
use crate::error::ProtobufResult;
use crate::io::readable::ReadableSequentialData;
use crate::io::sequential::SequentialData;
use crate::io::writable::WritableSequentialData;

/// The default cap on a single length-delimited read off a streaming
/// source, absent an explicit caller-provided limit.
///
/// This is a convenience default, not a wire-format requirement: callers
/// that need a different bound should use
/// [`ReadableStreamingData::with_max_message_size`].
pub const DEFAULT_MAX_MESSAGE_SIZE: u64 = 10 * 1024 * 1024;

/// Wraps a byte-producing [`Read`] as a [`ReadableSequentialData`] with no
/// random access.
///
/// `position` counts bytes consumed from `inner` since construction.
/// `limit` starts at `max_message_size` and is lowered further by
/// [`ReadableSequentialData::push_limit`] while descending into nested
/// length-delimited fields.
pub struct ReadableStreamingData<R> {
    inner: R,
    position: u64,
    limit: u64,
    max_message_size: u64,
}

impl<R: Read> ReadableStreamingData<R> {
    pub fn new(inner: R) -> ReadableStreamingData<R> {
        ReadableStreamingData::with_max_message_size(inner, DEFAULT_MAX_MESSAGE_SIZE)
    }

    pub fn with_max_message_size(inner: R, max_message_size: u64) -> ReadableStreamingData<R> {
        ReadableStreamingData {
            inner,
            position: 0,
            limit: max_message_size,
            max_message_size,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> SequentialData for ReadableStreamingData<R> {
    fn position(&self) -> u64 {
        self.position
    }

    fn limit(&self) -> u64 {
        self.limit
    }

    fn capacity(&self) -> u64 {
        self.max_message_size
    }

    fn set_limit(&mut self, limit: u64) {
        self.limit = limit;
    }

    fn skip(&mut self, n: u64) -> ProtobufResult<()> {
        let mut remaining = n;
        let mut scratch = [0u8; 4096];
        while remaining > 0 {
            let chunk = remaining.min(scratch.len() as u64) as usize;
            self.read_exact(&mut scratch[..chunk])?;
            remaining -= chunk as u64;
        }
        Ok(())
    }
}

impl<R: Read> ReadableSequentialData for ReadableStreamingData<R> {
    fn read_byte(&mut self) -> ProtobufResult<u8> {
        if self.position >= self.limit {
            return Err(ProtobufError::EndOfStream);
        }
        let mut b = [0u8; 1];
        self.inner.read_exact(&mut b).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ProtobufError::EndOfStream
            } else {
                ProtobufError::IoError(e)
            }
        })?;
        self.position += 1;
        Ok(b[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> ProtobufResult<()> {
        if self.position + buf.len() as u64 > self.limit {
            return Err(ProtobufError::EndOfStream);
        }
        self.inner.read_exact(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ProtobufError::EndOfStream
            } else {
                ProtobufError::IoError(e)
            }
        })?;
        self.position += buf.len() as u64;
        Ok(())
    }
}

/// Wraps a byte-consuming [`Write`] as a [`WritableSequentialData`], no
/// random access.
///
/// Small scalar writes are batched into an internal buffer rather than
/// issuing one `write` call per byte, the way a coded output stream
/// batches its underlying writes.
pub struct WritableStreamingData<W> {
    inner: W,
    buf: Vec<u8>,
    position: u64,
}

const WRITE_BUFFER_CAPACITY: usize = 4096;

impl<W: Write> WritableStreamingData<W> {
    pub fn new(inner: W) -> WritableStreamingData<W> {
        WritableStreamingData {
            inner,
            buf: Vec::with_capacity(WRITE_BUFFER_CAPACITY),
            position: 0,
        }
    }

    pub fn flush(&mut self) -> ProtobufResult<()> {
        if !self.buf.is_empty() {
            self.inner.write_all(&self.buf)?;
            self.buf.clear();
        }
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(mut self) -> ProtobufResult<W> {
        self.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> SequentialData for WritableStreamingData<W> {
    fn position(&self) -> u64 {
        self.position
    }

    fn limit(&self) -> u64 {
        u64::MAX
    }

    fn capacity(&self) -> u64 {
        u64::MAX
    }

    fn set_limit(&mut self, _limit: u64) {
        // Writable streaming sinks are unbounded; limits only constrain
        // reads in this runtime.
    }

    fn skip(&mut self, n: u64) -> ProtobufResult<()> {
        for _ in 0..n {
            self.write_byte(0)?;
        }
        Ok(())
    }
}

impl<W: Write> WritableSequentialData for WritableStreamingData<W> {
    fn write_byte(&mut self, b: u8) -> ProtobufResult<()> {
        self.buf.push(b);
        self.position += 1;
        if self.buf.len() >= WRITE_BUFFER_CAPACITY {
            self.inner.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> ProtobufResult<()> {
        if bytes.len() >= WRITE_BUFFER_CAPACITY {
            if !self.buf.is_empty() {
                self.inner.write_all(&self.buf)?;
                self.buf.clear();
            }
            self.inner.write_all(bytes)?;
        } else {
            self.buf.extend_from_slice(bytes);
            if self.buf.len() >= WRITE_BUFFER_CAPACITY {
                self.inner.write_all(&self.buf)?;
                self.buf.clear();
            }
        }
        self.position += bytes.len() as u64;
        Ok(())
    }
}

impl<W> Drop for WritableStreamingData<W> {
    fn drop(&mut self) {
        // Best-effort: a dropped writer that still has buffered bytes and
        // was never explicitly flushed loses them. Callers that care about
        // the error path must call `flush`/`into_inner` themselves.
    }
}
