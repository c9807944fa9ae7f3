use crate::error::MalformedProtobufReason;
use crate::error::ProtobufError;
use crate::error::ProtobufResult;
use crate::io::random_access::RandomAccessData;
use crate::io::readable::ReadableSequentialData;
use crate::io::sequential::SequentialData;
use crate::io::writable::WritableSequentialData;

/// A fixed-capacity, in-memory byte buffer supporting every capability
/// this runtime defines: sequential reads, sequential writes, and random
/// access.
///
/// Two constructors cover the two common uses: [`BufferedData::wrap`]
/// treats pre-existing bytes as a readable (and randomly addressable)
/// view with `position = 0`, `limit = capacity = bytes.len()`.
/// [`BufferedData::with_capacity`] allocates a zeroed buffer of fixed size
/// for writing into, with `position = 0` advancing as bytes are written.
pub struct BufferedData {
    buf: Vec<u8>,
    position: usize,
    limit: usize,
    capacity: usize,
}

impl BufferedData {
    pub fn wrap(bytes: Vec<u8>) -> BufferedData {
        let len = bytes.len();
        BufferedData {
            buf: bytes,
            position: 0,
            limit: len,
            capacity: len,
        }
    }

    pub fn wrap_slice(bytes: &[u8]) -> BufferedData {
        BufferedData::wrap(bytes.to_vec())
    }

    pub fn with_capacity(capacity: usize) -> BufferedData {
        BufferedData {
            buf: Vec::with_capacity(capacity),
            position: 0,
            limit: capacity,
            capacity,
        }
    }

    /// The bytes written so far (`0..position`).
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.position]
    }

    /// Consume this buffer, returning what was written.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// The full backing storage, including any unread tail.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

impl SequentialData for BufferedData {
    fn position(&self) -> u64 {
        self.position as u64
    }

    fn limit(&self) -> u64 {
        self.limit as u64
    }

    fn capacity(&self) -> u64 {
        self.capacity as u64
    }

    fn set_limit(&mut self, limit: u64) {
        self.limit = limit as usize;
    }

    fn skip(&mut self, n: u64) -> ProtobufResult<()> {
        let n = n as usize;
        if self.position + n > self.limit {
            return Err(ProtobufError::EndOfStream);
        }
        self.position += n;
        Ok(())
    }
}

impl ReadableSequentialData for BufferedData {
    fn read_byte(&mut self) -> ProtobufResult<u8> {
        if self.position >= self.limit {
            return Err(ProtobufError::EndOfStream);
        }
        let b = self.buf[self.position];
        self.position += 1;
        Ok(b)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> ProtobufResult<()> {
        if self.position + buf.len() > self.limit {
            return Err(ProtobufError::EndOfStream);
        }
        buf.copy_from_slice(&self.buf[self.position..self.position + buf.len()]);
        self.position += buf.len();
        Ok(())
    }
}

impl WritableSequentialData for BufferedData {
    fn write_byte(&mut self, b: u8) -> ProtobufResult<()> {
        if self.position >= self.capacity {
            return Err(ProtobufError::malformed(MalformedProtobufReason::Other(
                "BufferedData capacity exceeded".to_owned(),
            )));
        }
        if self.position == self.buf.len() {
            self.buf.push(b);
        } else {
            self.buf[self.position] = b;
        }
        self.position += 1;
        Ok(())
    }
}

impl RandomAccessData for BufferedData {
    fn length(&self) -> u64 {
        self.buf.len() as u64
    }

    fn get_byte_at(&self, offset: u64) -> ProtobufResult<u8> {
        self.buf
            .get(offset as usize)
            .copied()
            .ok_or(ProtobufError::EndOfStream)
    }
}
