use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use crate::error::ProtobufResult;
use crate::io::ReadableSequentialData;
use crate::io::SequentialData;
use crate::io::WritableSequentialData;
use crate::varint::read_varint64;
use crate::varint::write_varint64;

/// An immutable, length-known, content-addressed window over shared byte
/// storage.
///
/// Cloning a `Bytes` is O(1) — it shares the backing `Arc<[u8]>` — but the
/// view itself never mutates: the underlying storage is treated as
/// copy-on-any-mutation from this value's perspective, so a `Bytes` handed
/// out by a parsed model can be cloned freely without defensive copies.
#[derive(Debug, Clone)]
pub struct Bytes {
    storage: Arc<[u8]>,
    start: usize,
    len: usize,
}

impl Bytes {
    pub fn from_vec(v: Vec<u8>) -> Bytes {
        let len = v.len();
        Bytes {
            storage: Arc::from(v.into_boxed_slice()),
            start: 0,
            len,
        }
    }

    pub fn from_static(bytes: &'static [u8]) -> Bytes {
        Bytes::from_vec(bytes.to_vec())
    }

    pub fn empty() -> Bytes {
        Bytes::from_vec(Vec::new())
    }

    /// A window over a subrange of `self`, sharing the same storage.
    pub fn slice(&self, start: usize, len: usize) -> Bytes {
        assert!(start + len <= self.len, "Bytes::slice out of range");
        Bytes {
            storage: Arc::clone(&self.storage),
            start: self.start + start,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.start..self.start + self.len]
    }

    pub fn get_byte_at(&self, offset: usize) -> Option<u8> {
        if offset < self.len {
            Some(self.storage[self.start + offset])
        } else {
            None
        }
    }

    /// Read a varint starting at the given byte offset within this view,
    /// returning the decoded value and the offset just past it.
    pub fn get_var_long_at(&self, offset: usize) -> ProtobufResult<(u64, usize)> {
        let mut cursor = crate::io::BufferedData::wrap_slice(&self.as_slice()[offset..]);
        let value = read_varint64(&mut cursor)?;
        Ok((value, offset + cursor.position() as usize))
    }

    pub fn as_utf8(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.as_slice())
    }

    /// Stream this value's bytes into any writable sink — including a
    /// hash sink — without any intermediate allocation that grows with
    /// the byte length.
    pub fn write_out(&self, sink: &mut dyn WritableSequentialData) -> ProtobufResult<()> {
        sink.write_bytes(self.as_slice())
    }

    /// Write this value as a length-delimited field body (varint length
    /// followed by the bytes), the shape used for `bytes`/`string`
    /// fields on the wire.
    pub fn write_length_delimited(&self, sink: &mut dyn WritableSequentialData) -> ProtobufResult<()> {
        write_varint64(sink, self.len as u64)?;
        self.write_out(sink)
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Bytes {}

impl Hash for Bytes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Bytes {
        Bytes::from_vec(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Bytes {
        Bytes::from_vec(v.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
