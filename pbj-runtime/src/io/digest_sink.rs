use digest::Digest;

use crate::error::ProtobufResult;
use crate::io::sequential::SequentialData;
use crate::io::writable::WritableSequentialData;

/// A writable sequential sink that feeds bytes into a cryptographic hash
/// without ever materializing them.
///
/// `capacity` and `limit` report `u64::MAX`: a digest has no notion of
/// running out of room. `position` is tracked purely so the
/// size-equals-write invariant holds when a caller measures a
/// value and then streams it into a digest.
pub struct MessageDigestSink<D: Digest> {
    hasher: D,
    position: u64,
}

impl<D: Digest> MessageDigestSink<D> {
    pub fn new() -> MessageDigestSink<D> {
        MessageDigestSink {
            hasher: D::new(),
            position: 0,
        }
    }

    pub fn finalize(self) -> digest::Output<D> {
        self.hasher.finalize()
    }
}

impl<D: Digest> Default for MessageDigestSink<D> {
    fn default() -> Self {
        MessageDigestSink::new()
    }
}

impl<D: Digest> SequentialData for MessageDigestSink<D> {
    fn position(&self) -> u64 {
        self.position
    }

    fn limit(&self) -> u64 {
        u64::MAX
    }

    fn capacity(&self) -> u64 {
        u64::MAX
    }

    fn set_limit(&mut self, _limit: u64) {}

    fn skip(&mut self, n: u64) -> ProtobufResult<()> {
        // A digest must still absorb skipped bytes to stay meaningful;
        // protobuf has no "skip while writing" operation, so this is only
        // reachable via the shared default on WritableSequentialData and
        // is implemented as n zero bytes.
        for _ in 0..n {
            self.write_byte(0)?;
        }
        Ok(())
    }
}

impl<D: Digest> WritableSequentialData for MessageDigestSink<D> {
    fn write_byte(&mut self, b: u8) -> ProtobufResult<()> {
        self.hasher.update([b]);
        self.position += 1;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> ProtobufResult<()> {
        self.hasher.update(bytes);
        self.position += bytes.len() as u64;
        Ok(())
    }
}
