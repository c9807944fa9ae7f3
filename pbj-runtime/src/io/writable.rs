use crate::error::ProtobufResult;
use crate::io::sequential::SequentialData;

/// A sequential sink that can be written to.
///
/// `WritableSequentialData = SequentialData + scalar and slice writes`.
pub trait WritableSequentialData: SequentialData {
    /// Write a single byte, advancing `position` by one. Fails with an
    /// overflow error if this would exceed `capacity()`.
    fn write_byte(&mut self, b: u8) -> ProtobufResult<()>;

    /// Write every byte of `bytes`, or fail without any defined partial
    /// effect.
    fn write_bytes(&mut self, bytes: &[u8]) -> ProtobufResult<()> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }
}
