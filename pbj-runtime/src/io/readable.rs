use crate::error::ProtobufError;
use crate::error::ProtobufResult;
use crate::io::sequential::SequentialData;

/// A sequential source that can be read from.
///
/// `ReadableSequentialData = SequentialData + scalar and slice reads`.
/// Both [`crate::io::buffered::BufferedData`] and
/// [`crate::io::streaming::ReadableStreamingData`] implement this; only
/// the former additionally implements [`crate::io::random_access::RandomAccessData`].
pub trait ReadableSequentialData: SequentialData {
    /// Read a single byte, advancing `position` by one.
    fn read_byte(&mut self) -> ProtobufResult<u8>;

    /// Fill `buf` completely or fail. Never reads a partial amount.
    fn read_exact(&mut self, buf: &mut [u8]) -> ProtobufResult<()>;

    /// Read exactly `len` bytes into a freshly allocated vector. Bounds
    /// `len` against what's actually left to read before allocating, so a
    /// malformed length prefix fails with `TruncatedLengthDelimited`
    /// instead of forcing an unbounded allocation.
    fn read_vec(&mut self, len: usize) -> ProtobufResult<Vec<u8>> {
        let remaining = self.remaining();
        if len as u64 > remaining {
            return Err(ProtobufError::malformed(
                crate::error::MalformedProtobufReason::TruncatedLengthDelimited {
                    declared: len,
                    remaining: remaining as usize,
                },
            ));
        }
        let mut v = vec![0u8; len];
        self.read_exact(&mut v)?;
        Ok(v)
    }

    /// Consume exactly `n` bytes without materializing them. Must consume
    /// exactly `n` bytes or fail.
    fn skip_n_bytes(&mut self, n: u64) -> ProtobufResult<()> {
        self.skip(n)
    }

    /// Temporarily lower the limit to `position() + new_len`, returning the
    /// previous limit so it can be restored with [`Self::pop_limit`]. Used
    /// when a parser descends into a length-delimited field.
    fn push_limit(&mut self, new_len: u64) -> ProtobufResult<u64> {
        let remaining = self.remaining();
        if new_len > remaining {
            return Err(ProtobufError::malformed(
                crate::error::MalformedProtobufReason::TruncatedLengthDelimited {
                    declared: new_len as usize,
                    remaining: remaining as usize,
                },
            ));
        }
        let old_limit = self.limit();
        self.set_limit(self.position() + new_len);
        Ok(old_limit)
    }

    /// Restore a limit previously returned by [`Self::push_limit`].
    fn pop_limit(&mut self, old_limit: u64) {
        self.set_limit(old_limit);
    }
}
