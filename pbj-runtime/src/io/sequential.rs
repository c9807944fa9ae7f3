use crate::error::ProtobufResult;

/// Position/limit/capacity bookkeeping shared by every readable or
/// writable byte sequence.
///
/// `position` monotonically increases over the lifetime of a value.
/// `limit` bounds how many bytes may currently be consumed or produced —
/// it is temporarily lowered by [`ReadableSequentialData::push_limit`] when
/// a parser descends into a length-delimited sub-field, then restored by
/// `pop_limit`. `capacity` is the hard ceiling a writable sequence cannot
/// exceed.
pub trait SequentialData {
    /// Number of bytes already consumed or produced.
    fn position(&self) -> u64;

    /// Current limit: reads/writes past this fail.
    fn limit(&self) -> u64;

    /// Hard capacity of the underlying storage.
    fn capacity(&self) -> u64;

    /// Lower or raise the current limit. Used by push/pop-limit bracketing
    /// around length-delimited fields.
    fn set_limit(&mut self, limit: u64);

    fn has_remaining(&self) -> bool {
        self.position() < self.limit()
    }

    fn remaining(&self) -> u64 {
        self.limit().saturating_sub(self.position())
    }

    /// Advance `position` by exactly `n` bytes, consuming or producing
    /// them depending on direction. Fails if `n` bytes aren't available.
    fn skip(&mut self, n: u64) -> ProtobufResult<()>;
}
