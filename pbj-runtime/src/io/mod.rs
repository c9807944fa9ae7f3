//! Byte-sequence and I/O abstractions: four orthogonal
//! capability traits, and the buffered/streaming/digest types that
//! compose them.

pub mod buffered;
pub mod digest_sink;
pub mod random_access;
pub mod readable;
pub mod sequential;
pub mod streaming;
pub mod writable;

pub use buffered::BufferedData;
pub use digest_sink::MessageDigestSink;
pub use random_access::RandomAccessData;
pub use readable::ReadableSequentialData;
pub use sequential::SequentialData;
pub use streaming::ReadableStreamingData;
pub use streaming::WritableStreamingData;
pub use writable::WritableSequentialData;
