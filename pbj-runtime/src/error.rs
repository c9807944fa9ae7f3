use std::fmt;
use std::io;

/// Everything that can go wrong while reading or writing the protobuf wire
/// format.
///
/// `MalformedProtobuf` and `EndOfStream` are recoverable decode-time
/// failures, `IoError` wraps the underlying source/sink. None of these
/// are fatal to the surrounding
/// process — callers are expected to propagate or handle them, never to
/// crash or hang on malformed input.
#[derive(Debug)]
pub enum ProtobufError {
    /// The wire bytes violate the protobuf encoding in some way: bad tag,
    /// truncated varint, wrong wire type for a field, invalid UTF-8, a
    /// packed length that runs past the remaining bytes, and so on.
    MalformedProtobuf(MalformedProtobufReason),
    /// A readable sequential source was exhausted while more bytes were
    /// required to complete a read.
    EndOfStream,
    /// The underlying `Read`/`Write` failed.
    IoError(io::Error),
}

/// The specific reason a [`ProtobufError::MalformedProtobuf`] was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedProtobufReason {
    /// A varint used all 10 bytes and the last one still had its
    /// continuation bit set.
    VarintTooLong,
    /// A tag's field number was zero.
    ZeroFieldNumber,
    /// A tag's wire type was not one of 0, 1, 2, 5.
    InvalidWireType(u8),
    /// A length-delimited field or packed-repeated length exceeds the
    /// bytes remaining in the current source/limit.
    TruncatedLengthDelimited { declared: usize, remaining: usize },
    /// A string field contained bytes that are not valid UTF-8.
    InvalidUtf8,
    /// A field was read with a wire type that doesn't match its schema.
    UnexpectedWireType { field_number: u32, expected: u8, actual: u8 },
    /// An optional-wrapper sub-message contained an inner tag other than
    /// field number 1.
    UnexpectedWrapperField(u32),
    /// Catch-all for malformed input that doesn't fit another case, with a
    /// human-readable explanation.
    Other(String),
}

impl fmt::Display for ProtobufError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtobufError::MalformedProtobuf(reason) => {
                write!(f, "malformed protobuf: {}", reason)
            }
            ProtobufError::EndOfStream => write!(f, "end of stream reached while reading"),
            ProtobufError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl fmt::Display for MalformedProtobufReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedProtobufReason::VarintTooLong => {
                write!(f, "varint longer than 10 bytes")
            }
            MalformedProtobufReason::ZeroFieldNumber => write!(f, "field number is zero"),
            MalformedProtobufReason::InvalidWireType(wt) => {
                write!(f, "invalid wire type {}", wt)
            }
            MalformedProtobufReason::TruncatedLengthDelimited { declared, remaining } => write!(
                f,
                "length-delimited field declares {} bytes but only {} remain",
                declared, remaining
            ),
            MalformedProtobufReason::InvalidUtf8 => write!(f, "invalid UTF-8 in string field"),
            MalformedProtobufReason::UnexpectedWireType {
                field_number,
                expected,
                actual,
            } => write!(
                f,
                "field {} has wire type {} but {} was expected",
                field_number, actual, expected
            ),
            MalformedProtobufReason::UnexpectedWrapperField(n) => write!(
                f,
                "optional-wrapper message has a field at number {} ({} expected)",
                n, 1
            ),
            MalformedProtobufReason::Other(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for ProtobufError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtobufError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProtobufError {
    fn from(e: io::Error) -> Self {
        ProtobufError::IoError(e)
    }
}

impl ProtobufError {
    pub fn malformed(reason: MalformedProtobufReason) -> ProtobufError {
        ProtobufError::MalformedProtobuf(reason)
    }

    pub fn other<S: Into<String>>(msg: S) -> ProtobufError {
        ProtobufError::MalformedProtobuf(MalformedProtobufReason::Other(msg.into()))
    }

    /// True for errors a caller may reasonably retry on a fresh input
    /// (as opposed to a systematic bug in the encoder).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ProtobufError::IoError(_))
    }
}

pub type ProtobufResult<T> = Result<T, ProtobufError>;
