use thiserror::Error;

/// Errors that can occur while reading from a [`ByteReader`](crate::ByteReader)
///
/// Readers process untrusted network data, so every malformed input maps onto
/// one of these variants instead of a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The buffer ended before the value was complete
    #[error("Buffer exhausted: needed {needed} bytes but only {remaining} remain")]
    BufferExhausted { needed: usize, remaining: usize },

    /// A length or count prefix was negative
    #[error("Invalid negative length prefix {length}")]
    NegativeLength { length: i32 },

    /// A length does not fit in the `int32` prefix used on the wire
    #[error("Length {length} does not fit in an int32 prefix")]
    LengthOverflow { length: usize },

    /// String payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// A type tag byte did not name any variant of the expected type
    #[error("Unknown {type_name} tag {tag}")]
    UnknownTag { type_name: &'static str, tag: u8 },

    /// A boolean byte was neither 0 nor 1
    #[error("Invalid boolean byte {byte:#04x}")]
    InvalidBool { byte: u8 },

    /// Nested values went deeper than the reader allows
    #[error("Nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    /// A map carried the same key twice
    #[error("Duplicate key in map entry {index}")]
    DuplicateKey { index: usize },
}
