//! Error types for anvil-nbt.

use thiserror::Error;

use crate::tag::TagType;

/// NBT codec error types.
#[derive(Debug, Error)]
pub enum NbtError {
    /// IO error while reading or writing, including truncated input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag id outside the known range.
    #[error("Unknown tag id: {0}")]
    UnknownTag(u8),

    /// The root of a document was not a compound.
    #[error("Root tag must be a compound, found {0:?}")]
    RootNotCompound(TagType),

    /// Array or list carried a negative length.
    #[error("Negative length: {0}")]
    NegativeLength(i32),

    /// Nesting exceeded the decoder limit.
    #[error("Nesting deeper than {0} levels")]
    TooDeep(usize),

    /// String bytes were not valid modified UTF-8.
    #[error("Invalid modified UTF-8 string")]
    InvalidString,

    /// String too long for the 16-bit length prefix.
    #[error("String too long to encode: {0} bytes")]
    StringTooLong(usize),

    /// A list item did not match the list's element type.
    #[error("List declared as {expected:?} holds a {found:?}")]
    MixedList { expected: TagType, found: TagType },

    /// Collection too long for a 32-bit length prefix.
    #[error("Collection too long to encode: {0} elements")]
    TooLong(usize),
}

/// Result type for NBT operations.
pub type Result<T> = std::result::Result<T, NbtError>;
