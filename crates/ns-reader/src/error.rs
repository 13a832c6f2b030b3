use std::io;

use thiserror::Error;

use crate::{disk_loc::DiskLoc, layout::FILE_SIZE_MULTIPLE};

/// Errors raised while decoding namespace and data files.
///
/// Every positional variant carries an absolute byte offset into the file
/// being read.
#[derive(Error, Debug)]
pub enum NsReadError {
    /// Namespace file length is zero or not a multiple of 1 MiB.
    #[error("file size {size} must be a positive multiple of {multiple}", multiple = FILE_SIZE_MULTIPLE)]
    InvalidFileSize { size: u64 },

    /// Fewer bytes were available than a fixed-width read required.
    #[error("short read at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// Missing null terminator or a length field that cannot be right.
    #[error("malformed record at offset {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    /// A decoded count field disagrees with the fixed on-disk schema.
    #[error("{field} at offset {offset} is {value}, expected 0..={max}")]
    ConfigInconsistent {
        offset: u64,
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("refusing to dereference null location {loc}")]
    NullLocation { loc: DiskLoc },

    #[error("io error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The record payload is not a valid document.
    #[error("document decode error at offset {offset}: {message}")]
    Decode { offset: u64, message: String },
}

pub type NsReadResult<T> = std::result::Result<T, NsReadError>;

impl NsReadError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        NsReadError::Io {
            context: context.into(),
            source,
        }
    }

    /// Shifts a block-relative offset onto the absolute position of the block.
    pub(crate) fn rebase(self, base: u64) -> Self {
        match self {
            NsReadError::ShortRead {
                offset,
                expected,
                actual,
            } => NsReadError::ShortRead {
                offset: base + offset,
                expected,
                actual,
            },
            NsReadError::MalformedRecord { offset, reason } => NsReadError::MalformedRecord {
                offset: base + offset,
                reason,
            },
            NsReadError::ConfigInconsistent {
                offset,
                field,
                value,
                max,
            } => NsReadError::ConfigInconsistent {
                offset: base + offset,
                field,
                value,
                max,
            },
            NsReadError::Decode { offset, message } => NsReadError::Decode {
                offset: base + offset,
                message,
            },
            other => other,
        }
    }

    /// True for damage confined to a single hash slot, which a scan may skip.
    pub fn is_slot_corruption(&self) -> bool {
        matches!(
            self,
            NsReadError::MalformedRecord { .. } | NsReadError::ConfigInconsistent { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_shifts_positional_variants_only() {
        let err = NsReadError::ConfigInconsistent {
            offset: 188,
            field: "number_indexes",
            value: 11,
            max: 10,
        }
        .rebase(132);
        assert!(matches!(
            err,
            NsReadError::ConfigInconsistent { offset: 320, .. }
        ));

        let err = NsReadError::InvalidFileSize { size: 7 }.rebase(1000);
        assert!(matches!(err, NsReadError::InvalidFileSize { size: 7 }));
    }

    #[test]
    fn slot_corruption_classification() {
        let malformed = NsReadError::MalformedRecord {
            offset: 0,
            reason: "x".into(),
        };
        let short = NsReadError::ShortRead {
            offset: 0,
            expected: 628,
            actual: 3,
        };
        assert!(malformed.is_slot_corruption());
        assert!(!short.is_slot_corruption());
    }
}
