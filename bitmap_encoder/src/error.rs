/*
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
 * If a copy of the MPL was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image does not fit the variant's geometry, or produced nothing.
    #[error("Could not convert {name}: {reason}")]
    Conversion { name: String, reason: String },

    #[error("Codec failure on {name}: {source}")]
    Codec {
        name: String,
        #[source]
        source: CodecError,
    },

    #[error("Cannot undo conversion of {name}: {reason}")]
    UnsupportedOperation { name: String, reason: String },

    #[error("Can't convert {name} ({reason})")]
    UnsupportedInput { name: String, reason: String },

    #[error("I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not saving {name}.png again: another image by that name was decoded earlier")]
    NameCollision { name: String },

    #[error("Failed to save {name}: {source}")]
    Save {
        name: String,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    pub fn conversion(name: &str, reason: impl Into<String>) -> Self {
        Self::Conversion {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn codec(name: &str, source: CodecError) -> Self {
        Self::Codec {
            name: name.to_owned(),
            source,
        }
    }

    pub fn unsupported_operation(name: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_input(name: &str, reason: impl ToString) -> Self {
        Self::UnsupportedInput {
            name: name.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn io(name: impl ToString, source: std::io::Error) -> Self {
        Self::Io {
            name: name.to_string(),
            source,
        }
    }

    /// Whether the batch may carry on with the next source after this error.
    ///
    /// Packing size mismatches mean an internal invariant broke, and abort the whole batch.
    pub fn is_per_item(&self) -> bool {
        !matches!(
            self,
            Self::Codec {
                source: CodecError::SizeMismatch { .. } | CodecError::WordCountMismatch { .. },
                ..
            }
        )
    }
}

/// Violations of the packing invariants, and bitmap data that cannot be read back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("size mismatch: {width}x{height} needs {expected} pixels, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("size mismatch: {width}x{height} needs {expected} words, got {actual}")]
    WordCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("legacy bitmap data needs a width and height before the words, got {0} values")]
    MissingDimensions(usize),

    #[error("malformed declaration on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
