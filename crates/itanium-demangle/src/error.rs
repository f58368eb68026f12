//! Demangling error types.

use thiserror::Error;

/// Error type for the fallible entry points.
///
/// Malformed encodings are not errors: the decoder recovers locally and
/// renders what it could decode. The only rejection is input that does not
/// carry the `_Z` marker at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DemangleError {
    /// The symbol does not start with the Itanium `_Z` prefix.
    #[error("not an Itanium C++ mangled name: {0:?}")]
    NotMangled(String),
}

impl DemangleError {
    /// Creates a new NotMangled error.
    pub fn not_mangled(symbol: impl Into<String>) -> Self {
        Self::NotMangled(symbol.into())
    }
}
