// Errors produced by the search index.
//
// There are no recoverable failures inside the core: a rejected
// operation never partially mutates state. "Not found" and "empty
// input" are ordinary outcomes, represented as plain values
// (`false`, `Vec::new()`) rather than as `Err` variants.

/// Errors that can occur while configuring or using a [`crate::SearchIndex`].
#[derive(Debug, Clone)]
pub enum Error {
    /// A supplied configuration value was invalid, or a user callback
    /// returned an invalid value or panicked when probed at build time.
    InvalidConfig(String),

    /// An argument passed to a live operation was invalid (e.g. a
    /// limit that cannot be represented after validation).
    InvalidArgument(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchIndexError: {self:?}")
    }
}

impl std::error::Error for Error {}

/// Search index result type.
pub type Result<T> = std::result::Result<T, Error>;
