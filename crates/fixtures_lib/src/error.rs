//! A module containing the [`FixturesError`] enum, which contains the errors of this crate.

/// Represents any type of error that could happen when using this crate.
#[derive(thiserror::Error, Debug)]
pub enum FixturesError {
    /// An error that happened when interacting with the MongoDB server.
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    /// The provided name doesn't belong to the known orchestrator collections.
    #[error("unknown collection `{0}`")]
    UnknownCollection(
        /// The provided collection name.
        String,
    ),
}

/// Represents the result type of the fallible operations of this crate.
pub type FixturesResult<T = ()> = Result<T, FixturesError>;
