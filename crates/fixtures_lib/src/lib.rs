//! The library behind the fixture reset tool of the orchestrator test suites.
//!
//! The orchestrator services store their state in a MongoDB database. Between two test runs,
//! the collections written by these services must be emptied, so that every run starts from
//! a clean state. This crate contains the environment setup, the catalogue of these collections,
//! and the operations clearing them.
//!
//! If you wish to see the command line program itself, take a look at the
//! [`reset_fixtures`](../reset_fixtures/index.html) package.

#![warn(missing_docs)]

mod env;

pub mod clear;
pub mod collection;
pub mod error;
pub mod pool;

pub use env::*;
pub use pool::Database;

use rand::Rng as _;

/// The URL used when none is configured: the default MongoDB port on the local host.
pub const DEFAULT_MONGODB_URL: &str = "mongodb://localhost:27017";

/// The logical database of the orchestrator services.
pub const DEFAULT_DATABASE_NAME: &str = "mco";

/// The line printed once all the collections have been cleared.
pub const CONFIRMATION_MESSAGE: &str = "Cleared tables";

/// Returns a randomly-generated string with the `len` length. It contains alphanumeric characters.
pub fn gen_random_str(len: usize) -> String {
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .map(char::from)
        .take(len)
        .collect()
}
