//! Contains the type representing the connection to the orchestrator database.

use std::time::Duration;

use mongodb::{
    Client,
    bson::{Document, doc},
    options::ClientOptions,
};

use crate::{collection::Collection, error::FixturesResult};

/// The application name sent to the server during the handshake.
pub const APP_NAME: &str = "reset-fixtures";

const FORBIDDEN_DB_NAME_CHARS: &[char] = &['/', '\\', '.', ' ', '"', '$', '\0'];

const MAX_DB_NAME_LEN: usize = 63;

/// Represents the logical database holding the orchestrator collections.
#[derive(Clone, Debug)]
pub struct Database {
    /// The selected logical database.
    pub db: mongodb::Database,
}

/// The error raised by the creation of a [`Database`].
#[derive(Debug, thiserror::Error)]
pub enum DatabaseCreationError {
    /// Error raised when parsing the URL or building the client.
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    /// The database name can't be used by MongoDB.
    #[error("invalid database name `{0}`")]
    InvalidName(String),
}

fn check_db_name(db_name: &str) -> Result<(), DatabaseCreationError> {
    if db_name.is_empty()
        || db_name.len() > MAX_DB_NAME_LEN
        || db_name.contains(FORBIDDEN_DB_NAME_CHARS)
    {
        return Err(DatabaseCreationError::InvalidName(db_name.to_owned()));
    }
    Ok(())
}

/// Parses the URL into the options of the client.
///
/// A `serverSelectionTimeoutMS` option present in the URL takes precedence over the provided
/// `server_selection_timeout`.
pub async fn client_options(
    db_url: &str,
    server_selection_timeout: Duration,
) -> Result<ClientOptions, DatabaseCreationError> {
    let mut options = ClientOptions::parse(db_url).await?;
    options.app_name = Some(APP_NAME.to_owned());
    options
        .server_selection_timeout
        .get_or_insert(server_selection_timeout);
    Ok(options)
}

impl Database {
    /// Returns the database from the URL to the MongoDB server and the name of the logical database.
    ///
    /// The client connects lazily: an unreachable server is only reported by the first operation,
    /// once `server_selection_timeout` has elapsed.
    pub async fn from_db_url(
        db_url: &str,
        db_name: &str,
        server_selection_timeout: Duration,
    ) -> Result<Self, DatabaseCreationError> {
        check_db_name(db_name)?;

        let options = client_options(db_url, server_selection_timeout).await?;
        let client = Client::with_options(options)?;
        Ok(Self::from_client(client, db_name))
    }

    /// Selects the logical database on an existing client.
    pub fn from_client(client: Client, db_name: &str) -> Self {
        Self {
            db: client.database(db_name),
        }
    }

    /// Returns the name of the selected logical database.
    #[inline]
    pub fn name(&self) -> &str {
        self.db.name()
    }

    /// Checks that the server is reachable.
    pub async fn ping(&self) -> FixturesResult {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Returns the handle to the provided collection.
    #[inline]
    pub fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(collection.name())
    }
}
