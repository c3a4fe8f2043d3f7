//! The operations that reset the collections and report what they removed.

use std::fmt;

use mongodb::bson::doc;
use prettytable::{Table, row};

use crate::{Database, collection::Collection, error::FixturesResult};

/// How [`clear_all`] behaves when the removal of a collection fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearMode {
    /// The first failure is returned and the remaining collections are left as-is.
    #[default]
    FailFast,
    /// Failures are saved in the report and the next collections are still cleared.
    KeepGoing,
}

/// The outcome of the removal of a single collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every document was removed. Contains the amount of deleted documents.
    Cleared(u64),
    /// The removal failed. Contains the error message.
    Failed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Cleared(n) => write!(f, "{n}"),
            Outcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// The per-collection result of a [`clear_all`] call, in the order the collections were cleared.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClearReport {
    /// The targeted collections with their outcome.
    pub entries: Vec<(Collection, Outcome)>,
}

impl ClearReport {
    /// Returns the total amount of deleted documents.
    pub fn total_deleted(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, outcome)| match outcome {
                Outcome::Cleared(n) => *n,
                Outcome::Failed(_) => 0,
            })
            .sum()
    }

    /// Returns an iterator over the collections that couldn't be cleared, with their error message.
    pub fn failures(&self) -> impl Iterator<Item = (Collection, &str)> {
        self.entries
            .iter()
            .filter_map(|(collection, outcome)| match outcome {
                Outcome::Failed(err) => Some((*collection, err.as_str())),
                Outcome::Cleared(_) => None,
            })
    }

    /// Returns true if every targeted collection was cleared.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Builds the table displayed by the `--report` flag.
    pub fn to_table(&self) -> Table {
        let mut table = Table::init(vec![row!["Collection", "Deleted"]]);
        for (collection, outcome) in &self.entries {
            table.add_row(row![collection, outcome]);
        }
        table.add_row(row!["total", self.total_deleted()]);
        table
    }
}

/// Removes every document of the provided collection, and returns the amount of deleted documents.
///
/// Clearing an empty or nonexistent collection is a no-op.
#[tracing::instrument(skip(db), fields(database = db.name()))]
pub async fn clear_collection(db: &Database, collection: Collection) -> FixturesResult<u64> {
    let result = db.collection(collection).delete_many(doc! {}).await?;
    tracing::debug!("Removed {} document(s)", result.deleted_count);
    Ok(result.deleted_count)
}

/// Clears the provided collections one after the other, in order.
///
/// Duplicated collections are only cleared once.
pub async fn clear_all<I>(
    db: &Database,
    collections: I,
    mode: ClearMode,
) -> FixturesResult<ClearReport>
where
    I: IntoIterator<Item = Collection>,
{
    let collections = crate::collection::dedup(collections);
    let mut report = ClearReport {
        entries: Vec::with_capacity(collections.len()),
    };

    for collection in collections {
        let outcome = match clear_collection(db, collection).await {
            Ok(n) => Outcome::Cleared(n),
            Err(e) if mode == ClearMode::KeepGoing => {
                tracing::warn!("Couldn't clear collection `{collection}`: {e}");
                Outcome::Failed(e.to_string())
            }
            Err(e) => return Err(e),
        };
        report.entries.push((collection, outcome));
    }

    tracing::info!(
        "Removed {} document(s) from {} collection(s) of database `{}`",
        report.total_deleted(),
        report.entries.len(),
        db.name(),
    );

    Ok(report)
}

/// Counts the documents of the provided collections without modifying them.
pub async fn count_all<I>(
    db: &Database,
    collections: I,
) -> FixturesResult<Vec<(Collection, u64)>>
where
    I: IntoIterator<Item = Collection>,
{
    let collections = crate::collection::dedup(collections);
    let mut out = Vec::with_capacity(collections.len());

    for collection in collections {
        let n = db.collection(collection).count_documents(doc! {}).await?;
        out.push((collection, n));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ClearMode, ClearReport, Outcome, clear_all};
    use crate::{Database, collection::Collection};

    fn report() -> ClearReport {
        ClearReport {
            entries: vec![
                (Collection::Orchestrator, Outcome::Cleared(12)),
                (Collection::Controller, Outcome::Failed("not authorized".to_owned())),
                (Collection::Cluster, Outcome::Cleared(3)),
            ],
        }
    }

    #[test]
    fn total_skips_failures() {
        assert_eq!(report().total_deleted(), 15);
    }

    #[test]
    fn failures() {
        let report = report();
        itertools::assert_equal(
            report.failures(),
            [(Collection::Controller, "not authorized")],
        );
        assert!(!report.is_success());
    }

    #[test]
    fn empty_report_is_success() {
        let report = ClearReport::default();
        assert!(report.is_success());
        assert_eq!(report.total_deleted(), 0);
    }

    #[test]
    fn table_lists_every_collection() {
        let table = report().to_table().to_string();
        for name in ["orchestrator", "controller", "cluster", "failed: not authorized", "15"] {
            assert!(table.contains(name), "missing `{name}` in:\n{table}");
        }
        // header, 3 entries, total
        assert_eq!(report().to_table().len(), 5);
    }

    #[tokio::test]
    async fn unreachable_server() -> anyhow::Result<()> {
        // Nothing listens on the port 9 (discard) of the local host.
        let db = Database::from_db_url(
            "mongodb://127.0.0.1:9/?connectTimeoutMS=200",
            "mco",
            Duration::from_millis(300),
        )
        .await?;

        assert!(
            clear_all(&db, Collection::ALL, ClearMode::FailFast)
                .await
                .is_err()
        );

        let report = clear_all(&db, Collection::ALL, ClearMode::KeepGoing).await?;
        itertools::assert_equal(
            report.failures().map(|(collection, _)| collection),
            Collection::ALL,
        );
        assert_eq!(report.total_deleted(), 0);

        Ok(())
    }
}
