use std::{env, panic};

use anyhow::Context as _;
use fixtures_lib::{Database, DbEnv, collection::Collection};
use futures::FutureExt as _;
use mkenv::prelude::*;
use mongodb::{
    Client,
    bson::{Document, doc},
};
use tracing_subscriber::fmt::TestWriter;

fn is_db_drop_forced() -> bool {
    env::args_os().any(|arg| arg == "--force-drop-db")
}

pub trait IntoResult {
    type Out;

    fn into_result(self) -> anyhow::Result<Self::Out>;
}

impl IntoResult for () {
    type Out = ();

    fn into_result(self) -> anyhow::Result<Self::Out> {
        Ok(())
    }
}

impl<T, E> IntoResult for Result<T, E>
where
    anyhow::Error: From<E>,
{
    type Out = T;

    fn into_result(self) -> anyhow::Result<Self::Out> {
        self.map_err(From::from)
    }
}

pub fn init_env() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => return Err(err).context("cannot retrieve .env files"),
        _ => (),
    }

    let _ = tracing_subscriber::fmt()
        .with_writer(TestWriter::new())
        .try_init();

    Ok(())
}

/// Inserts `n` placeholder documents in the provided collection.
pub async fn seed(db: &Database, collection: Collection, n: usize) -> anyhow::Result<()> {
    if n == 0 {
        return Ok(());
    }
    let docs = (0..n).map(|i| doc! { "key": format!("{collection}-{i}"), "value": i as i64 });
    db.collection(collection).insert_many(docs).await?;
    Ok(())
}

/// Inserts `n` placeholder documents in a collection which isn't part of the catalogue.
pub async fn seed_foreign(db: &Database, name: &str, n: usize) -> anyhow::Result<()> {
    if n == 0 {
        return Ok(());
    }
    let docs = (0..n).map(|i| doc! { "key": format!("{name}-{i}") });
    db.db.collection::<Document>(name).insert_many(docs).await?;
    Ok(())
}

/// Runs the provided test against a freshly created database, which is dropped afterwards.
pub async fn wrap<F, R>(test: F) -> anyhow::Result<<R as IntoResult>::Out>
where
    F: AsyncFnOnce(Database) -> R,
    R: IntoResult,
{
    init_env()?;
    let env = DbEnv::define();

    let client = Client::with_uri_str(env.mongo_url.mongo_url.get()).await?;

    // MongoDB treats database names case-insensitively when checking for conflicts.
    let db_name = format!(
        "_test_db_{}",
        fixtures_lib::gen_random_str(10).to_lowercase()
    );
    let db = Database::from_client(client, &db_name);
    tracing::info!("Using database {db_name}");

    let r = panic::AssertUnwindSafe(test(db.clone()))
        .catch_unwind()
        .await;

    if is_db_drop_forced() {
        db.db.drop().await?;
        tracing::info!("Database {db_name} force-deleted");
        match r {
            Ok(r) => r.into_result(),
            Err(e) => {
                tracing::info!("Test failed");
                panic::resume_unwind(e)
            }
        }
    } else {
        match r.map(IntoResult::into_result) {
            Ok(Ok(out)) => {
                db.db.drop().await?;
                Ok(out)
            }
            other => {
                tracing::info!(
                    "Test failed, leaving database {db_name} as-is. \
                    Run with `--force-drop-db` to drop the database everytime."
                );
                match other {
                    Ok(Err(e)) => Err(e),
                    Err(e) => panic::resume_unwind(e),
                    _ => unreachable!(),
                }
            }
        }
    }
}
