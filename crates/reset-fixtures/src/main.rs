//! Resets the fixtures of the orchestrator test suites.
//!
//! Without any argument, the program empties every orchestrator collection of the `mco` database
//! on the local MongoDB server, then prints a confirmation line.

use std::io::{self, Write};

use anyhow::Context as _;
use clap::Parser as _;
use fixtures_lib::{Database, DbEnv, LibEnv, collection::Collection};
use mkenv::prelude::*;
use tracing_subscriber::EnvFilter;

use self::{clear::ClearCommand, count::CountCommand};

mod clear;
mod count;

#[derive(clap::Parser, Debug)]
#[command(version, about = "Empties the orchestrator collections between test runs")]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Remove every document of the collections (default).
    Clear(ClearCommand),
    /// Print the amount of documents of the collections, without modifying them.
    Count(CountCommand),
    /// Print the known collections and the service writing into each of them.
    List,
}

mkenv::make_config! {
    struct Env {
        db_env: { DbEnv },
        lib_env: { LibEnv },
    }
}

/// Returns the collections to work on: the provided ones, or all of them.
fn targets(collections: Vec<Collection>) -> Vec<Collection> {
    if collections.is_empty() {
        Collection::ALL.to_vec()
    } else {
        collections
    }
}

fn list<W: Write>(out: &mut W) -> io::Result<()> {
    for collection in Collection::ALL {
        writeln!(out, "{collection}\t{}", collection.owner())?;
    }
    Ok(())
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => Err(err).context("cannot retrieve .env file"),
        _ => Ok(()),
    }
}

fn setup_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("unable to init tracing_subscriber: {e}"))
}

async fn connect() -> anyhow::Result<Database> {
    let env = Env::define();
    env.try_init().map_err(|e| anyhow::anyhow!("{e}"))?;

    let db_url = env.db_env.mongo_url.mongo_url.get();
    let db_name = env.db_env.db_name.db_name.get();

    let db = Database::from_db_url(
        &db_url,
        &db_name,
        env.lib_env.server_selection_timeout.get(),
    )
    .await
    .context("couldn't set up the MongoDB client")?;

    tracing::info!("Using database `{db_name}`");

    Ok(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv()?;
    setup_tracing()?;
    let args = Args::parse();
    let mut stdout = io::stdout().lock();

    match args
        .command
        .unwrap_or_else(|| Command::Clear(ClearCommand::default()))
    {
        Command::Clear(cmd) => clear::clear(&connect().await?, cmd, &mut stdout).await,
        Command::Count(cmd) => count::count(&connect().await?, cmd, &mut stdout).await,
        Command::List => list(&mut stdout).map_err(From::from),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser as _;
    use fixtures_lib::{Database, collection::Collection};

    use super::{Args, ClearCommand, Command, clear};

    #[test]
    fn no_subcommand() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["reset-fixtures"])?;
        assert!(args.command.is_none());
        Ok(())
    }

    #[test]
    fn parse_clear() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "reset-fixtures",
            "clear",
            "cluster",
            "CloudConfig",
            "--keep-going",
        ])?;
        let Some(Command::Clear(cmd)) = args.command else {
            panic!("expected the clear command");
        };
        assert_eq!(
            cmd.collections,
            [Collection::Cluster, Collection::CloudConfig]
        );
        assert!(cmd.keep_going);
        assert!(!cmd.report);
        Ok(())
    }

    #[test]
    fn reject_unknown_collection() {
        assert!(Args::try_parse_from(["reset-fixtures", "clear", "users"]).is_err());
        assert!(Args::try_parse_from(["reset-fixtures", "count", "users"]).is_err());
    }

    #[test]
    fn default_targets() {
        assert_eq!(super::targets(Vec::new()), Collection::ALL);
        assert_eq!(
            super::targets(vec![Collection::Resource]),
            [Collection::Resource]
        );
    }

    #[test]
    fn list_every_collection() -> anyhow::Result<()> {
        let mut out = Vec::new();
        super::list(&mut out)?;
        let out = String::from_utf8(out)?;
        assert_eq!(out.lines().count(), Collection::ALL.len());
        assert!(out.contains("cloudconfig\tdcm"));
        Ok(())
    }

    #[tokio::test]
    async fn no_confirmation_when_unreachable() -> anyhow::Result<()> {
        // Nothing listens on the port 9 (discard) of the local host.
        let db = Database::from_db_url("mongodb://127.0.0.1:9", "mco", Duration::from_millis(300))
            .await?;

        let mut out = Vec::new();
        let result = clear::clear(&db, Default::default(), &mut out).await;

        assert!(result.is_err());
        assert!(out.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn keep_going_confirms_then_fails() -> anyhow::Result<()> {
        let db = Database::from_db_url("mongodb://127.0.0.1:9", "mco", Duration::from_millis(300))
            .await?;

        let mut out = Vec::new();
        let cmd = ClearCommand {
            collections: vec![Collection::Cluster, Collection::CloudConfig],
            keep_going: true,
            ..Default::default()
        };
        let err = match clear::clear(&db, cmd, &mut out).await {
            Ok(()) => panic!("clearing an unreachable database should fail"),
            Err(e) => e.to_string(),
        };

        assert_eq!(String::from_utf8(out)?, "Cleared tables\n");
        assert!(err.contains("cluster, cloudconfig"), "unexpected error: {err}");
        Ok(())
    }

    #[cfg(feature = "live-db")]
    #[tokio::test]
    async fn confirmation_printed_once() -> anyhow::Result<()> {
        test_env::wrap(async |db| {
            test_env::seed(&db, Collection::Controller, 2).await?;

            let mut out = Vec::new();
            clear::clear(&db, Default::default(), &mut out).await?;
            assert_eq!(String::from_utf8(out)?, "Cleared tables\n");

            let counts = fixtures_lib::clear::count_all(&db, Collection::ALL).await?;
            assert!(counts.iter().all(|(_, n)| *n == 0));

            anyhow::Ok(())
        })
        .await
    }
}
