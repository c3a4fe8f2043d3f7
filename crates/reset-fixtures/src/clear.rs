use std::io::Write;

use anyhow::Context as _;
use fixtures_lib::{
    CONFIRMATION_MESSAGE, Database,
    clear::{ClearMode, clear_all},
    collection::Collection,
};
use itertools::Itertools as _;

#[derive(clap::Args, Debug, Default)]
pub struct ClearCommand {
    /// The collections to clear. All of them are cleared if none is provided.
    pub collections: Vec<Collection>,

    /// Keep clearing the next collections when one of them fails.
    #[arg(long)]
    pub keep_going: bool,

    /// Print the amount of deleted documents of each collection.
    #[arg(long)]
    pub report: bool,
}

pub async fn clear<W: Write>(
    db: &Database,
    ClearCommand {
        collections,
        keep_going,
        report: print_report,
    }: ClearCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    let mode = if keep_going {
        ClearMode::KeepGoing
    } else {
        ClearMode::FailFast
    };

    let report = clear_all(db, crate::targets(collections), mode)
        .await
        .with_context(|| format!("couldn't clear the collections of database `{}`", db.name()))?;

    if print_report {
        writeln!(out, "{}", report.to_table())?;
    }

    // Every removal has been issued at this point, even if some of them failed.
    writeln!(out, "{CONFIRMATION_MESSAGE}")?;

    if !report.is_success() {
        anyhow::bail!(
            "couldn't clear collection(s): {}",
            report.failures().map(|(collection, _)| collection).join(", ")
        );
    }

    Ok(())
}
