use std::io::Write;

use anyhow::Context as _;
use fixtures_lib::{Database, clear::count_all, collection::Collection};

#[derive(clap::Args, Debug)]
pub struct CountCommand {
    /// The collections to inspect. All of them are inspected if none is provided.
    collections: Vec<Collection>,
}

pub async fn count<W: Write>(
    db: &Database,
    CountCommand { collections }: CountCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    let counts = count_all(db, crate::targets(collections))
        .await
        .with_context(|| format!("couldn't count the documents of database `{}`", db.name()))?;

    writeln!(out, "{}", counts_table(counts))?;

    Ok(())
}

fn counts_table(counts: Vec<(Collection, u64)>) -> prettytable::Table {
    let mut table =
        prettytable::Table::init(vec![prettytable::row!["Collection", "Documents"]]);

    for (collection, n) in counts {
        table.add_row(prettytable::row![collection, n]);
    }

    table
}

#[cfg(test)]
mod tests {
    use fixtures_lib::collection::Collection;

    use super::counts_table;

    #[test]
    fn table_has_header_and_rows() {
        let table = counts_table(vec![(Collection::Cluster, 4), (Collection::Resource, 0)]);
        assert_eq!(table.len(), 3);

        let rendered = table.to_string();
        for text in ["Collection", "Documents", "cluster", "4", "resource"] {
            assert!(rendered.contains(text), "missing `{text}` in:\n{rendered}");
        }
    }
}
