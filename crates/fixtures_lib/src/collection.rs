//! The catalogue of the orchestrator collections that get reset between test runs.
//!
//! Only the collections listed here can be targeted. Any other collection of the database is
//! never touched, even when it holds test data.

use std::{fmt, str::FromStr};

use crate::error::FixturesError;

/// A collection of the orchestrator database holding test fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Projects, composite apps, profiles, intents and deployment groups.
    Orchestrator,
    /// The registered controllers.
    Controller,
    /// The customizations of the generic action controller.
    Customization,
    /// The resources of the generic action controller.
    Resource,
    /// Cluster providers, clusters and their labels.
    Cluster,
    /// The kubeconfigs of the logical clouds.
    CloudConfig,
}

impl Collection {
    /// All the collections, in the order they are cleared by default.
    pub const ALL: [Self; 6] = [
        Self::Orchestrator,
        Self::Controller,
        Self::Customization,
        Self::Resource,
        Self::Cluster,
        Self::CloudConfig,
    ];

    /// Returns the name of the collection in the database.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Controller => "controller",
            Self::Customization => "customization",
            Self::Resource => "resource",
            Self::Cluster => "cluster",
            Self::CloudConfig => "cloudconfig",
        }
    }

    /// Returns the name of the service writing into this collection.
    pub const fn owner(self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Controller | Self::Customization | Self::Resource => "genericactioncontroller",
            Self::Cluster => "clm",
            Self::CloudConfig => "dcm",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = FixturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FixturesError::UnknownCollection(s.to_owned()))
    }
}

/// Removes the duplicates of the provided collections, keeping the first occurrence of each.
pub fn dedup<I>(collections: I) -> Vec<Collection>
where
    I: IntoIterator<Item = Collection>,
{
    let mut out = Vec::with_capacity(Collection::ALL.len());
    for collection in collections {
        if !out.contains(&collection) {
            out.push(collection);
        }
    }
    out
}
