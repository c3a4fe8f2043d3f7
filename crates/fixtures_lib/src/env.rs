use std::time::Duration;

mkenv::make_config! {
    /// The environment used to set up a connection to the MongoDB server.
    pub struct MongoUrlEnv {
        /// The MongoDB connection string.
        pub mongo_url: {
            var_name: "MONGODB_URL",
            layers: [
                or_default_val(|| crate::DEFAULT_MONGODB_URL.to_owned()),
            ],
            description: "The URL to the MongoDB server",
            default_val_fmt: "mongodb://localhost:27017",
        }
    }
}

mkenv::make_config! {
    /// The environment used to select the logical database holding the fixtures.
    pub struct DbNameEnv {
        /// The name of the logical database.
        pub db_name: {
            var_name: "MONGODB_DATABASE",
            layers: [
                or_default_val(|| crate::DEFAULT_DATABASE_NAME.to_owned()),
            ],
            description: "The name of the database containing the orchestrator collections",
            default_val_fmt: "mco",
        }
    }
}

mkenv::make_config! {
    /// The environment used to set up a connection to the orchestrator database.
    pub struct DbEnv {
        /// The environment for the MongoDB server.
        pub mongo_url: { MongoUrlEnv },
        /// The environment for the logical database.
        pub db_name: { DbNameEnv },
    }
}

mkenv::make_config! {
    /// The environment used by this crate.
    pub struct LibEnv {
        /// How long the driver waits for a reachable server before failing an operation.
        pub server_selection_timeout: {
            var_name: "MONGODB_SERVER_SELECTION_TIMEOUT",
            layers: [
                parsed<Duration>(|input| {
                    input.parse().map(Duration::from_secs).map_err(From::from)
                }),
                or_default_val(|| Duration::from_secs(30)),
            ],
            description: "The time to wait for a reachable MongoDB server, in seconds",
            default_val_fmt: "30s",
        }
    }
}
