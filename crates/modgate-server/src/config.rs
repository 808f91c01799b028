//! Server configuration.
//!
//! Every option can be given as a flag or through the environment.

use std::path::PathBuf;

use clap::{Args, Parser};

/// ModGate moderation server.
#[derive(Parser, Debug, Clone)]
#[command(name = "modgate-server", about = "Asynchronous image moderation service")]
pub struct Config {
    /// HTTP server address
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8055")]
    pub http_addr: String,

    /// Folder that submitted filenames are resolved against
    #[arg(long, env = "INPUT_FOLDER", default_value = "/data/input")]
    pub input_folder: PathBuf,

    /// Number of classification workers
    #[arg(
        long = "workers",
        env = "WORKER_COUNT",
        default_value_t = 2,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub worker_count: u32,

    /// Maximum number of tasks waiting in the queue
    #[arg(
        long,
        env = "QUEUE_CAPACITY",
        default_value_t = 1024,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub queue_capacity: u32,

    /// Base URL of the captioning / NSFW model server
    #[arg(long, env = "MODEL_SERVER_URL", default_value = "http://127.0.0.1:8500")]
    pub model_server_url: String,

    /// Per-request timeout for the model server (seconds)
    #[arg(long, env = "MODEL_TIMEOUT_SECS", default_value_t = 60)]
    pub model_timeout_secs: u64,

    /// Newline-separated profanity word list (built-in list if unset)
    #[arg(long, env = "PROFANITY_WORDS")]
    pub profanity_words: Option<PathBuf>,

    #[command(flatten)]
    pub datastore: DatastoreConfig,
}

/// Connection parameters for the moderation-status datastore.
#[derive(Args, Debug, Clone)]
pub struct DatastoreConfig {
    /// Do not mirror verdicts to the datastore
    #[arg(long = "no-datastore", env = "NO_DATASTORE")]
    pub disabled: bool,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "image_db")]
    pub db_name: String,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "postgres", hide_env_values = true)]
    pub db_password: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,
}
