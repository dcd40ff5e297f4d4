use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageType {
    File,
    Mongodb,
}

/// Server settings, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
pub struct Config {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Where the file store keeps pricing, allotments and quotes
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    #[arg(long, env = "TEMPLATES_DIR", default_value = "./data/templates")]
    pub templates_dir: PathBuf,

    #[arg(long, env = "STORAGE_TYPE", value_enum, default_value_t = StorageType::File)]
    pub storage_type: StorageType,

    #[arg(long, env = "MONGO_DB_HOST", default_value = "localhost")]
    pub mongo_db_host: String,

    #[arg(long, env = "MONGO_DB_PORT", default_value_t = 27017)]
    pub mongo_db_port: u16,

    /// Allowed browser origin, any origin when unset
    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Hours between background syncs, 0 turns them off
    #[arg(long, env = "SYNC_INTERVAL_HOURS", default_value_t = 24)]
    pub sync_interval_hours: u64,

    #[arg(long, env = "PRICING_URL")]
    pub pricing_url: Option<String>,

    #[arg(long, env = "ALLOTMENTS_URL")]
    pub allotments_url: Option<String>,

    #[arg(long, env = "SYNC_ON_STARTUP", default_value_t = true, action = ArgAction::Set)]
    pub sync_on_startup: bool,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
