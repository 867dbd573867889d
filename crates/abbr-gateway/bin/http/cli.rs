use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DATABASE_PATH_ENV: &str = "ABBR_DATABASE_PATH";
pub const LISTEN_ADDR_ENV: &str = "ABBR_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "ABBR_PUBLIC_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "ABBR_LOG_FORMAT";

pub const DEFAULT_DATABASE_PATH: &str = "abbr.db";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "abbr", about = "URL shortener backed by SQLite")]
pub struct CLI {
    /// Path of the SQLite database file.
    #[arg(long, global = true, env = DATABASE_PATH_ENV, default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    Serve {
        #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
        listen_addr: SocketAddr,

        /// Base URL used to render short links.
        #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
        public_base_url: String,
    },
    /// Create the database schema.
    InitDb,
}
