use std::path::PathBuf;

use clap::Parser;

/// Chirpy: a small social API server
#[derive(Parser, Debug)]
#[command(name = "chirpy")]
#[command(version)]
pub struct Cli {
    /// Delete the database file before starting
    #[arg(long, env = "CHIRPY_DEBUG")]
    pub debug: bool,

    /// Secret used to sign access and refresh tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// API key expected on Polka webhooks
    #[arg(long, env = "POLKA_KEY", hide_env_values = true)]
    pub polka_key: Option<String>,

    /// Path of the JSON database file
    #[arg(long, default_value = "database.json", env = "CHIRPY_DB_PATH")]
    pub db_path: PathBuf,

    /// Bind address
    #[arg(long, default_value = "localhost", env = "CHIRPY_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080, env = "CHIRPY_PORT")]
    pub port: u16,

    /// Directory served under /app/
    #[arg(long, default_value = ".", env = "CHIRPY_FILE_ROOT")]
    pub file_root: PathBuf,
}
