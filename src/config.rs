use clap::Parser;
use std::path::PathBuf;

/// Combat log upload and rename server
#[derive(Debug, Clone, Parser)]
#[command(name = "logrenamer", version, about)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "LOGRENAMER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (hosting platforms set `PORT`)
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory that stores renamed logs (served under /logs)
    #[arg(long, env = "LOGRENAMER_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Directory holding the upload form and other static files
    #[arg(long, env = "LOGRENAMER_PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Largest accepted request body, in MiB
    #[arg(long, env = "LOGRENAMER_MAX_UPLOAD_MB", default_value_t = 100)]
    pub max_upload_mb: usize,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
