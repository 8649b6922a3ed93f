use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Keep a shelf of books behind a small HTTP API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),
}

/// Deployment environment; picks the default database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Database used when no explicit URL is configured.
    pub const fn default_database_url(self) -> Option<&'static str> {
        match self {
            Environment::Development => Some("sqlite://bookshelf.db"),
            Environment::Test => Some("sqlite::memory:"),
            Environment::Production => None,
        }
    }

    pub const fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "BOOKSHELF_BIND_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind_host: IpAddr,

    #[arg(long, env = "BOOKSHELF_ENV", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,

    /// Overrides the environment's default database
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "BOOKSHELF_INSECURE_COOKIES")]
    pub insecure_cookies: bool,
}

impl ServeCommand {
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }

    pub fn database_url(&self) -> anyhow::Result<String> {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }

        self.environment
            .default_database_url()
            .map(String::from)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "DATABASE_URL must be set in the {} environment",
                    self.environment
                )
            })
    }

    /// Plain-HTTP cookies are always allowed outside production.
    pub fn insecure_cookies(&self) -> bool {
        self.insecure_cookies || !self.environment.is_production()
    }
}
