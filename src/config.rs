//! Configuration management for the gallery gateway.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `GALLERY_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use gallery_gate::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! println!("Session store: {}", config.database_url);
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the `GALLERY_` prefix:
//!
//! - `GALLERY_HOST` - Server bind address (default: 0.0.0.0)
//! - `GALLERY_PORT` - Server port (default: 3000)
//! - `GALLERY_DATABASE_URL` - SQLite URL for the session store
//! - `GALLERY_ADMIN_SECRET` - Shared admin credential (required)
//! - `GALLERY_SESSION_LIFETIME_MS` - Session lifetime in ms (default: 86400000)
//! - `GALLERY_RATE_LIMIT_THRESHOLD` - Failures before lockout (default: 10)
//! - `GALLERY_CORS_ORIGINS` - Allowed CORS origins (comma-separated)

use clap::Parser;

use crate::session::{DEFAULT_FAILURE_THRESHOLD, DEFAULT_SESSION_LIFETIME_MS};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default SQLite URL for the session store.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:sessions.db?mode=rwc";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Gallery Gate - Session-based access control for a photo gallery server.
///
/// Mints opaque session tokens against a shared admin credential and guards
/// protected routes with a sticky per-address brute-force limiter.
#[derive(Parser, Debug, Clone)]
#[command(name = "gallery-gate")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "GALLERY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "GALLERY_PORT")]
    pub port: u16,

    // =========================================================================
    // Session Store Configuration
    // =========================================================================
    /// SQLite URL for the session store.
    #[arg(long, default_value = DEFAULT_DATABASE_URL, env = "GALLERY_DATABASE_URL")]
    pub database_url: String,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Shared admin credential, presented in the `admin-session` header.
    ///
    /// If not provided, the server will fail to start.
    #[arg(long, env = "GALLERY_ADMIN_SECRET")]
    pub admin_secret: Option<String>,

    /// Lifetime of newly minted sessions, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SESSION_LIFETIME_MS, env = "GALLERY_SESSION_LIFETIME_MS")]
    pub session_lifetime_ms: i64,

    /// Number of authentication failures a client address may accumulate
    /// before it is locked out for the remainder of the process lifetime.
    #[arg(long, default_value_t = DEFAULT_FAILURE_THRESHOLD, env = "GALLERY_RATE_LIMIT_THRESHOLD")]
    pub rate_limit_threshold: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "GALLERY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        // The admin credential is the only way to mint sessions; refusing to
        // start beats silently running an unusable server
        match self.admin_secret.as_deref() {
            None => {
                return Err(
                    "No admin secret provided. Set --admin-secret or GALLERY_ADMIN_SECRET"
                        .to_string(),
                );
            }
            Some(secret) if secret.is_empty() => {
                return Err("Admin secret must not be empty".to_string());
            }
            Some(_) => {}
        }

        if self.database_url.is_empty() {
            return Err(
                "Database URL is required. Set --database-url or GALLERY_DATABASE_URL".to_string(),
            );
        }

        if self.session_lifetime_ms <= 0 {
            return Err("session_lifetime_ms must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the admin secret, defaulting to empty (call validate() first).
    pub fn admin_secret_or_empty(&self) -> &str {
        self.admin_secret.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Tests
// =============================================================================
