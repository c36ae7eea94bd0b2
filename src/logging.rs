//! Logging setup.
//!
//! Structured logging through `tracing`, with three output profiles. `RUST_LOG`
//! overrides the profile's default filter when set.

use tracing_subscriber::EnvFilter;

/// Log output profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogProfile {
    /// Human-readable output at debug level.
    #[default]
    Local,
    /// JSON output at debug level.
    Dev,
    /// JSON output at info level.
    Prod,
}

impl LogProfile {
    /// Parses `local` / `dev` / `prod`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "dev" => Some(Self::Dev),
            "prod" => Some(Self::Prod),
            _ => None,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub const fn default_directive(self) -> &'static str {
        match self {
            Self::Local | Self::Dev => "debug",
            Self::Prod => "info",
        }
    }

    /// Returns true if this profile emits JSON lines.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Dev | Self::Prod)
    }
}

/// Initialize the global subscriber for `profile`.
///
/// Later calls are no-ops, so tests and embedders may call this freely.
pub fn init_logger(profile: LogProfile) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // try_init fails only when a subscriber is already installed.
    let _ = if profile.is_json() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
