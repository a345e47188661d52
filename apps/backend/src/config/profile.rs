//! Runtime profile (`APP_PROFILE`) and the environment it implies.

use std::env;
use std::fmt;

use crate::config::var_or;

pub const DEFAULT_PROFILE: &str = "default";

/// Deployment environment derived from the profile name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
    Test,
    LocalDevelopment,
    Unknown,
}

impl Environment {
    /// Human-readable label served by the environment endpoint.
    pub fn label(self) -> &'static str {
        match self {
            Environment::Production => "Production",
            Environment::Development => "Development",
            Environment::Test => "Test",
            Environment::LocalDevelopment => "Local Development",
            Environment::Unknown => "Unknown",
        }
    }

    /// Upper-case label used in the startup banner.
    pub fn banner_label(self) -> &'static str {
        match self {
            Environment::Production => "PRODUCTION",
            Environment::Development => "DEVELOPMENT",
            Environment::Test => "TEST",
            Environment::LocalDevelopment => "LOCAL DEVELOPMENT",
            Environment::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeProfile {
    name: String,
    codespaces: bool,
}

impl RuntimeProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codespaces: false,
        }
    }

    /// Mark the process as running inside GitHub Codespaces.
    pub fn with_codespaces(mut self, codespaces: bool) -> Self {
        self.codespaces = codespaces;
        self
    }

    /// Reads `APP_PROFILE` (default `default`) and the `CODESPACES` marker.
    pub fn from_env() -> Self {
        Self::new(var_or("APP_PROFILE", DEFAULT_PROFILE))
            .with_codespaces(env::var_os("CODESPACES").is_some())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Development mode permits every request regardless of authentication.
    pub fn is_development(&self) -> bool {
        self.codespaces || self.name.contains("local") || self.name.contains("dev")
    }

    /// First match wins: prod, dev, test, local.
    pub fn environment(&self) -> Environment {
        if self.name.contains("prod") {
            Environment::Production
        } else if self.name.contains("dev") {
            Environment::Development
        } else if self.name.contains("test") {
            Environment::Test
        } else if self.name.contains("local") {
            Environment::LocalDevelopment
        } else {
            Environment::Unknown
        }
    }
}

impl Default for RuntimeProfile {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE)
    }
}
