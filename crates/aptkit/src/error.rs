//! Error types for package operations.
//!
//! Errors are categorized by scraping tool stderr. Categories tell callers
//! whether a failure means "already converged" (ignorable) or is a real
//! problem; nothing here is retried.

use thiserror::Error;

/// Categories of package-manager errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related failure (mirror unreachable, DNS, timeout).
    Network,
    /// Package not found in any configured source.
    NotFound,
    /// Permission denied (forgot sudo, locked dpkg database).
    Permission,
    /// Package is already installed.
    AlreadyInstalled,
    /// Other/unknown failure.
    Other,
}

impl ErrorCategory {
    /// Whether this failure means the desired state is already reached.
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::AlreadyInstalled)
    }

    /// User-facing description of the category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Package not found",
            Self::Permission => "Permission denied",
            Self::AlreadyInstalled => "Already installed",
            Self::Other => "Unexpected error",
        }
    }
}

/// Errors from apt/nala/snap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related failure.
    #[error("network error: {message}")]
    Network {
        /// Stderr of the failed operation.
        message: String,
    },

    /// Package not found.
    #[error("package not found: {name}")]
    NotFound {
        /// Name of the missing package.
        name: String,
    },

    /// Permission denied.
    #[error("permission denied: {message}")]
    Permission {
        /// Details of the denied operation.
        message: String,
    },

    /// Package is already installed.
    #[error("already installed: {name}")]
    AlreadyInstalled {
        /// Name of the already-installed package.
        name: String,
    },

    /// Command exited non-zero for some other reason.
    #[error("{message}: {stderr}")]
    CommandFailed {
        /// What was being attempted.
        message: String,
        /// Stderr from the failed command.
        stderr: String,
    },

    /// Failure below the command layer (could not even spawn it).
    #[error("{0}")]
    Host(String),
}

impl Error {
    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Network { .. } => ErrorCategory::Network,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Permission { .. } => ErrorCategory::Permission,
            Error::AlreadyInstalled { .. } => ErrorCategory::AlreadyInstalled,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether this error can be treated as "already converged".
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        self.category().is_ignorable()
    }

    /// Classify a failed apt/nala invocation from its stderr.
    #[must_use]
    pub fn from_apt_output(stderr: &str, package: Option<&str>) -> Self {
        let lower = stderr.to_lowercase();

        if lower.contains("could not resolve")
            || lower.contains("temporary failure resolving")
            || lower.contains("failed to fetch")
            || lower.contains("connection timed out")
            || lower.contains("network is unreachable")
        {
            return Error::Network {
                message: stderr.trim().to_string(),
            };
        }

        if lower.contains("unable to locate package")
            || lower.contains("has no installation candidate")
        {
            return Error::NotFound {
                name: package.unwrap_or("unknown").to_string(),
            };
        }

        if lower.contains("is already the newest version") {
            return Error::AlreadyInstalled {
                name: package.unwrap_or("unknown").to_string(),
            };
        }

        if lower.contains("permission denied")
            || lower.contains("are you root")
            || lower.contains("could not get lock")
        {
            return Error::Permission {
                message: stderr.trim().to_string(),
            };
        }

        Error::CommandFailed {
            message: match package {
                Some(name) => format!("apt command failed for {name}"),
                None => "apt command failed".to_string(),
            },
            stderr: stderr.trim().to_string(),
        }
    }

    /// Classify a failed snap invocation from its stderr.
    #[must_use]
    pub fn from_snap_output(stderr: &str, package: Option<&str>) -> Self {
        let lower = stderr.to_lowercase();

        if lower.contains("cannot connect")
            || lower.contains("network")
            || lower.contains("timeout")
        {
            return Error::Network {
                message: stderr.trim().to_string(),
            };
        }

        if lower.contains("not found") {
            return Error::NotFound {
                name: package.unwrap_or("unknown").to_string(),
            };
        }

        if lower.contains("already installed") {
            return Error::AlreadyInstalled {
                name: package.unwrap_or("unknown").to_string(),
            };
        }

        Error::CommandFailed {
            message: match package {
                Some(name) => format!("snap command failed for {name}"),
                None => "snap command failed".to_string(),
            },
            stderr: stderr.trim().to_string(),
        }
    }
}

/// Result type for package operations.
pub type Result<T> = std::result::Result<T, Error>;
