//! Malware scan outcomes.

use std::fmt;

/// Why a scan could not produce a clean or infected answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanFailure {
    /// The file could not be opened or read.
    #[error("file unreadable: {0}")]
    FileUnreadable(String),
    /// The reference escaped the storage root.
    #[error("invalid file path: {0}")]
    InvalidPath(String),
    /// Connection, DNS, or body transfer failed.
    #[error("transport error: {0}")]
    Transport(String),
    /// The request exceeded the configured timeout.
    #[error("scan request timed out")]
    Timeout,
    /// The scanner answered with a non-success status.
    #[error("scanner returned HTTP {status}")]
    Server {
        /// HTTP status code returned.
        status: u16,
    },
    /// The body was not the expected JSON shape.
    #[error("malformed scanner response: {0}")]
    MalformedResponse(String),
}

/// Tri-state result of scanning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    /// No entry was flagged, or scanning is not configured.
    Clean,
    /// At least one entry was flagged.
    Infected {
        /// Signature names reported for the first flagged entry.
        signatures: Vec<String>,
    },
    /// The scan did not complete; callers must treat this as not clean.
    Undetermined {
        /// What went wrong.
        reason: ScanFailure,
    },
}

impl ScanVerdict {
    /// Only `Clean` is clean.
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    /// Short label for responses and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Infected { .. } => "infected",
            Self::Undetermined { .. } => "undetermined",
        }
    }
}

impl fmt::Display for ScanVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("clean"),
            Self::Infected { signatures } => write!(f, "infected ({})", signatures.join(", ")),
            Self::Undetermined { reason } => write!(f, "undetermined ({reason})"),
        }
    }
}
