//! Exit code definitions for the ojs CLI
//!
//! Scripts depend on these values. Changing them is a breaking change.

/// Exit codes for the ojs CLI application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// The operation failed: network, server, authentication or local IO
    Error = 1,

    /// Invalid flags, arguments or path format
    ParseFlagError = 2,

    /// Usage text was printed instead of running a command
    Usage = 3,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::Error),
            2 => Some(Self::ParseFlagError),
            3 => Some(Self::Usage),
            _ => None,
        }
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::Error => "Operation failed",
            Self::ParseFlagError => "Invalid arguments or path format",
            Self::Usage => "Usage printed",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<&ojs_core::Error> for ExitCode {
    fn from(err: &ojs_core::Error) -> Self {
        Self::from_i32(err.exit_code()).unwrap_or(Self::Error)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
