//! Process exit codes.
//!
//! Each fatal failure class has its own code so scripts wrapping `simux` can
//! tell a typo in the arguments from an unreachable server.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | operator end-of-input, or remote closed cleanly |
//! | 1    | usage error                                     |
//! | 2    | connection failure                              |
//! | 3    | name resolution failure                         |
//! | 4    | configuration error                             |
//! | 5    | log sink could not be opened                    |
//! | 6    | bridge I/O failure                              |
//! | 7    | prompt / line editor failure                    |
//! | 8    | runtime start-up failure                        |

use std::process::ExitCode;

use crate::infrastructure::bootstrap::BootstrapError;

/// Outcome of a `simux` run, convertible to a process [`ExitCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Usage = 1,
    Connect = 2,
    Resolve = 3,
    Config = 4,
    LogSink = 5,
    Bridge = 6,
    Prompt = 7,
    Runtime = 8,
}

impl ExitStatus {
    /// The numeric code passed to the OS.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

impl From<&BootstrapError> for ExitStatus {
    fn from(err: &BootstrapError) -> Self {
        match err {
            BootstrapError::Resolve { .. } | BootstrapError::NoAddress { .. } => Self::Resolve,
            BootstrapError::Connect { .. } => Self::Connect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            ExitStatus::Success,
            ExitStatus::Usage,
            ExitStatus::Connect,
            ExitStatus::Resolve,
            ExitStatus::Config,
            ExitStatus::LogSink,
            ExitStatus::Bridge,
            ExitStatus::Prompt,
            ExitStatus::Runtime,
        ];
        let mut codes: Vec<u8> = all.iter().map(|s| s.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_success_is_zero_and_usage_is_one() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Usage.code(), 1);
    }

    #[test]
    fn test_connect_failure_maps_to_connect_code() {
        let err = BootstrapError::Connect {
            addr: "127.0.0.1:9".parse().unwrap(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(ExitStatus::from(&err), ExitStatus::Connect);
    }

    #[test]
    fn test_resolution_failures_map_to_resolve_code() {
        let no_addr = BootstrapError::NoAddress {
            endpoint: "x:1".to_string(),
        };
        let resolve = BootstrapError::Resolve {
            endpoint: "x:1".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::Other),
        };
        assert_eq!(ExitStatus::from(&no_addr), ExitStatus::Resolve);
        assert_eq!(ExitStatus::from(&resolve), ExitStatus::Resolve);
    }
}
