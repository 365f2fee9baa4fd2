use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): every file was processed
/// - `Failure` (1): the command declined to act (e.g. `init` with an existing config)
/// - `Error` (2): a source file failed to parse, or the command errored
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
