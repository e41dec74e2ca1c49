//! Exit codes following sysexits.h conventions.
//!
//! Scripts can tell a rejected photo apart from a missing API key or an
//! unreachable service without parsing stderr.

use plantwatch_core::PlantwatchError;

pub const SUCCESS: i32 = 0;

/// Catch-all.
pub const GENERAL_ERROR: i32 = 1;

/// Invalid arguments (EX_USAGE). clap exits with 2 on its own, this is for
/// arguments that parse but make no sense.
pub const USAGE_ERROR: i32 = 64;

/// Input is not a usable image, not a plant, or got an unreadable verdict
/// (EX_DATAERR).
pub const DATA_ERROR: i32 = 65;

/// Cannot open input file (EX_NOINPUT).
pub const INPUT_ERROR: i32 = 66;

/// Remote service unreachable (EX_UNAVAILABLE).
pub const NETWORK_ERROR: i32 = 69;

/// Cannot write output file (EX_IOERR).
pub const IO_ERROR: i32 = 74;

/// Missing API key or bad client settings (EX_CONFIG).
pub const CONFIG_ERROR: i32 = 78;

/// Exit code plus the message printed before exiting.
#[derive(Debug)]
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self {
            code: SUCCESS,
            message: None,
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        let typed = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<PlantwatchError>())
            .map(|e| match e {
                PlantwatchError::InvalidImage(_) | PlantwatchError::NotAPlant(_) => DATA_ERROR,
                PlantwatchError::Config(_) => CONFIG_ERROR,
                PlantwatchError::Store(_) => GENERAL_ERROR,
            });

        let code = typed.unwrap_or_else(|| {
            if message.contains("Failed to read") {
                INPUT_ERROR
            } else if message.contains("Failed to write") {
                IO_ERROR
            } else if message.contains("unavailable") {
                NETWORK_ERROR
            } else if message.contains("must be at least") {
                USAGE_ERROR
            } else if message.contains("not set") {
                CONFIG_ERROR
            } else {
                GENERAL_ERROR
            }
        });

        Self::error(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use plantwatch_core::RejectionCause;

    #[test]
    fn test_typed_errors_win_over_context() {
        let err = Err::<(), _>(PlantwatchError::InvalidImage("truncated".into()))
            .context("Failed to read image")
            .unwrap_err();
        assert_eq!(ExitCode::from_anyhow(&err).code, DATA_ERROR);

        let err = anyhow::Error::new(PlantwatchError::NotAPlant(RejectionCause::NoMatch(
            "empty".into(),
        )));
        assert_eq!(ExitCode::from_anyhow(&err).code, DATA_ERROR);

        let err = anyhow::Error::new(PlantwatchError::Config("key is empty".into()));
        assert_eq!(ExitCode::from_anyhow(&err).code, CONFIG_ERROR);
    }

    #[test]
    fn test_context_prefixes() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Err::<(), _>(io)
            .context("Failed to read file: leaf.jpg")
            .unwrap_err();
        assert_eq!(ExitCode::from_anyhow(&err).code, INPUT_ERROR);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Err::<(), _>(io)
            .context("Failed to write output: out.jpg")
            .unwrap_err();
        assert_eq!(ExitCode::from_anyhow(&err).code, IO_ERROR);

        let err = anyhow::anyhow!("something odd");
        let exit = ExitCode::from_anyhow(&err);
        assert_eq!(exit.code, GENERAL_ERROR);
        assert_eq!(exit.message.as_deref(), Some("something odd"));
    }
}
