//! Error types.
//!
//! Library code returns typed errors (`FitError`, `SubjectError`) so the
//! classifier and the harness can decide what is recoverable. The binary folds
//! everything into `AppError`, which carries the process exit code.

use crate::domain::ModelKind;

/// Exit code for configuration and I/O problems.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when there is not enough usable data to classify.
pub const EXIT_DATA: u8 = 3;
/// Exit code for internal numeric failures.
pub const EXIT_NUMERIC: u8 = 4;

/// Regression / classification failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Fewer points than the model has free parameters.
    #[error("{model}: need at least {required} samples, got {actual}")]
    InsufficientData {
        model: ModelKind,
        required: usize,
        actual: usize,
    },

    /// The (transformed) input sizes carry no variance, so the slope is undefined.
    #[error("{model}: input sizes have no variance ({reason})")]
    DegenerateInput { model: ModelKind, reason: String },

    /// The fit produced NaN/inf coefficients or predictions.
    #[error("{model}: non-finite fit ({reason})")]
    NonFinite { model: ModelKind, reason: String },

    /// Every candidate model was excluded.
    #[error("no candidate model could be fitted for '{subject}' ({} excluded)", .excluded.len())]
    AllModelsFailed {
        subject: String,
        excluded: Vec<(ModelKind, String)>,
    },
}

/// A benchmarked operation failed for one trial.
#[derive(Debug, thiserror::Error)]
pub enum SubjectError {
    #[error("expression error: {0}")]
    Expression(#[from] crate::subjects::ExprError),

    #[error("script error: {0}")]
    Script(#[from] crate::subjects::ScriptError),

    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let code = match err {
            FitError::InsufficientData { .. }
            | FitError::DegenerateInput { .. }
            | FitError::AllModelsFailed { .. } => EXIT_DATA,
            FitError::NonFinite { .. } => EXIT_NUMERIC,
        };
        AppError::new(code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
