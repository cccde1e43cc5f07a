use thiserror::Error;

/// A required form field was blank or a form-level rule was violated.
///
/// Nothing is saved when one of these is returned; the user corrects the
/// input and submits again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in required fields: {0}")]
    MissingField(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Outcome of a failed sign-in attempt.
///
/// The `Display` text is what the lock screen shows inline under the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication cancelled")]
    Cancelled,

    #[error("Authentication failed. Use password instead.")]
    Failed(String),

    #[error("Biometric authentication is not available")]
    Unavailable,
}

impl AuthError {
    /// Cancellation is user intent, not a failure worth highlighting.
    pub fn is_alarming(&self) -> bool {
        !matches!(self, AuthError::Cancelled)
    }
}

/// A call into the host bridge failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Host bridge error: {message}")]
pub struct BridgeError {
    pub message: String,
}

impl BridgeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The host reports a dismissed prompt only through its error message.
    pub fn is_cancellation(&self) -> bool {
        self.message.to_lowercase().contains("cancel")
    }
}
