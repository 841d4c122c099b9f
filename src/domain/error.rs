use thiserror::Error;

/// Problems with what the user typed at a prompt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{input}' is not an integer id")]
    InvalidIdFormat { input: String },
}
