use core::fmt;
use std::error::Error;
use std::fmt::Display;

/// Error of the quorum or of one of its collaborators (messenger, exchange, configuration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuorumError {
    text: String,
    cause: String,
}

pub type Result<T> = std::result::Result<T, QuorumError>;

/// Creates an error result with the description and an optional (possibly empty) cause.
pub fn new_err<T>(text: String, cause: String) -> Result<T> {
    Err(QuorumError { text, cause })
}

impl QuorumError {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }
}

impl Display for QuorumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cause_word = {
            if !self.cause.is_empty() {
                " Cause: ".to_string()
            } else {
                String::new()
            }
        };
        write!(f, "{}.{}{}", self.text, cause_word, self.cause)
    }
}

impl Error for QuorumError {}
