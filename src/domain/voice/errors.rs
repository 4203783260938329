//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("invalid voice id: {0}")]
    InvalidId(String),

    #[error("invalid voice name: {0}")]
    InvalidName(String),
}
