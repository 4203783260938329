//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod audio_handlers;
mod synthesize_handler;
mod voice_handlers;

pub use audio_handlers::*;
pub use synthesize_handler::*;
pub use voice_handlers::*;
