//! Query Handlers 实现

mod audio_handlers;
mod health_handlers;
mod voice_handlers;

pub use audio_handlers::*;
pub use health_handlers::*;
pub use voice_handlers::*;

pub(crate) use audio_handlers::load_record;
