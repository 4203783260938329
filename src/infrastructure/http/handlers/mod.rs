//! HTTP Handlers

mod audio;
mod status;
mod synthesis;
mod voice;

pub use audio::*;
pub use status::*;
pub use synthesis::*;
pub use voice::*;
