//! Synthesis Context - 合成请求校验
//!
//! 合成请求是瞬态对象，不持久化

mod params;

pub use params::{InvalidParameter, SynthesisParams, SynthesisText, MAX_TEXT_CHARS};
