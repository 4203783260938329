//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 音色标识与元数据
//! - 内置音色表
//! - 参考音频来源

mod aggregate;
mod builtin;
mod errors;
mod value_objects;

pub use aggregate::Voice;
pub use builtin::{engine_default_voice, BuiltinVoices, DEFAULT_VOICE_ID};
pub use errors::VoiceError;
pub use value_objects::{AudioFormat, ReferenceSource, VoiceId, VoiceKind, VoiceName};
