//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_codec;
mod reference_fetcher;
mod storage;
mod tts_engine;

pub use audio_codec::{AudioCodecPort, AudioInfo, CodecError};
pub use reference_fetcher::{FetchError, ReferenceFetcherPort};
pub use storage::{BlobStorePort, BlobUsage, MetadataStorePort, Namespace, StorageError};
pub use tts_engine::{EngineRequest, ReferenceAudio, TtsEnginePort, TtsError, Waveform};
