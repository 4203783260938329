//! Audio Codec Adapters

mod symphonia_codec;

pub use symphonia_codec::SymphoniaCodec;
