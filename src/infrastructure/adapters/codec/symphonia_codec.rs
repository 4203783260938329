//! Symphonia Codec - 基于 symphonia 的探测/解码 + hound WAV 编码
//!
//! 支持 WAV / MP3 / FLAC 输入，输出 16-bit 单声道 PCM WAV

use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioCodecPort, AudioInfo, CodecError, Waveform};
use crate::domain::voice::AudioFormat;

/// symphonia 编解码器
#[derive(Debug, Clone, Default)]
pub struct SymphoniaCodec;

impl SymphoniaCodec {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, data: &[u8], format: AudioFormat) -> Result<OpenedStream, CodecError> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(format.extension());

        let detected = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| map_symphonia_error("format detection failed", e))?;

        let reader = detected.format;
        let track = reader
            .default_track()
            .ok_or_else(|| CodecError::DecodingError("no audio track found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .filter(|rate| *rate > 0)
            .ok_or_else(|| CodecError::DecodingError("unknown sample rate".to_string()))?;
        let channels = track
            .codec_params
            .channels
            .map(|c| c.count() as u8)
            .unwrap_or(1);
        let n_frames = track.codec_params.n_frames;
        let track_id = track.id;

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| map_symphonia_error("decoder creation failed", e))?;

        Ok(OpenedStream {
            reader,
            decoder,
            track_id,
            sample_rate,
            channels,
            n_frames,
        })
    }
}

struct OpenedStream {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: u8,
    n_frames: Option<u64>,
}

impl OpenedStream {
    /// 逐包解码，把每个包的交错样本交给 sink，返回总帧数
    fn decode_all<F>(&mut self, mut sink: F) -> Result<u64, CodecError>
    where
        F: FnMut(&[f32], usize),
    {
        let mut total_frames = 0u64;
        let mut decoded_packets = 0usize;

        loop {
            let packet = match self.reader.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(map_symphonia_error("packet read error", e)),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::warn!(error = %e, "Decode error (skipping packet)");
                    continue;
                }
                Err(e) => return Err(map_symphonia_error("decode failed", e)),
            };

            let spec = *decoded.spec();
            let frames = decoded.frames();
            let channel_count = spec.channels.count();
            let mut buffer = SampleBuffer::<f32>::new(frames as u64, spec);
            buffer.copy_interleaved_ref(decoded);
            sink(&buffer.samples()[..frames * channel_count], channel_count);

            total_frames += frames as u64;
            decoded_packets += 1;
        }

        if decoded_packets == 0 {
            return Err(CodecError::DecodingError(
                "stream contains no decodable audio".to_string(),
            ));
        }
        Ok(total_frames)
    }
}

fn map_symphonia_error(context: &str, err: SymphoniaError) -> CodecError {
    match err {
        SymphoniaError::Unsupported(what) => {
            CodecError::UnsupportedFormat(format!("{}: {}", context, what))
        }
        other => CodecError::DecodingError(format!("{}: {}", context, other)),
    }
}

impl AudioCodecPort for SymphoniaCodec {
    fn inspect(&self, data: &[u8], format: AudioFormat) -> Result<AudioInfo, CodecError> {
        let mut stream = self.open(data, format)?;

        // 容器头里有帧数时直接使用，否则（如部分 MP3）解码计数
        let frames = match stream.n_frames {
            Some(n) if n > 0 => n,
            _ => stream.decode_all(|_, _| {})?,
        };

        Ok(AudioInfo {
            format,
            sample_rate: stream.sample_rate,
            channels: stream.channels,
            duration_secs: frames as f64 / stream.sample_rate as f64,
        })
    }

    fn decode(&self, data: &[u8], format: AudioFormat) -> Result<Waveform, CodecError> {
        let mut stream = self.open(data, format)?;
        let mut samples: Vec<f32> = Vec::new();

        stream.decode_all(|interleaved, channels| {
            if channels <= 1 {
                samples.extend_from_slice(interleaved);
            } else {
                // 下混为单声道
                samples.extend(
                    interleaved
                        .chunks(channels)
                        .map(|frame| frame.iter().sum::<f32>() / channels as f32),
                );
            }
        })?;

        Ok(Waveform {
            samples,
            sample_rate: stream.sample_rate,
        })
    }

    fn encode_wav(&self, waveform: &Waveform) -> Result<Vec<u8>, CodecError> {
        if waveform.sample_rate == 0 {
            return Err(CodecError::EncodingError("sample rate is zero".to_string()));
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: waveform.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::with_capacity(44 + waveform.samples.len() * 2));
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| CodecError::EncodingError(e.to_string()))?;
            for &sample in &waveform.samples {
                let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer
                    .write_sample(pcm)
                    .map_err(|e| CodecError::EncodingError(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| CodecError::EncodingError(e.to_string()))?;
        }

        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(seconds: f32, sample_rate: u32) -> Waveform {
        let count = (seconds * sample_rate as f32) as usize;
        let samples = (0..count)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / sample_rate as f32).sin() * 0.5)
            .collect();
        Waveform {
            samples,
            sample_rate,
        }
    }

    fn stereo_wav(frames: usize, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames {
                writer.write_sample(1000i16).unwrap();
                writer.write_sample(-1000i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_encoded_wav_reports_duration() {
        let codec = SymphoniaCodec::new();
        let wav = codec.encode_wav(&tone(2.0, 16000)).unwrap();
        assert_eq!(AudioFormat::sniff(&wav), Some(AudioFormat::Wav));

        let info = codec.inspect(&wav, AudioFormat::Wav).unwrap();
        assert_eq!(info.sample_rate, 16000);
        assert_eq!(info.channels, 1);
        assert!((info.duration_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_decode_downmixes_to_mono() {
        let codec = SymphoniaCodec::new();
        let wav = stereo_wav(8000, 8000);

        let waveform = codec.decode(&wav, AudioFormat::Wav).unwrap();
        assert_eq!(waveform.sample_rate, 8000);
        assert_eq!(waveform.samples.len(), 8000);
        assert!(waveform.samples.iter().all(|s| s.abs() < 1e-3));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let codec = SymphoniaCodec::new();
        let result = codec.inspect(b"definitely not audio at all", AudioFormat::Wav);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_rejects_zero_sample_rate() {
        let codec = SymphoniaCodec::new();
        let waveform = Waveform {
            samples: vec![0.0; 10],
            sample_rate: 0,
        };
        assert!(matches!(
            codec.encode_wav(&waveform),
            Err(CodecError::EncodingError(_))
        ));
    }
}
