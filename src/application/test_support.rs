//! 应用层测试夹具：内存存储、可观测的桩引擎、WAV 样本

use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::application::ports::{
    EngineRequest, FetchError, ReferenceFetcherPort, TtsEnginePort, TtsError, Waveform,
};
use crate::application::StorageBackend;
use crate::domain::voice::{engine_default_voice, BuiltinVoices};
use crate::infrastructure::memory::{InMemoryBlobStore, InMemoryMetadataStore};

pub const STUB_SAMPLE_RATE: u32 = 24000;

pub fn memory_storage() -> StorageBackend {
    StorageBackend::new(
        Arc::new(InMemoryBlobStore::new()),
        Arc::new(InMemoryMetadataStore::new()),
    )
}

/// 与标准内置音色同 ID，但不需要下载参考音频
pub fn offline_builtins() -> BuiltinVoices {
    BuiltinVoices::from_voices(
        [
            engine_default_voice("female_default", "Female Default", "Professional female voice"),
            engine_default_voice("male_professional", "Male Professional", "Confident male voice"),
        ]
        .into_iter()
        .flatten()
        .collect(),
    )
}

/// 16-bit 单声道 WAV，采样点数 = seconds * sample_rate
pub fn wav_fixture(seconds: f64, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let frames = (seconds * sample_rate as f64).round() as usize;
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..frames {
            let sample = ((i % 100) as i16 - 50) * 200;
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// 记录每次调用进入/退出时间的桩引擎
pub struct StubEngine {
    delay: Duration,
    fail: AtomicBool,
    loaded: AtomicBool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
    intervals: Mutex<Vec<(Instant, Instant)>>,
    requests: Mutex<Vec<EngineRequest>>,
}

impl StubEngine {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail: AtomicBool::new(false),
            loaded: AtomicBool::new(true),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            intervals: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// 模拟模型未加载：健康检查失败，合成返回 NotLoaded
    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.store(loaded, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn intervals(&self) -> Vec<(Instant, Instant)> {
        self.intervals.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<EngineRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TtsEnginePort for StubEngine {
    async fn synthesize(&self, request: EngineRequest) -> Result<Waveform, TtsError> {
        if !self.loaded.load(Ordering::SeqCst) {
            return Err(TtsError::NotLoaded);
        }
        let entered = Instant::now();
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let samples = vec![0.1; request.text.chars().count() * 240];
        self.requests.lock().unwrap().push(request);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.intervals.lock().unwrap().push((entered, Instant::now()));

        if self.fail.load(Ordering::SeqCst) {
            return Err(TtsError::ServiceError("CUDA out of memory".to_string()));
        }
        Ok(Waveform {
            samples,
            sample_rate: STUB_SAMPLE_RATE,
        })
    }

    async fn health_check(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn device(&self) -> &str {
        "stub"
    }
}

/// 固定返回结果的参考音频下载器
pub struct StubFetcher {
    response: Option<Vec<u8>>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn ok(data: Vec<u8>) -> Self {
        Self {
            response: Some(data),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceFetcherPort for StubFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| FetchError::NetworkError("connection refused".to_string()))
    }
}
