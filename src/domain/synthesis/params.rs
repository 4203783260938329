//! Synthesis Context - 文本与可调参数

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// 单次合成允许的最大字符数
pub const MAX_TEXT_CHARS: usize = 500;

const EXAGGERATION_RANGE: RangeInclusive<f32> = 0.25..=2.0;
const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.05..=5.0;
const CFG_WEIGHT_RANGE: RangeInclusive<f32> = 0.2..=1.0;

/// 参数校验失败，指明出错字段
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{field}: {message}")]
pub struct InvalidParameter {
    pub field: &'static str,
    pub message: String,
}

impl InvalidParameter {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// 待合成文本
///
/// 不变量: 1..=500 个字符，且不能全为空白
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisText(String);

impl SynthesisText {
    pub fn new(text: impl Into<String>) -> Result<Self, InvalidParameter> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(InvalidParameter::new("text", "text cannot be empty"));
        }
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(InvalidParameter::new(
                "text",
                format!("text too long ({} characters, max {})", chars, MAX_TEXT_CHARS),
            ));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// 引擎可调参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisParams {
    /// 情绪夸张度 (0.25 - 2.0)
    pub exaggeration: f32,
    /// 采样温度 (0.05 - 5.0)
    pub temperature: f32,
    /// CFG 权重 (0.2 - 1.0)
    pub cfg_weight: f32,
    /// 随机种子，0 表示不指定
    pub seed: i64,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            exaggeration: 0.5,
            temperature: 0.8,
            cfg_weight: 0.5,
            seed: 0,
        }
    }
}

impl SynthesisParams {
    pub fn validate(&self) -> Result<(), InvalidParameter> {
        check_range("exaggeration", self.exaggeration, EXAGGERATION_RANGE)?;
        check_range("temperature", self.temperature, TEMPERATURE_RANGE)?;
        check_range("cfg_weight", self.cfg_weight, CFG_WEIGHT_RANGE)?;
        Ok(())
    }

    /// 0 映射为 None
    pub fn explicit_seed(&self) -> Option<i64> {
        (self.seed != 0).then_some(self.seed)
    }
}

fn check_range(
    field: &'static str,
    value: f32,
    range: RangeInclusive<f32>,
) -> Result<(), InvalidParameter> {
    if value.is_nan() || !range.contains(&value) {
        return Err(InvalidParameter::new(
            field,
            format!(
                "must be between {} and {}, got {}",
                range.start(),
                range.end(),
                value
            ),
        ));
    }
    Ok(())
}
