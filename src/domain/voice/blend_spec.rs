//! 音色混合描述解析
//!
//! 语法:
//! ```text
//! spec  := entry (',' entry)*
//! entry := voiceId (':' weight)?
//! ```
//! weight 为 [0, 100] 区间内的十进制百分比，形如 `60` 或 `33.5`
//! （不接受 `+50`、`.5`、`1e1` 等写法）

use serde::Serialize;
use std::collections::HashSet;

use super::{VoiceError, VoiceId};

/// 权重总和为 100 时允许的浮点误差
pub const WEIGHT_TOLERANCE: f64 = 1e-3;

/// 权重总和（百分比）
pub const FULL_WEIGHT: f64 = 100.0;

/// 混合描述中的单个条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendEntry {
    pub voice: VoiceId,
    /// 百分比权重
    pub weight: f64,
}

/// 已校验、已归一化的音色混合描述
///
/// 不变量:
/// - 至少一个条目
/// - 所有音色都在解析时提供的可用集合中
/// - 权重之和为 100（误差 1e-3）
/// - 重复的音色不合并，各自独立参与混合
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceBlendSpec {
    entries: Vec<BlendEntry>,
}

/// 语法层面的条目，尚未校验音色
struct RawEntry<'a> {
    voice: &'a str,
    weight: Option<f64>,
}

impl VoiceBlendSpec {
    /// 解析并归一化音色描述
    ///
    /// 检查顺序：先校验整体语法，再校验音色是否可用，最后归一化权重
    pub fn parse(spec: &str, available: &HashSet<VoiceId>) -> Result<Self, VoiceError> {
        let raw = parse_entries(spec)?;

        if let Some(unknown) = raw.iter().find(|e| !available.contains(e.voice)) {
            return Err(VoiceError::InvalidVoice(VoiceId::new(unknown.voice)));
        }

        let weights = normalize_weights(&raw)?;
        let entries: Vec<BlendEntry> = raw
            .iter()
            .zip(weights)
            .map(|(e, weight)| BlendEntry {
                voice: VoiceId::new(e.voice),
                weight,
            })
            .collect();

        tracing::debug!(
            spec = %spec.trim(),
            entries = entries.len(),
            "Voice spec parsed"
        );

        Ok(Self { entries })
    }

    /// 单音色描述（权重 100）
    pub fn single(voice: VoiceId) -> Self {
        Self {
            entries: vec![BlendEntry {
                voice,
                weight: FULL_WEIGHT,
            }],
        }
    }

    pub fn entries(&self) -> &[BlendEntry] {
        &self.entries
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// 单音色：恰好一个条目且权重为 100
    pub fn is_single_voice(&self) -> bool {
        self.single_voice().is_some()
    }

    pub fn single_voice(&self) -> Option<&VoiceId> {
        match self.entries.as_slice() {
            [only] if (only.weight - FULL_WEIGHT).abs() <= WEIGHT_TOLERANCE => Some(&only.voice),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoiceBlendSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", entry.voice, entry.weight)?;
        }
        Ok(())
    }
}

fn parse_entries(spec: &str) -> Result<Vec<RawEntry<'_>>, VoiceError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(VoiceError::malformed("voice spec is empty"));
    }

    spec.split(',')
        .enumerate()
        .map(|(index, raw)| parse_entry(index, raw))
        .collect()
}

fn parse_entry(index: usize, raw: &str) -> Result<RawEntry<'_>, VoiceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(VoiceError::malformed(format!(
            "entry {} is empty",
            index + 1
        )));
    }

    let (voice, weight) = match raw.split_once(':') {
        Some((voice, weight)) => (voice.trim(), Some(parse_weight(raw, weight.trim())?)),
        None => (raw, None),
    };

    if voice.is_empty() {
        return Err(VoiceError::malformed(format!(
            "entry '{}' has no voice id",
            raw
        )));
    }

    Ok(RawEntry { voice, weight })
}

fn parse_weight(entry: &str, text: &str) -> Result<f64, VoiceError> {
    if text.contains(':') {
        return Err(VoiceError::malformed(format!(
            "entry '{}' has more than one ':'",
            entry
        )));
    }

    let invalid =
        || VoiceError::malformed(format!("entry '{}' has an invalid weight '{}'", entry, text));

    if !is_decimal(text) {
        return Err(invalid());
    }
    let weight: f64 = text.parse().map_err(|_| invalid())?;

    if !weight.is_finite() || !(0.0..=FULL_WEIGHT).contains(&weight) {
        return Err(VoiceError::malformed(format!(
            "entry '{}' weight must be between 0 and 100",
            entry
        )));
    }

    Ok(weight)
}

/// `digits ('.' digits)?`
fn is_decimal(text: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match text.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => all_digits(text),
    }
}

/// 归一化权重
///
/// - 全部未带权重：每项精确等分 100/n
/// - 带权重（含混合形式，未带权重的项按 100/n 计）：和不为 100 时按 100/sum 线性缩放
/// - 和为 0：无法归一化
fn normalize_weights(raw: &[RawEntry<'_>]) -> Result<Vec<f64>, VoiceError> {
    let equal_share = FULL_WEIGHT / raw.len() as f64;

    if raw.iter().all(|e| e.weight.is_none()) {
        return Ok(vec![equal_share; raw.len()]);
    }

    let weights: Vec<f64> = raw
        .iter()
        .map(|e| e.weight.unwrap_or(equal_share))
        .collect();
    let sum: f64 = weights.iter().sum();

    if sum <= 0.0 {
        return Err(VoiceError::malformed(
            "blend weights sum to zero and cannot be normalized",
        ));
    }

    if (sum - FULL_WEIGHT).abs() <= WEIGHT_TOLERANCE {
        return Ok(weights);
    }

    let scale = FULL_WEIGHT / sum;
    Ok(weights.into_iter().map(|w| w * scale).collect())
}
