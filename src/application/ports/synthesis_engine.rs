//! Synthesis Engine Port - 语音合成引擎抽象
//!
//! 音色列表、音色向量与合成能力都由外部引擎提供，本层只读取

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::voice::{VoiceEmbedding, VoiceId};

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Engine error: {0}")]
    EngineError(String),
}

/// 传给引擎的音色：单音色传 ID，混合音色传混合后的向量
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceInput {
    Id(VoiceId),
    Embedding(VoiceEmbedding),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: VoiceInput,
    /// 语速倍率
    pub speed: f32,
    /// 语言代码，如 "en-us"
    pub language: String,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    /// 单声道 PCM 采样
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SynthesisOutput {
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / u64::from(self.sample_rate)
    }
}

/// Voice Catalog Port
///
/// 可用音色与音色向量；每次调用都反映引擎当前状态（模型重载后可能变化）
pub trait VoiceCatalogPort: Send + Sync {
    /// 可用音色（有序）
    fn list_voices(&self) -> Vec<VoiceId>;

    /// 音色向量
    fn embedding(&self, voice: &VoiceId) -> Option<VoiceEmbedding>;
}

/// Synthesis Engine Port
///
/// 外部合成引擎的抽象接口
#[async_trait]
pub trait SynthesisEnginePort: VoiceCatalogPort {
    /// 执行合成
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, SynthesisError>;
}
