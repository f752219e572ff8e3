//! In-Memory Voice Engine - 内存中的合成引擎
//!
//! 持有有序的音色向量表，合成时返回与文本长度相称的静音，不加载任何模型

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{
    SynthesisEnginePort, SynthesisError, SynthesisOutput, SynthesisRequest, VoiceCatalogPort,
    VoiceInput,
};
use crate::domain::voice::{VoiceEmbedding, VoiceId};

/// 按 ID 生成音色向量时使用的维度
pub const DEFAULT_EMBEDDING_DIM: usize = 8;

/// In-Memory Engine 配置
#[derive(Debug, Clone)]
pub struct InMemoryVoiceEngineConfig {
    pub sample_rate: u32,
    /// 语速为 1.0 时每个字符对应的时长（毫秒）
    pub ms_per_char: u32,
    /// 支持的语言代码
    pub languages: Vec<String>,
}

impl Default for InMemoryVoiceEngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            ms_per_char: 60,
            languages: ["en-us", "en-gb", "es", "fr", "hi", "it", "ja", "pt-br", "zh"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// In-Memory Voice Engine
///
/// 记录收到的每个请求，便于检查调用顺序与参数
pub struct InMemoryVoiceEngine {
    config: InMemoryVoiceEngineConfig,
    voices: Vec<(VoiceId, VoiceEmbedding)>,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl InMemoryVoiceEngine {
    pub fn new(config: InMemoryVoiceEngineConfig, voices: Vec<(VoiceId, VoiceEmbedding)>) -> Self {
        tracing::info!(
            voices = voices.len(),
            sample_rate = config.sample_rate,
            "InMemoryVoiceEngine initialized"
        );
        Self {
            config,
            voices,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 按 ID 生成确定性的音色向量（维度 `DEFAULT_EMBEDDING_DIM`）
    pub fn with_voice_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<VoiceId>,
    {
        let voices = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| (id.into(), seeded_embedding(index)))
            .collect();
        Self::new(InMemoryVoiceEngineConfig::default(), voices)
    }

    /// 已收到的请求（按到达顺序）
    pub async fn recorded_requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().await.clone()
    }

    fn embedding_dim(&self) -> Option<usize> {
        self.voices.first().map(|(_, e)| e.dim())
    }
}

fn seeded_embedding(index: usize) -> VoiceEmbedding {
    let base = (index + 1) as f32 * 0.1;
    (0..DEFAULT_EMBEDDING_DIM)
        .map(|j| base + j as f32 * 0.01)
        .collect::<Vec<_>>()
        .into()
}

impl VoiceCatalogPort for InMemoryVoiceEngine {
    fn list_voices(&self) -> Vec<VoiceId> {
        self.voices.iter().map(|(id, _)| id.clone()).collect()
    }

    fn embedding(&self, voice: &VoiceId) -> Option<VoiceEmbedding> {
        self.voices
            .iter()
            .find(|(id, _)| id == voice)
            .map(|(_, embedding)| embedding.clone())
    }
}

#[async_trait]
impl SynthesisEnginePort for InMemoryVoiceEngine {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, SynthesisError> {
        if !self.config.languages.iter().any(|l| l == &request.language) {
            return Err(SynthesisError::UnsupportedLanguage(request.language));
        }

        match &request.voice {
            VoiceInput::Id(id) => {
                if !self.voices.iter().any(|(known, _)| known == id) {
                    return Err(SynthesisError::VoiceNotFound(id.to_string()));
                }
            }
            VoiceInput::Embedding(embedding) => {
                if self.embedding_dim() != Some(embedding.dim()) {
                    return Err(SynthesisError::EngineError(format!(
                        "embedding dimension {} not supported",
                        embedding.dim()
                    )));
                }
            }
        }

        if !(request.speed.is_finite() && request.speed > 0.0) {
            return Err(SynthesisError::EngineError(format!(
                "invalid speed {}",
                request.speed
            )));
        }

        let chars = request.text.chars().count() as f64;
        let duration_ms = chars * f64::from(self.config.ms_per_char) / f64::from(request.speed);
        let sample_count = (duration_ms * f64::from(self.config.sample_rate) / 1000.0).round() as usize;

        tracing::debug!(
            text_len = request.text.len(),
            speed = request.speed,
            samples = sample_count,
            "InMemoryVoiceEngine: returning silence"
        );

        self.requests.lock().await.push(request);

        Ok(SynthesisOutput {
            samples: vec![0.0; sample_count],
            sample_rate: self.config.sample_rate,
        })
    }
}
