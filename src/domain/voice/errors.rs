//! Voice Context - Errors

use thiserror::Error;

use super::VoiceId;

#[derive(Debug, Error, PartialEq)]
pub enum VoiceError {
    /// 语法错误或权重和为零，原样返回给调用方
    #[error("音色描述格式错误: {0}")]
    MalformedSpec(String),

    #[error("音色不存在: {0}")]
    InvalidVoice(VoiceId),

    /// 解析器与混合器看到的音色集合不一致，属于内部缺陷
    #[error("缺少音色向量: {0}")]
    MissingEmbedding(VoiceId),

    #[error("音色向量维度不一致: {voice} 为 {actual}，期望 {expected}")]
    EmbeddingDimensionMismatch {
        voice: VoiceId,
        expected: usize,
        actual: usize,
    },
}

impl VoiceError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSpec(message.into())
    }

    /// 是否为内部一致性错误（而非用户输入错误）
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::MissingEmbedding(_) | Self::EmbeddingDimensionMismatch { .. }
        )
    }
}
