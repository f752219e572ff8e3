//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::SynthesisError;
use crate::domain::dialogue::DialogueError;
use crate::domain::profile::ProfileError;
use crate::domain::voice::VoiceError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 用户输入错误（音色描述格式、未知音色、空音色池、情绪/音效参数）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 内部错误（内部一致性被破坏）
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        if err.is_internal() {
            tracing::error!(error = %err, "Voice resolution consistency failure");
            Self::InternalError(err.to_string())
        } else {
            Self::ValidationError(err.to_string())
        }
    }
}

impl From<DialogueError> for ApplicationError {
    fn from(err: DialogueError) -> Self {
        if err.is_internal() {
            Self::InternalError(err.to_string())
        } else {
            Self::ValidationError(err.to_string())
        }
    }
}

impl From<ProfileError> for ApplicationError {
    fn from(err: ProfileError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<SynthesisError> for ApplicationError {
    fn from(err: SynthesisError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_errors_split_by_origin() {
        let user = ApplicationError::from(VoiceError::InvalidVoice("nobody".into()));
        assert!(matches!(user, ApplicationError::ValidationError(_)));

        let internal = ApplicationError::from(VoiceError::MissingEmbedding("ghost".into()));
        assert!(matches!(internal, ApplicationError::InternalError(_)));
    }

    #[test]
    fn test_dialogue_errors_split_by_origin() {
        let user = ApplicationError::from(DialogueError::NoVoicesAvailable { speakers: 2 });
        assert!(matches!(user, ApplicationError::ValidationError(_)));

        let internal = ApplicationError::from(DialogueError::UnassignedSpeaker("Bob".to_string()));
        assert!(matches!(internal, ApplicationError::InternalError(_)));
    }

    #[test]
    fn test_engine_errors_are_external() {
        for err in [
            SynthesisError::VoiceNotFound("ghost".to_string()),
            SynthesisError::UnsupportedLanguage("xx".to_string()),
            SynthesisError::EngineError("boom".to_string()),
        ] {
            let mapped = ApplicationError::from(err);
            assert!(matches!(mapped, ApplicationError::ExternalServiceError(_)));
        }
    }

    #[test]
    fn test_message_carries_offending_voice() {
        let err = ApplicationError::from(VoiceError::InvalidVoice("unknownVoice".into()));
        assert!(err.to_string().contains("unknownVoice"));
    }
}
