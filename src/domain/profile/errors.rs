//! Profile Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("无效的名称: {0}")]
    InvalidName(String),

    #[error("无效的参数: {0}")]
    InvalidParameter(String),

    #[error("情绪不存在: {0}")]
    UnknownEmotion(String),

    #[error("音效不存在: {0}")]
    UnknownEffect(String),

    #[error("预设不存在: {0}")]
    UnknownPreset(String),
}
