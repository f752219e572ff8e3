//! Dialogue Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogueError {
    /// 有说话人需要分配但音色池为空
    #[error("没有可分配的音色（{speakers} 个说话人待分配）")]
    NoVoicesAvailable { speakers: usize },

    /// 说话人出现在文本中却没有分配到音色（分配结果不一致）
    #[error("说话人 '{0}' 未分配音色")]
    UnassignedSpeaker(String),
}

impl DialogueError {
    /// 内部一致性错误，而非调用方输入问题
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::UnassignedSpeaker(_))
    }
}
