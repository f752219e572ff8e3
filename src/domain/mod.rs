//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Voice Context: 音色描述解析与向量混合
//! - Dialogue Context: 说话人识别与音色分配
//! - Profile Context: 情绪、音效与预设

pub mod dialogue;
pub mod profile;
pub mod voice;
