//! Polyvox - 多音色语音合成的音色解析与对话分配
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 音色描述解析、权重归一化、向量混合
//! - Dialogue Context: 说话人识别、音色分配、对话分段
//! - Profile Context: 情绪 / 音效 / 预设注册表
//!
//! 应用层 (application/):
//! - Ports: 合成引擎与音色目录
//! - Commands: 音色解析与合成
//! - Queries: 音色、对话分段、情绪 / 音效 / 预设查询
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: 内存合成引擎

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
