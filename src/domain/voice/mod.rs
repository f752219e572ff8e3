//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 音色混合描述解析与权重归一化
//! - 音色向量加权混合

mod blend_spec;
mod blender;
mod errors;
mod value_objects;

pub use blend_spec::{BlendEntry, VoiceBlendSpec, FULL_WEIGHT, WEIGHT_TOLERANCE};
pub use blender::blend_embeddings;
pub use errors::VoiceError;
pub use value_objects::{VoiceEmbedding, VoiceId};
