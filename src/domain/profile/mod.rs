//! Profile Context - 情绪 / 音效 / 预设
//!
//! 职责:
//! - 固定字段的情绪参数与音效参数记录
//! - 由调用方持有的注册表（无全局状态）

mod effect;
mod emotion;
mod errors;
mod registry;

pub use effect::AudioEffect;
pub use emotion::{EmotionProfile, PITCH_RANGE, SPEED_RANGE};
pub use errors::ProfileError;
pub use registry::{ProfileRegistry, VoicePreset, NEUTRAL_EMOTION, NO_EFFECT};
