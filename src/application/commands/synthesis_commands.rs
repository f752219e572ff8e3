//! Synthesis Commands

use crate::domain::profile::{NEUTRAL_EMOTION, NO_EFFECT};

/// 合成参数
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// 基础语速，最终语速 = speed * 情绪语速倍率
    pub speed: f32,
    pub language: String,
    /// 情绪名称，未知情绪回退为 neutral
    pub emotion: String,
    /// 音效名称，必须已注册
    pub effect: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            language: "en-us".to_string(),
            emotion: NEUTRAL_EMOTION.to_string(),
            effect: NO_EFFECT.to_string(),
        }
    }
}

/// 单段文本合成命令
#[derive(Debug, Clone)]
pub struct SynthesizeText {
    pub text: String,
    /// 音色描述（单音色或混合描述）
    pub voice: String,
    pub options: SynthesisOptions,
}

/// 按预设合成命令：音色、语速、情绪、音效都取自预设
#[derive(Debug, Clone)]
pub struct SynthesizeWithPreset {
    pub text: String,
    pub preset: String,
    pub language: String,
}

/// 对话合成命令
#[derive(Debug, Clone)]
pub struct SynthesizeDialogue {
    pub text: String,
    /// 音色池，为 None 时使用默认音色池
    pub voice_pool: Option<Vec<String>>,
    pub options: SynthesisOptions,
}
