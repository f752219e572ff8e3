//! 情绪 / 音效 / 预设注册表
//!
//! 由调用方持有的普通值：启动时构建，按引用传给需要查询的组件。
//! 注册方法消费旧值并返回新的注册表，不存在进程级共享状态

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::emotion::{builtin_emotions, SPEED_RANGE};
use super::effect::builtin_effects;
use super::{AudioEffect, EmotionProfile, ProfileError};

/// 未知情绪回退到的名称
pub const NEUTRAL_EMOTION: &str = "neutral";

/// 不加音效
pub const NO_EFFECT: &str = "none";

/// 名称最大长度
const MAX_NAME_LEN: usize = 64;

/// 用户预设（只保存在内存中）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoicePreset {
    /// 音色描述（单音色或混合描述）
    pub voice: String,
    #[serde(default = "default_preset_speed")]
    pub speed: f32,
    #[serde(default = "default_preset_emotion")]
    pub emotion: String,
    #[serde(default = "default_preset_effect")]
    pub effect: String,
}

fn default_preset_speed() -> f32 {
    1.0
}

fn default_preset_emotion() -> String {
    NEUTRAL_EMOTION.to_string()
}

fn default_preset_effect() -> String {
    NO_EFFECT.to_string()
}

impl VoicePreset {
    pub fn new(voice: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            speed: default_preset_speed(),
            emotion: default_preset_emotion(),
            effect: default_preset_effect(),
        }
    }
}

/// 注册表
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    emotions: BTreeMap<String, EmotionProfile>,
    effects: BTreeMap<String, AudioEffect>,
    presets: BTreeMap<String, VoicePreset>,
}

impl ProfileRegistry {
    /// 空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 带内置情绪与音效的注册表
    pub fn with_builtins() -> Self {
        Self {
            emotions: builtin_emotions()
                .into_iter()
                .map(|(name, profile)| (name.to_string(), profile))
                .collect(),
            effects: builtin_effects()
                .into_iter()
                .map(|(name, effect)| (name.to_string(), effect))
                .collect(),
            presets: BTreeMap::new(),
        }
    }

    /// 注册（或覆盖）情绪
    pub fn register_emotion(
        mut self,
        name: &str,
        profile: EmotionProfile,
    ) -> Result<Self, ProfileError> {
        let name = validate_name(name)?;
        profile.validate()?;
        tracing::debug!(emotion = %name, speed = profile.speed, pitch = profile.pitch, "Emotion registered");
        self.emotions.insert(name, profile);
        Ok(self)
    }

    /// 注册（或覆盖）音效
    pub fn register_effect(mut self, name: &str, effect: AudioEffect) -> Result<Self, ProfileError> {
        let name = validate_name(name)?;
        effect.validate()?;
        tracing::debug!(effect = %name, kind = effect.kind(), "Audio effect registered");
        self.effects.insert(name, effect);
        Ok(self)
    }

    /// 注册（或覆盖）预设，情绪与音效必须已注册
    pub fn register_preset(mut self, name: &str, preset: VoicePreset) -> Result<Self, ProfileError> {
        let name = validate_name(name)?;

        if preset.voice.trim().is_empty() {
            return Err(ProfileError::InvalidParameter(
                "preset voice cannot be empty".to_string(),
            ));
        }
        if !SPEED_RANGE.contains(&preset.speed) {
            return Err(ProfileError::InvalidParameter(format!(
                "preset speed {} must be between 0.5 and 2.0",
                preset.speed
            )));
        }
        if !self.emotions.contains_key(&preset.emotion) {
            return Err(ProfileError::UnknownEmotion(preset.emotion));
        }
        if !self.effects.contains_key(&preset.effect) {
            return Err(ProfileError::UnknownEffect(preset.effect));
        }

        tracing::debug!(preset = %name, voice = %preset.voice, "Preset registered");
        self.presets.insert(name, preset);
        Ok(self)
    }

    pub fn find_emotion(&self, name: &str) -> Option<&EmotionProfile> {
        self.emotions.get(name)
    }

    /// 查询情绪，不存在时回退到 neutral（或默认参数）
    pub fn emotion_or_neutral(&self, name: &str) -> EmotionProfile {
        if let Some(profile) = self.emotions.get(name) {
            return profile.clone();
        }
        tracing::debug!(emotion = %name, "Unknown emotion, falling back to neutral");
        self.emotions
            .get(NEUTRAL_EMOTION)
            .cloned()
            .unwrap_or_default()
    }

    pub fn effect(&self, name: &str) -> Result<&AudioEffect, ProfileError> {
        self.effects
            .get(name)
            .ok_or_else(|| ProfileError::UnknownEffect(name.to_string()))
    }

    pub fn preset(&self, name: &str) -> Result<&VoicePreset, ProfileError> {
        self.presets
            .get(name)
            .ok_or_else(|| ProfileError::UnknownPreset(name.to_string()))
    }

    /// 按名称排序
    pub fn emotions(&self) -> impl Iterator<Item = (&str, &EmotionProfile)> {
        self.emotions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn effects(&self) -> impl Iterator<Item = (&str, &AudioEffect)> {
        self.effects.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn presets(&self) -> impl Iterator<Item = (&str, &VoicePreset)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn validate_name(name: &str) -> Result<String, ProfileError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProfileError::InvalidName("名称不能为空".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ProfileError::InvalidName(format!(
            "名称长度不能超过{}字符: {}",
            MAX_NAME_LEN, name
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ProfileError::InvalidName(name.to_string()));
    }
    Ok(name.to_string())
}
