//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::domain::dialogue::{DialogueConfig as DomainDialogueConfig, NARRATOR_LABEL};
use crate::domain::profile::{
    AudioEffect, EmotionProfile, ProfileError, ProfileRegistry, VoicePreset, NEUTRAL_EMOTION,
    NO_EFFECT,
};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 音色配置
    #[serde(default)]
    pub voices: VoicesConfig,

    /// 对话分段配置
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// 合成默认参数
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 自定义情绪 / 音效 / 预设
    #[serde(default)]
    pub profiles: ProfilesConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 对话分段使用的音色池：未配置时使用全部可用音色
    pub fn voice_pool(&self) -> &[String] {
        self.dialogue
            .voice_pool
            .as_deref()
            .unwrap_or(&self.voices.available)
    }

    /// 内置记录加上配置文件中的自定义记录
    pub fn build_registry(&self) -> Result<ProfileRegistry, ProfileError> {
        let mut registry = ProfileRegistry::with_builtins();
        for (name, profile) in &self.profiles.emotions {
            registry = registry.register_emotion(name, profile.clone())?;
        }
        for (name, effect) in &self.profiles.effects {
            registry = registry.register_effect(name, effect.clone())?;
        }
        for (name, preset) in &self.profiles.presets {
            registry = registry.register_preset(name, preset.clone())?;
        }
        Ok(registry)
    }
}

/// 音色配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesConfig {
    /// 可用音色 ID（有序）
    #[serde(default = "default_voices")]
    pub available: Vec<String>,
}

fn default_voices() -> Vec<String> {
    [
        "af_heart", "af_bella", "af_nicole", "af_sarah", "af_sky", "am_adam", "am_michael",
        "bf_emma", "bf_isabella", "bm_george", "bm_lewis",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            available: default_voices(),
        }
    }
}

/// 对话分段配置
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// 分配给说话人的音色池（条目可以是混合描述）
    #[serde(default)]
    pub voice_pool: Option<Vec<String>>,

    /// 无说话人时旁白片段使用的标签
    #[serde(default = "default_narrator_label")]
    pub narrator_label: String,
}

fn default_narrator_label() -> String {
    NARRATOR_LABEL.to_string()
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            voice_pool: None,
            narrator_label: default_narrator_label(),
        }
    }
}

impl DialogueConfig {
    pub fn to_domain(&self) -> DomainDialogueConfig {
        DomainDialogueConfig {
            narrator_label: self.narrator_label.clone(),
        }
    }
}

/// 合成默认参数
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 基础语速
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// 语言代码
    #[serde(default = "default_language")]
    pub language: String,

    /// 默认情绪
    #[serde(default = "default_emotion")]
    pub emotion: String,

    /// 默认音效
    #[serde(default = "default_effect")]
    pub effect: String,
}

fn default_speed() -> f32 {
    1.0
}

fn default_language() -> String {
    "en-us".to_string()
}

fn default_emotion() -> String {
    NEUTRAL_EMOTION.to_string()
}

fn default_effect() -> String {
    NO_EFFECT.to_string()
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            language: default_language(),
            emotion: default_emotion(),
            effect: default_effect(),
        }
    }
}

/// 自定义情绪 / 音效 / 预设（按名称）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default)]
    pub emotions: BTreeMap<String, EmotionProfile>,

    #[serde(default)]
    pub effects: BTreeMap<String, AudioEffect>,

    #[serde(default)]
    pub presets: BTreeMap<String, VoicePreset>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.voices.available.len(), 11);
        assert_eq!(config.dialogue.narrator_label, "narrator");
        assert_eq!(config.synthesis.language, "en-us");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_voice_pool_falls_back_to_available() {
        let mut config = AppConfig::default();
        assert_eq!(config.voice_pool(), config.voices.available.as_slice());

        config.dialogue.voice_pool = Some(vec!["am_adam".to_string()]);
        assert_eq!(config.voice_pool(), ["am_adam".to_string()]);
    }

    #[test]
    fn test_build_registry_adds_custom_profiles() {
        let mut config = AppConfig::default();
        config
            .profiles
            .emotions
            .insert("dramatic".to_string(), EmotionProfile::new(0.95, 0.1, "strong"));
        config
            .profiles
            .presets
            .insert("narration".to_string(), VoicePreset::new("bf_emma"));

        let registry = config.build_registry().unwrap();
        assert!(registry.find_emotion("dramatic").is_some());
        assert!(registry.find_emotion("happy").is_some());
        assert!(registry.preset("narration").is_ok());
    }

    #[test]
    fn test_build_registry_rejects_invalid_profile() {
        let mut config = AppConfig::default();
        config
            .profiles
            .emotions
            .insert("frantic".to_string(), EmotionProfile::new(5.0, 0.0, "normal"));
        assert!(config.build_registry().is_err());
    }
}
