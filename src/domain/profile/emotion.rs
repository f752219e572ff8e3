//! 情绪参数

use serde::{Deserialize, Serialize};

use super::ProfileError;

/// 语速倍率范围
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.5..=2.0;

/// 音调偏移范围
pub const PITCH_RANGE: std::ops::RangeInclusive<f32> = -1.0..=1.0;

/// 情绪参数
///
/// 固定字段；未知字段在反序列化时报错
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmotionProfile {
    /// 语速倍率，默认 1.0
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// 音调偏移，默认 0.0
    #[serde(default)]
    pub pitch: f32,
    /// 重音风格，默认 "normal"
    #[serde(default = "default_emphasis")]
    pub emphasis: String,
}

fn default_speed() -> f32 {
    1.0
}

fn default_emphasis() -> String {
    "normal".to_string()
}

impl Default for EmotionProfile {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            pitch: 0.0,
            emphasis: default_emphasis(),
        }
    }
}

impl EmotionProfile {
    pub fn new(speed: f32, pitch: f32, emphasis: impl Into<String>) -> Self {
        Self {
            speed,
            pitch,
            emphasis: emphasis.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if !SPEED_RANGE.contains(&self.speed) {
            return Err(ProfileError::InvalidParameter(format!(
                "speed {} must be between 0.5 and 2.0",
                self.speed
            )));
        }
        if !PITCH_RANGE.contains(&self.pitch) {
            return Err(ProfileError::InvalidParameter(format!(
                "pitch {} must be between -1.0 and 1.0",
                self.pitch
            )));
        }
        if self.emphasis.trim().is_empty() {
            return Err(ProfileError::InvalidParameter(
                "emphasis cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 内置情绪
pub(crate) fn builtin_emotions() -> Vec<(&'static str, EmotionProfile)> {
    vec![
        ("neutral", EmotionProfile::default()),
        ("happy", EmotionProfile::new(1.1, 0.1, "bright")),
        ("sad", EmotionProfile::new(0.85, -0.15, "soft")),
        ("angry", EmotionProfile::new(1.15, 0.05, "strong")),
        ("calm", EmotionProfile::new(0.9, -0.05, "gentle")),
        ("excited", EmotionProfile::new(1.25, 0.2, "energetic")),
        ("whisper", EmotionProfile::new(0.8, -0.2, "soft")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let profile: EmotionProfile = serde_json::from_str(r#"{"speed": 0.8}"#).unwrap();
        assert_eq!(profile.speed, 0.8);
        assert_eq!(profile.pitch, 0.0);
        assert_eq!(profile.emphasis, "normal");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<EmotionProfile, _> = serde_json::from_str(r#"{"sped": 0.8}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        assert!(EmotionProfile::new(1.5, 0.8, "very_strong").validate().is_ok());
        assert!(EmotionProfile::new(3.0, 0.0, "normal").validate().is_err());
        assert!(EmotionProfile::new(1.0, -2.0, "normal").validate().is_err());
        assert!(EmotionProfile::new(1.0, 0.0, " ").validate().is_err());
    }

    #[test]
    fn test_builtins_differ_from_neutral() {
        let builtins = builtin_emotions();
        let neutral = &builtins[0].1;
        for (name, profile) in &builtins[1..] {
            assert!(profile.validate().is_ok(), "{} invalid", name);
            assert_ne!(profile.speed, neutral.speed, "{} speed", name);
            assert_ne!(profile.pitch, neutral.pitch, "{} pitch", name);
        }
    }
}
