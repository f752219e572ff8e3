//! 音效参数
//!
//! 只保存参数记录，不做任何波形处理

use serde::{Deserialize, Serialize};

use super::ProfileError;

/// 音效参数
///
/// 以 `kind` 区分种类，每种有固定字段与默认值；未知字段在反序列化时报错
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum AudioEffect {
    /// 空结构变体，多余字段同样报错
    None {},
    Reverb {
        /// 混响量 (0.0 - 1.0)
        #[serde(default = "default_reverb_amount")]
        amount: f32,
        /// 房间大小 (0.0 - 1.0)
        #[serde(default = "default_room_size")]
        room_size: f32,
    },
    Echo {
        /// 延迟（秒）
        #[serde(default = "default_echo_delay")]
        delay_secs: f32,
        /// 衰减 (0.0 - 1.0)
        #[serde(default = "default_echo_decay")]
        decay: f32,
        /// 干湿比 (0.0 - 1.0)
        #[serde(default = "default_mix")]
        mix: f32,
    },
    Chorus {
        /// 深度 (0.0 - 1.0)
        #[serde(default = "default_chorus_depth")]
        depth: f32,
        /// 调制频率（Hz）
        #[serde(default = "default_chorus_rate")]
        rate_hz: f32,
    },
    Radio {
        /// 低通截止频率（Hz）
        #[serde(default = "default_low_pass")]
        low_pass_hz: f32,
        /// 压缩量 (0.0 - 1.0)
        #[serde(default = "default_compression")]
        compression: f32,
    },
    Gain {
        /// 增益倍率
        #[serde(default = "default_gain")]
        gain: f32,
        /// 音调偏移（半音）
        #[serde(default)]
        pitch_shift: f32,
    },
}

fn default_reverb_amount() -> f32 {
    0.3
}

fn default_room_size() -> f32 {
    0.5
}

fn default_echo_delay() -> f32 {
    0.25
}

fn default_echo_decay() -> f32 {
    0.5
}

fn default_mix() -> f32 {
    0.3
}

fn default_chorus_depth() -> f32 {
    0.5
}

fn default_chorus_rate() -> f32 {
    1.5
}

fn default_low_pass() -> f32 {
    3000.0
}

fn default_compression() -> f32 {
    0.6
}

fn default_gain() -> f32 {
    1.0
}

fn check_unit(name: &str, value: f32) -> Result<(), ProfileError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ProfileError::InvalidParameter(format!(
            "{} {} must be between 0.0 and 1.0",
            name, value
        )))
    }
}

fn check_positive(name: &str, value: f32) -> Result<(), ProfileError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProfileError::InvalidParameter(format!(
            "{} {} must be positive",
            name, value
        )))
    }
}

impl AudioEffect {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None {} => "none",
            Self::Reverb { .. } => "reverb",
            Self::Echo { .. } => "echo",
            Self::Chorus { .. } => "chorus",
            Self::Radio { .. } => "radio",
            Self::Gain { .. } => "gain",
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        match *self {
            Self::None {} => Ok(()),
            Self::Reverb { amount, room_size } => {
                check_unit("amount", amount)?;
                check_unit("room_size", room_size)
            }
            Self::Echo {
                delay_secs,
                decay,
                mix,
            } => {
                check_positive("delay_secs", delay_secs)?;
                check_unit("decay", decay)?;
                check_unit("mix", mix)
            }
            Self::Chorus { depth, rate_hz } => {
                check_unit("depth", depth)?;
                check_positive("rate_hz", rate_hz)
            }
            Self::Radio {
                low_pass_hz,
                compression,
            } => {
                check_positive("low_pass_hz", low_pass_hz)?;
                check_unit("compression", compression)
            }
            Self::Gain { gain, pitch_shift } => {
                check_positive("gain", gain)?;
                if pitch_shift.is_finite() && (-12.0..=12.0).contains(&pitch_shift) {
                    Ok(())
                } else {
                    Err(ProfileError::InvalidParameter(format!(
                        "pitch_shift {} must be between -12 and 12",
                        pitch_shift
                    )))
                }
            }
        }
    }
}

/// 内置音效
pub(crate) fn builtin_effects() -> Vec<(&'static str, AudioEffect)> {
    vec![
        ("none", AudioEffect::None {}),
        (
            "reverb_light",
            AudioEffect::Reverb {
                amount: 0.2,
                room_size: 0.3,
            },
        ),
        (
            "reverb_heavy",
            AudioEffect::Reverb {
                amount: 0.6,
                room_size: 0.8,
            },
        ),
        (
            "echo",
            AudioEffect::Echo {
                delay_secs: 0.3,
                decay: 0.5,
                mix: 0.4,
            },
        ),
        (
            "chorus",
            AudioEffect::Chorus {
                depth: 0.5,
                rate_hz: 1.5,
            },
        ),
        (
            "radio",
            AudioEffect::Radio {
                low_pass_hz: 3000.0,
                compression: 0.7,
            },
        ),
        (
            "telephone",
            AudioEffect::Radio {
                low_pass_hz: 3400.0,
                compression: 0.9,
            },
        ),
    ]
}
