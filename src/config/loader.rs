//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（polyvox.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::profile::SPEED_RANGE;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["polyvox", "polyvox.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "POLYVOX";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `POLYVOX_`，层级分隔符 `__`）
/// 2. 配置文件（polyvox.toml 或 polyvox.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `POLYVOX_SYNTHESIS__SPEED=1.2`
/// - `POLYVOX_DIALOGUE__NARRATOR_LABEL=Narrator`
/// - `POLYVOX_VOICES__AVAILABLE=af_sarah,am_adam`（逗号分隔的列表）
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("dialogue.narrator_label", "narrator")?
        .set_default("synthesis.speed", 1.0)?
        .set_default("synthesis.language", "en-us")?
        .set_default("synthesis.emotion", "neutral")?
        .set_default("synthesis.effect", "none")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），列表项以逗号分隔
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("voices.available")
            .with_list_parse_key("dialogue.voice_pool"),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.voices.available.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one voice must be available".to_string(),
        ));
    }

    if config
        .voices
        .available
        .iter()
        .any(|v| v.trim().is_empty() || v.contains(&[',', ':'][..]))
    {
        return Err(ConfigError::ValidationError(
            "Voice ids cannot be empty or contain ',' or ':'".to_string(),
        ));
    }

    if matches!(&config.dialogue.voice_pool, Some(pool) if pool.is_empty()) {
        return Err(ConfigError::ValidationError(
            "Dialogue voice pool cannot be empty when set".to_string(),
        ));
    }

    if config.dialogue.narrator_label.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Narrator label cannot be empty".to_string(),
        ));
    }

    if !SPEED_RANGE.contains(&config.synthesis.speed) {
        return Err(ConfigError::ValidationError(format!(
            "Synthesis speed {} must be between 0.5 and 2.0",
            config.synthesis.speed
        )));
    }

    if config.synthesis.language.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Synthesis language cannot be empty".to_string(),
        ));
    }

    if config.log.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Log level cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::debug!("=== Application Configuration ===");
    tracing::debug!("Voices: {}", config.voices.available.join(","));
    tracing::debug!("Voice Pool: {}", config.voice_pool().join(","));
    tracing::debug!("Narrator Label: {}", config.dialogue.narrator_label);
    tracing::debug!(
        "Synthesis: speed={} language={} emotion={} effect={}",
        config.synthesis.speed,
        config.synthesis.language,
        config.synthesis.emotion,
        config.synthesis.effect
    );
    tracing::debug!(
        "Custom Profiles: {} emotions, {} effects, {} presets",
        config.profiles.emotions.len(),
        config.profiles.effects.len(),
        config.profiles.presets.len()
    );
    tracing::debug!("Log Level: {}", config.log.level);
    tracing::debug!("=================================");
}
