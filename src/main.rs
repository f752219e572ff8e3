//! Polyvox - 多音色语音合成命令行
//!
//! - Domain: voice/, dialogue/, profile/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: adapters

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use polyvox::application::{
    ListEffects, ListEffectsHandler, ListEmotions, ListEmotionsHandler, ListPresets,
    ListPresetsHandler, ListVoices, ListVoicesHandler, ParseVoiceSpec, ParseVoiceSpecHandler,
    SegmentDialogue, SegmentDialogueHandler, SynthesisOptions, SynthesizeDialogue,
    SynthesizeDialogueHandler,
};
use polyvox::config::{load_config, load_config_from_path, print_config, AppConfig, LogConfig};
use polyvox::infrastructure::InMemoryVoiceEngine;

#[derive(Debug, Parser)]
#[command(name = "polyvox", version, about = "Multi-voice text preparation for speech synthesis")]
struct Cli {
    /// 配置文件路径（默认搜索 polyvox.toml / polyvox.local.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List configured voices
    Voices,
    /// Parse and normalize a voice spec such as "af_sarah:60,am_adam:40"
    Blend { spec: String },
    /// Split dialogue text into speaker segments
    Segment {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
        /// Comma-separated voice pool overriding the configured one
        #[arg(long, value_delimiter = ',')]
        voices: Option<Vec<String>>,
    },
    /// List emotion profiles
    Emotions,
    /// List audio effects
    Effects,
    /// List voice presets
    Presets,
    /// Dry-run dialogue synthesis against the in-memory engine
    Render {
        file: Option<PathBuf>,
        #[arg(long, value_delimiter = ',')]
        voices: Option<Vec<String>>,
        #[arg(long)]
        emotion: Option<String>,
        #[arg(long)]
        effect: Option<String>,
        #[arg(long)]
        speed: Option<f32>,
        #[arg(long)]
        language: Option<String>,
    },
}

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},polyvox={}", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    // stdout 只输出结果 JSON
    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => Ok(tokio::fs::read_to_string(&path).await?),
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config: AppConfig = match &cli.config {
        Some(path) => load_config_from_path(Some(path.as_path())),
        None => load_config(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);
    print_config(&config);

    let registry = Arc::new(config.build_registry()?);
    let engine = Arc::new(InMemoryVoiceEngine::with_voice_ids(
        config.voices.available.iter().map(String::as_str),
    ));

    match cli.command {
        Command::Voices => {
            let voices = ListVoicesHandler::new(engine).handle(ListVoices)?;
            print_json(&voices)?;
        }
        Command::Blend { spec } => {
            let parsed = ParseVoiceSpecHandler::new(engine).handle(ParseVoiceSpec { spec })?;
            print_json(&parsed)?;
        }
        Command::Segment { file, voices } => {
            let text = read_input(file).await?;
            let handler = SegmentDialogueHandler::new(
                engine,
                config.dialogue.to_domain(),
                config.voice_pool().to_vec(),
            );
            let segments = handler.handle(SegmentDialogue {
                text,
                voice_pool: voices,
            })?;
            print_json(&segments)?;
        }
        Command::Emotions => {
            print_json(&ListEmotionsHandler::new(registry).handle(ListEmotions)?)?;
        }
        Command::Effects => {
            print_json(&ListEffectsHandler::new(registry).handle(ListEffects)?)?;
        }
        Command::Presets => {
            print_json(&ListPresetsHandler::new(registry).handle(ListPresets)?)?;
        }
        Command::Render {
            file,
            voices,
            emotion,
            effect,
            speed,
            language,
        } => {
            let text = read_input(file).await?;
            let handler = SynthesizeDialogueHandler::new(
                engine,
                registry,
                config.dialogue.to_domain(),
                config.voice_pool().to_vec(),
            );
            let synthesis = &config.synthesis;
            let response = handler
                .handle(SynthesizeDialogue {
                    text,
                    voice_pool: voices,
                    options: SynthesisOptions {
                        speed: speed.unwrap_or(synthesis.speed),
                        language: language.unwrap_or_else(|| synthesis.language.clone()),
                        emotion: emotion.unwrap_or_else(|| synthesis.emotion.clone()),
                        effect: effect.unwrap_or_else(|| synthesis.effect.clone()),
                    },
                })
                .await?;

            tracing::info!(
                render_id = %response.render_id,
                duration_ms = response.total_duration_ms(),
                "Render complete"
            );
            print_json(&response)?;
        }
    }

    Ok(())
}
