//! Synthesis Command Handlers

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::voice_handlers::resolve_voice;
use crate::application::commands::{
    SynthesisOptions, SynthesizeDialogue, SynthesizeText, SynthesizeWithPreset,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{SynthesisEnginePort, SynthesisOutput, SynthesisRequest, VoiceInput};
use crate::application::queries::handlers::SegmentDialogueHandler;
use crate::application::queries::SegmentDialogue;
use crate::domain::dialogue::{DialogueConfig, SpeakerLabel};
use crate::domain::profile::{AudioEffect, ProfileRegistry, SPEED_RANGE};

// ============================================================================
// Response DTOs
// ============================================================================

/// 单个已合成片段
#[derive(Debug, Clone, Serialize)]
pub struct RenderedSegment {
    /// 对话合成时为说话人，单段合成时为 None
    pub speaker: Option<SpeakerLabel>,
    pub text: String,
    /// 单音色为 ID，混合音色为归一化后的描述
    pub voice: String,
    /// 情绪缩放后的语速
    pub speed: f32,
    pub pitch: f32,
    pub emphasis: String,
    /// 音效参数，随音频一起交给后处理
    pub effect: AudioEffect,
    pub duration_ms: u64,
    #[serde(skip)]
    pub output: SynthesisOutput,
}

/// 合成结果
#[derive(Debug, Clone, Serialize)]
pub struct RenderResponse {
    pub render_id: Uuid,
    pub segments: Vec<RenderedSegment>,
}

impl RenderResponse {
    pub fn total_duration_ms(&self) -> u64 {
        self.segments.iter().map(|s| s.duration_ms).sum()
    }
}

// ============================================================================
// 渲染参数
// ============================================================================

/// 情绪与音效解析后的参数，同一命令内所有片段共用
#[derive(Debug, Clone)]
struct RenderPlan {
    speed: f32,
    pitch: f32,
    emphasis: String,
    effect: AudioEffect,
    language: String,
}

impl RenderPlan {
    fn build(registry: &ProfileRegistry, options: &SynthesisOptions) -> Result<Self, ApplicationError> {
        let emotion = registry.emotion_or_neutral(&options.emotion);
        let effect = registry.effect(&options.effect)?.clone();

        let speed = options.speed * emotion.speed;
        if !speed.is_finite() || !SPEED_RANGE.contains(&speed) {
            return Err(ApplicationError::validation(format!(
                "speed {:.2} (base {} x emotion '{}' {}) must be between 0.5 and 2.0",
                speed, options.speed, options.emotion, emotion.speed
            )));
        }

        Ok(Self {
            speed,
            pitch: emotion.pitch,
            emphasis: emotion.emphasis,
            effect,
            language: options.language.clone(),
        })
    }
}

/// 逐段调用引擎；空白片段跳过，同一命令内相同音色只解析一次
async fn render<I>(
    engine: &dyn SynthesisEnginePort,
    plan: &RenderPlan,
    render_id: Uuid,
    segments: I,
) -> Result<Vec<RenderedSegment>, ApplicationError>
where
    I: IntoIterator<Item = (Option<SpeakerLabel>, String, String)>,
{
    let mut resolved: HashMap<String, (String, VoiceInput)> = HashMap::new();
    let mut rendered = Vec::new();

    for (index, (speaker, text, voice)) in segments.into_iter().enumerate() {
        if text.trim().is_empty() {
            tracing::debug!(render_id = %render_id, index, "Skipping empty segment");
            continue;
        }

        let (normalized, input) = match resolved.get(&voice) {
            Some(hit) => hit.clone(),
            None => {
                let r = resolve_voice(engine, &voice)?;
                let label = match r.spec.single_voice() {
                    Some(id) => id.to_string(),
                    None => r.spec.to_string(),
                };
                let entry = (label, r.voice);
                resolved.insert(voice.clone(), entry.clone());
                entry
            }
        };

        let output = engine
            .synthesize(SynthesisRequest {
                text: text.clone(),
                voice: input,
                speed: plan.speed,
                language: plan.language.clone(),
            })
            .await?;

        tracing::debug!(
            render_id = %render_id,
            index,
            voice = %normalized,
            duration_ms = output.duration_ms(),
            "Segment synthesized"
        );

        rendered.push(RenderedSegment {
            speaker,
            text,
            voice: normalized,
            speed: plan.speed,
            pitch: plan.pitch,
            emphasis: plan.emphasis.clone(),
            effect: plan.effect.clone(),
            duration_ms: output.duration_ms(),
            output,
        });
    }

    Ok(rendered)
}

// ============================================================================
// SynthesizeText
// ============================================================================

/// SynthesizeText Handler
pub struct SynthesizeTextHandler {
    engine: Arc<dyn SynthesisEnginePort>,
    registry: Arc<ProfileRegistry>,
}

impl SynthesizeTextHandler {
    pub fn new(engine: Arc<dyn SynthesisEnginePort>, registry: Arc<ProfileRegistry>) -> Self {
        Self { engine, registry }
    }

    pub async fn handle(&self, command: SynthesizeText) -> Result<RenderResponse, ApplicationError> {
        let render_id = Uuid::new_v4();
        let plan = RenderPlan::build(&self.registry, &command.options)?;

        let segments = render(
            self.engine.as_ref(),
            &plan,
            render_id,
            [(None, command.text, command.voice)],
        )
        .await?;

        tracing::info!(
            render_id = %render_id,
            segments = segments.len(),
            emotion = %command.options.emotion,
            effect = plan.effect.kind(),
            "Text synthesized"
        );

        Ok(RenderResponse { render_id, segments })
    }
}

// ============================================================================
// SynthesizeWithPreset
// ============================================================================

/// SynthesizeWithPreset Handler
pub struct SynthesizeWithPresetHandler {
    inner: SynthesizeTextHandler,
}

impl SynthesizeWithPresetHandler {
    pub fn new(engine: Arc<dyn SynthesisEnginePort>, registry: Arc<ProfileRegistry>) -> Self {
        Self {
            inner: SynthesizeTextHandler::new(engine, registry),
        }
    }

    pub async fn handle(&self, command: SynthesizeWithPreset) -> Result<RenderResponse, ApplicationError> {
        let preset = self.inner.registry.preset(&command.preset)?.clone();

        tracing::debug!(preset = %command.preset, voice = %preset.voice, "Using preset");

        self.inner
            .handle(SynthesizeText {
                text: command.text,
                voice: preset.voice,
                options: SynthesisOptions {
                    speed: preset.speed,
                    language: command.language,
                    emotion: preset.emotion,
                    effect: preset.effect,
                },
            })
            .await
    }
}

// ============================================================================
// SynthesizeDialogue
// ============================================================================

/// SynthesizeDialogue Handler
///
/// 先分段，再按原文顺序逐段合成；音色池条目可以是混合描述
pub struct SynthesizeDialogueHandler {
    engine: Arc<dyn SynthesisEnginePort>,
    registry: Arc<ProfileRegistry>,
    segmenter: SegmentDialogueHandler,
}

impl SynthesizeDialogueHandler {
    pub fn new<E>(
        engine: Arc<E>,
        registry: Arc<ProfileRegistry>,
        config: DialogueConfig,
        default_pool: Vec<String>,
    ) -> Self
    where
        E: SynthesisEnginePort + 'static,
    {
        Self {
            segmenter: SegmentDialogueHandler::new(engine.clone(), config, default_pool),
            engine,
            registry,
        }
    }

    pub async fn handle(&self, command: SynthesizeDialogue) -> Result<RenderResponse, ApplicationError> {
        let render_id = Uuid::new_v4();
        let plan = RenderPlan::build(&self.registry, &command.options)?;

        let segments = self.segmenter.handle(SegmentDialogue {
            text: command.text,
            voice_pool: command.voice_pool,
        })?;

        let rendered = render(
            self.engine.as_ref(),
            &plan,
            render_id,
            segments
                .into_iter()
                .map(|s| (Some(s.speaker), s.text, s.voice.to_string())),
        )
        .await?;

        tracing::info!(
            render_id = %render_id,
            segments = rendered.len(),
            emotion = %command.options.emotion,
            effect = plan.effect.kind(),
            "Dialogue synthesized"
        );

        Ok(RenderResponse {
            render_id,
            segments: rendered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::VoicePreset;
    use crate::infrastructure::adapters::InMemoryVoiceEngine;

    fn engine() -> Arc<InMemoryVoiceEngine> {
        Arc::new(InMemoryVoiceEngine::with_voice_ids(["af_sarah", "am_adam", "bf_emma"]))
    }

    fn registry() -> Arc<ProfileRegistry> {
        Arc::new(ProfileRegistry::with_builtins())
    }

    fn options(emotion: &str, effect: &str) -> SynthesisOptions {
        SynthesisOptions {
            emotion: emotion.to_string(),
            effect: effect.to_string(),
            ..SynthesisOptions::default()
        }
    }

    #[tokio::test]
    async fn test_text_applies_emotion_and_effect() {
        let engine = engine();
        let handler = SynthesizeTextHandler::new(engine.clone(), registry());

        let response = handler
            .handle(SynthesizeText {
                text: "What a day!".to_string(),
                voice: "af_sarah".to_string(),
                options: options("happy", "reverb_light"),
            })
            .await
            .unwrap();

        assert_eq!(response.segments.len(), 1);
        let segment = &response.segments[0];
        assert!((segment.speed - 1.1).abs() < 1e-6);
        assert_eq!(segment.emphasis, "bright");
        assert_eq!(segment.effect.kind(), "reverb");
        assert!(segment.speaker.is_none());

        let requests = engine.recorded_requests().await;
        assert_eq!(requests[0].voice, VoiceInput::Id("af_sarah".into()));
        assert!((requests[0].speed - 1.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unknown_emotion_falls_back_to_neutral() {
        let handler = SynthesizeTextHandler::new(engine(), registry());
        let response = handler
            .handle(SynthesizeText {
                text: "Hello".to_string(),
                voice: "am_adam".to_string(),
                options: options("melancholic", "none"),
            })
            .await
            .unwrap();

        let segment = &response.segments[0];
        assert_eq!(segment.speed, 1.0);
        assert_eq!(segment.emphasis, "normal");
    }

    #[tokio::test]
    async fn test_unknown_effect_rejected() {
        let err = SynthesizeTextHandler::new(engine(), registry())
            .handle(SynthesizeText {
                text: "Hello".to_string(),
                voice: "am_adam".to_string(),
                options: options("neutral", "flanger"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_scaled_speed_out_of_range_rejected() {
        let engine = engine();
        let mut opts = options("excited", "none");
        opts.speed = 1.8;

        let err = SynthesizeTextHandler::new(engine.clone(), registry())
            .handle(SynthesizeText {
                text: "Hello".to_string(),
                voice: "am_adam".to_string(),
                options: opts,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert!(engine.recorded_requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_blend_sends_embedding() {
        let engine = engine();
        let response = SynthesizeTextHandler::new(engine.clone(), registry())
            .handle(SynthesizeText {
                text: "Blended".to_string(),
                voice: "af_sarah:60,am_adam:40".to_string(),
                options: SynthesisOptions::default(),
            })
            .await
            .unwrap();

        assert_eq!(response.segments[0].voice, "af_sarah:60,am_adam:40");
        let requests = engine.recorded_requests().await;
        assert!(matches!(requests[0].voice, VoiceInput::Embedding(_)));
    }

    #[tokio::test]
    async fn test_engine_failure_is_external() {
        let mut opts = SynthesisOptions::default();
        opts.language = "tlh".to_string();

        let err = SynthesizeTextHandler::new(engine(), registry())
            .handle(SynthesizeText {
                text: "Hello".to_string(),
                voice: "af_sarah".to_string(),
                options: opts,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_preset_supplies_voice_and_emotion() {
        let registry = ProfileRegistry::with_builtins()
            .register_preset(
                "bedtime",
                VoicePreset {
                    voice: "bf_emma".to_string(),
                    speed: 1.0,
                    emotion: "calm".to_string(),
                    effect: "reverb_light".to_string(),
                },
            )
            .unwrap();
        let engine = engine();
        let handler = SynthesizeWithPresetHandler::new(engine.clone(), Arc::new(registry));

        let response = handler
            .handle(SynthesizeWithPreset {
                text: "Once upon a time".to_string(),
                preset: "bedtime".to_string(),
                language: "en-gb".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.segments[0].voice, "bf_emma");
        assert!((response.segments[0].speed - 0.9).abs() < 1e-6);
        assert_eq!(engine.recorded_requests().await[0].language, "en-gb");

        let err = handler
            .handle(SynthesizeWithPreset {
                text: "x".to_string(),
                preset: "missing".to_string(),
                language: "en-us".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_dialogue_renders_in_text_order() {
        let engine = engine();
        let handler = SynthesizeDialogueHandler::new(
            engine.clone(),
            registry(),
            DialogueConfig::default(),
            vec![],
        );

        let response = handler
            .handle(SynthesizeDialogue {
                text: "Alice: Hi Bob.\nBob: Hello Alice!\nAlice: How are you?".to_string(),
                voice_pool: Some(vec!["af_sarah:50,bf_emma:50".to_string(), "am_adam".to_string()]),
                options: SynthesisOptions::default(),
            })
            .await
            .unwrap();

        let speakers: Vec<&str> = response
            .segments
            .iter()
            .map(|s| s.speaker.as_ref().map(|l| l.as_str()).unwrap_or(""))
            .collect();
        assert_eq!(speakers, vec!["Alice", "Bob", "Alice"]);
        assert_eq!(response.segments[0].voice, "af_sarah:50,bf_emma:50");
        assert_eq!(response.segments[1].voice, "am_adam");

        let requests = engine.recorded_requests().await;
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].text, "Hello Alice!");
        assert_eq!(requests[0].voice, requests[2].voice);
        assert!(response.total_duration_ms() > 0);
    }

    #[tokio::test]
    async fn test_dialogue_skips_empty_utterances() {
        let engine = engine();
        let handler = SynthesizeDialogueHandler::new(
            engine.clone(),
            registry(),
            DialogueConfig::default(),
            vec![],
        );

        let response = handler
            .handle(SynthesizeDialogue {
                text: "Alice:\nBob: Still here.".to_string(),
                voice_pool: None,
                options: SynthesisOptions::default(),
            })
            .await
            .unwrap();

        assert_eq!(response.segments.len(), 1);
        assert_eq!(engine.recorded_requests().await.len(), 1);
    }
}
