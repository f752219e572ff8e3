//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（VoiceCatalog、SynthesisEngine）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Voice commands
    ResolveVoice,
    // Synthesis commands
    SynthesisOptions,
    SynthesizeDialogue,
    SynthesizeText,
    SynthesizeWithPreset,
    // Handlers
    handlers::{
        RenderResponse, RenderedSegment, ResolveVoiceHandler, ResolvedVoice,
        SynthesizeDialogueHandler, SynthesizeTextHandler, SynthesizeWithPresetHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    SynthesisEnginePort, SynthesisError, SynthesisOutput, SynthesisRequest, VoiceCatalogPort,
    VoiceInput,
};

pub use queries::{
    // Voice queries
    ListVoices,
    ParseVoiceSpec,
    // Dialogue queries
    SegmentDialogue,
    // Profile queries
    ListEffects,
    ListEmotions,
    ListPresets,
    // Handlers
    handlers::{
        ListEffectsHandler, ListEmotionsHandler, ListPresetsHandler, ListVoicesHandler,
        NamedEntry, ParseVoiceSpecHandler, ParsedVoiceSpecResponse, SegmentDialogueHandler,
    },
};
