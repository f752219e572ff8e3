//! Dialogue Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::VoiceCatalogPort;
use super::voice_handlers::available_voice_set;
use crate::application::queries::SegmentDialogue;
use crate::domain::dialogue::{segment_dialogue, DialogueConfig, DialogueSegment};
use crate::domain::voice::{VoiceBlendSpec, VoiceId};

/// SegmentDialogue Handler
///
/// 音色池每项先按音色描述校验（可为混合描述），再作为不透明的音色 ID 参与分配
pub struct SegmentDialogueHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
    config: DialogueConfig,
    default_pool: Vec<String>,
}

impl SegmentDialogueHandler {
    /// `default_pool` 为空时使用引擎的全部音色
    pub fn new(
        catalog: Arc<dyn VoiceCatalogPort>,
        config: DialogueConfig,
        default_pool: Vec<String>,
    ) -> Self {
        Self {
            catalog,
            config,
            default_pool,
        }
    }

    pub fn handle(&self, query: SegmentDialogue) -> Result<Vec<DialogueSegment>, ApplicationError> {
        let voices = self.resolve_pool(query.voice_pool)?;
        let segments = segment_dialogue(&query.text, &voices, &self.config)?;

        tracing::info!(
            segments = segments.len(),
            pool = voices.len(),
            "Dialogue segmented"
        );

        Ok(segments)
    }

    fn resolve_pool(&self, requested: Option<Vec<String>>) -> Result<Vec<VoiceId>, ApplicationError> {
        let pool = match requested {
            Some(pool) => pool,
            None if !self.default_pool.is_empty() => self.default_pool.clone(),
            None => return Ok(self.catalog.list_voices()),
        };

        let available = available_voice_set(self.catalog.as_ref());
        pool.iter()
            .map(|entry| -> Result<VoiceId, ApplicationError> {
                VoiceBlendSpec::parse(entry, &available)?;
                Ok(VoiceId::new(entry.trim()))
            })
            .collect()
    }
}
