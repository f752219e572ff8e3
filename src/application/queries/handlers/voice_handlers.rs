//! Voice Query Handlers

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::VoiceCatalogPort;
use crate::application::queries::{ListVoices, ParseVoiceSpec};
use crate::domain::voice::{VoiceBlendSpec, VoiceId};

// ============================================================================
// Response DTOs
// ============================================================================

/// 音色描述解析响应
#[derive(Debug, Clone, Serialize)]
pub struct ParsedVoiceSpecResponse {
    pub spec: VoiceBlendSpec,
    /// 归一化后的描述文本
    pub normalized: String,
    pub single_voice: bool,
}

/// 当前可用音色集合
///
/// 每次请求都重新从引擎读取，不做缓存
pub(crate) fn available_voice_set(catalog: &dyn VoiceCatalogPort) -> HashSet<VoiceId> {
    catalog.list_voices().into_iter().collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// ListVoices Handler
pub struct ListVoicesHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl ListVoicesHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, _query: ListVoices) -> Result<Vec<VoiceId>, ApplicationError> {
        Ok(self.catalog.list_voices())
    }
}

/// ParseVoiceSpec Handler
pub struct ParseVoiceSpecHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl ParseVoiceSpecHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, query: ParseVoiceSpec) -> Result<ParsedVoiceSpecResponse, ApplicationError> {
        let available = available_voice_set(self.catalog.as_ref());
        let spec = VoiceBlendSpec::parse(&query.spec, &available)?;

        Ok(ParsedVoiceSpecResponse {
            normalized: spec.to_string(),
            single_voice: spec.is_single_voice(),
            spec,
        })
    }
}
