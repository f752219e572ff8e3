//! Voice Command Handlers

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::application::commands::ResolveVoice;
use crate::application::error::ApplicationError;
use crate::application::ports::{VoiceCatalogPort, VoiceInput};
use crate::domain::voice::{blend_embeddings, VoiceBlendSpec, VoiceId};

/// 解析结果：归一化后的描述与传给引擎的音色
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedVoice {
    pub spec: VoiceBlendSpec,
    pub voice: VoiceInput,
}

/// 解析并混合音色描述
///
/// 可用音色每次都从引擎重新读取；单音色直接传 ID，混合描述传混合后的向量
pub(crate) fn resolve_voice<C>(catalog: &C, spec: &str) -> Result<ResolvedVoice, ApplicationError>
where
    C: VoiceCatalogPort + ?Sized,
{
    let available: HashSet<VoiceId> = catalog.list_voices().into_iter().collect();
    let spec = VoiceBlendSpec::parse(spec, &available)?;

    let voice = match spec.single_voice() {
        Some(id) => VoiceInput::Id(id.clone()),
        None => VoiceInput::Embedding(blend_embeddings(&spec, |id| catalog.embedding(id))?),
    };

    tracing::debug!(spec = %spec, single = spec.is_single_voice(), "Voice resolved");

    Ok(ResolvedVoice { spec, voice })
}

/// ResolveVoice Handler
pub struct ResolveVoiceHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl ResolveVoiceHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, command: ResolveVoice) -> Result<ResolvedVoice, ApplicationError> {
        resolve_voice(self.catalog.as_ref(), &command.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::VoiceEmbedding;
    use crate::infrastructure::adapters::{InMemoryVoiceEngine, InMemoryVoiceEngineConfig};

    fn engine() -> Arc<InMemoryVoiceEngine> {
        Arc::new(InMemoryVoiceEngine::new(
            InMemoryVoiceEngineConfig::default(),
            vec![
                ("af_sarah".into(), VoiceEmbedding::new(vec![1.0, 0.0])),
                ("am_adam".into(), VoiceEmbedding::new(vec![0.0, 1.0])),
                ("broken".into(), VoiceEmbedding::new(vec![1.0])),
            ],
        ))
    }

    #[test]
    fn test_single_voice_passes_id() {
        let resolved = ResolveVoiceHandler::new(engine())
            .handle(ResolveVoice {
                spec: " af_sarah ".to_string(),
            })
            .unwrap();
        assert_eq!(resolved.voice, VoiceInput::Id("af_sarah".into()));
    }

    #[test]
    fn test_blend_passes_embedding() {
        let resolved = ResolveVoiceHandler::new(engine())
            .handle(ResolveVoice {
                spec: "af_sarah:75,am_adam:25".to_string(),
            })
            .unwrap();
        match resolved.voice {
            VoiceInput::Embedding(e) => {
                assert!((e.as_slice()[0] - 0.75).abs() < 1e-6);
                assert!((e.as_slice()[1] - 0.25).abs() < 1e-6);
            }
            other => panic!("expected embedding, got {other:?}"),
        }
    }

    #[test]
    fn test_dimension_mismatch_is_internal() {
        let err = ResolveVoiceHandler::new(engine())
            .handle(ResolveVoice {
                spec: "af_sarah,broken".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InternalError(_)));
    }

    #[test]
    fn test_malformed_spec_is_validation() {
        let err = ResolveVoiceHandler::new(engine())
            .handle(ResolveVoice {
                spec: "af_sarah:abc".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
