//! Profile Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::queries::{ListEffects, ListEmotions, ListPresets};
use crate::domain::profile::{AudioEffect, EmotionProfile, ProfileRegistry, VoicePreset};

/// 带名称的注册表条目
#[derive(Debug, Clone, Serialize)]
pub struct NamedEntry<T> {
    pub name: String,
    #[serde(flatten)]
    pub value: T,
}

fn collect<'a, T: Clone + 'a>(
    entries: impl Iterator<Item = (&'a str, &'a T)>,
) -> Vec<NamedEntry<T>> {
    entries
        .map(|(name, value)| NamedEntry {
            name: name.to_string(),
            value: value.clone(),
        })
        .collect()
}

/// ListEmotions Handler
pub struct ListEmotionsHandler {
    registry: Arc<ProfileRegistry>,
}

impl ListEmotionsHandler {
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, _query: ListEmotions) -> Result<Vec<NamedEntry<EmotionProfile>>, ApplicationError> {
        Ok(collect(self.registry.emotions()))
    }
}

/// ListEffects Handler
pub struct ListEffectsHandler {
    registry: Arc<ProfileRegistry>,
}

impl ListEffectsHandler {
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, _query: ListEffects) -> Result<Vec<NamedEntry<AudioEffect>>, ApplicationError> {
        Ok(collect(self.registry.effects()))
    }
}

/// ListPresets Handler
pub struct ListPresetsHandler {
    registry: Arc<ProfileRegistry>,
}

impl ListPresetsHandler {
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, _query: ListPresets) -> Result<Vec<NamedEntry<VoicePreset>>, ApplicationError> {
        Ok(collect(self.registry.presets()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_builtin_emotions_sorted() {
        let handler = ListEmotionsHandler::new(Arc::new(ProfileRegistry::with_builtins()));
        let emotions = handler.handle(ListEmotions).unwrap();
        let names: Vec<&str> = emotions.iter().map(|e| e.name.as_str()).collect();

        assert!(names.contains(&"neutral"));
        assert!(names.contains(&"whisper"));
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_effect_entry_serializes_flat() {
        let handler = ListEffectsHandler::new(Arc::new(ProfileRegistry::with_builtins()));
        let effects = handler.handle(ListEffects).unwrap();
        let none = effects.iter().find(|e| e.name == "none").unwrap();

        let json = serde_json::to_value(none).unwrap();
        assert_eq!(json["name"], "none");
        assert_eq!(json["kind"], "none");
    }

    #[test]
    fn test_list_presets() {
        let registry = ProfileRegistry::with_builtins()
            .register_preset("storyteller", VoicePreset::new("af_sarah:60,am_adam:40"))
            .unwrap();
        let presets = ListPresetsHandler::new(Arc::new(registry))
            .handle(ListPresets)
            .unwrap();

        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].name, "storyteller");
        assert_eq!(presets[0].value.voice, "af_sarah:60,am_adam:40");
    }
}
