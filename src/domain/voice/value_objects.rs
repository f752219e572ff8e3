//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// 音色标识
///
/// 对本层不透明，只由合成引擎解释；有效性通过调用方提供的可用音色集合校验
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VoiceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VoiceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VoiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色风格向量
///
/// 由合成引擎按音色提供的定长向量，本层只做逐元素加权求和
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceEmbedding(Vec<f32>);

impl VoiceEmbedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for VoiceEmbedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_voice_id_lookup_by_str() {
        let voices: HashSet<VoiceId> = ["af_sarah", "am_adam"].into_iter().map(VoiceId::from).collect();
        assert!(voices.contains("af_sarah"));
        assert!(!voices.contains("bf_emma"));
    }

    #[test]
    fn test_embedding_dim() {
        let embedding = VoiceEmbedding::new(vec![0.1, 0.2, 0.3]);
        assert_eq!(embedding.dim(), 3);
        assert_eq!(embedding.as_slice()[1], 0.2);
    }
}
