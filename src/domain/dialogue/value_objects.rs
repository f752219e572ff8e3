//! Dialogue Context - Value Objects

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;

use crate::domain::voice::VoiceId;

/// 说话人标签
///
/// 从文本中提取的名字（紧邻说话标记的大写词或短语）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerLabel(String);

impl SpeakerLabel {
    /// 创建标签，内部空白折叠为单个空格
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SpeakerLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SpeakerLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl std::fmt::Display for SpeakerLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 一次说话出现
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueOccurrence {
    pub speaker: SpeakerLabel,
    pub utterance: String,
    /// 出现序号（从 0 开始），只用于排序，不保证唯一说话人
    pub position: usize,
    /// 源文本行号（从 1 开始）
    pub line: usize,
}

/// 最终交给合成引擎的片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueSegment {
    pub speaker: SpeakerLabel,
    pub text: String,
    pub voice: VoiceId,
}

/// 说话人 -> 音色映射
///
/// 插入顺序即首次出现顺序；构建后不可修改
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerVoiceMap {
    entries: Vec<(SpeakerLabel, VoiceId)>,
    index: HashMap<SpeakerLabel, usize>,
}

impl SpeakerVoiceMap {
    /// 由有序条目构建，重复的说话人保留第一次的映射
    pub(crate) fn from_ordered(pairs: impl IntoIterator<Item = (SpeakerLabel, VoiceId)>) -> Self {
        let mut map = Self::default();
        for (speaker, voice) in pairs {
            if map.index.contains_key(&speaker) {
                continue;
            }
            map.index.insert(speaker.clone(), map.entries.len());
            map.entries.push((speaker, voice));
        }
        map
    }

    pub fn get(&self, speaker: &str) -> Option<&VoiceId> {
        self.index.get(speaker).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpeakerLabel, &VoiceId)> {
        self.entries.iter().map(|(s, v)| (s, v))
    }
}

impl Serialize for SpeakerVoiceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (speaker, voice) in &self.entries {
            map.serialize_entry(speaker, voice)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_whitespace_collapsed() {
        assert_eq!(SpeakerLabel::new(" Mary \t Jane "), SpeakerLabel::from("Mary Jane"));
    }

    #[test]
    fn test_map_keeps_first_appearance_order() {
        let map = SpeakerVoiceMap::from_ordered([
            ("Bob".into(), "v1".into()),
            ("Alice".into(), "v2".into()),
            ("Bob".into(), "v3".into()),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Bob"), Some(&VoiceId::from("v1")));
        let order: Vec<&str> = map.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["Bob", "Alice"]);
    }

    #[test]
    fn test_map_serializes_in_order() {
        let map = SpeakerVoiceMap::from_ordered([
            ("Zed".into(), "v1".into()),
            ("Amy".into(), "v2".into()),
        ]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Zed":"v1","Amy":"v2"}"#);
    }
}
