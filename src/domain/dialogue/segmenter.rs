//! 对话分段
//!
//! 组合说话人识别与音色分配，得到按原文顺序排列的 (说话人, 文本, 音色) 片段

use super::{
    assign_voices, detect_speakers, DialogueError, DialogueOccurrence, DialogueSegment,
    SpeakerLabel, SpeakerVoiceMap,
};
use crate::domain::voice::VoiceId;

/// 默认旁白标签
pub const NARRATOR_LABEL: &str = "narrator";

/// 分段配置
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// 未识别出任何说话人时整段文本使用的标签
    pub narrator_label: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            narrator_label: NARRATOR_LABEL.to_string(),
        }
    }
}

/// 对文本进行对话分段
///
/// - 识别不到说话人：返回一个覆盖全文的旁白片段，使用第一个音色
/// - 否则按首次出现顺序分配音色，片段顺序与原文一致（不按说话人分组）
pub fn segment_dialogue(
    text: &str,
    voices: &[VoiceId],
    config: &DialogueConfig,
) -> Result<Vec<DialogueSegment>, DialogueError> {
    let occurrences = detect_speakers(text);

    if occurrences.is_empty() {
        let voice = voices
            .first()
            .cloned()
            .ok_or(DialogueError::NoVoicesAvailable { speakers: 1 })?;

        tracing::debug!(
            narrator = %config.narrator_label,
            voice = %voice,
            "No speakers detected, using narrator voice"
        );

        return Ok(vec![DialogueSegment {
            speaker: SpeakerLabel::new(&config.narrator_label),
            text: text.to_string(),
            voice,
        }]);
    }

    let speakers: Vec<SpeakerLabel> = occurrences.iter().map(|o| o.speaker.clone()).collect();
    let voice_map = assign_voices(&speakers, voices)?;
    let segments = attach_voices(occurrences, &voice_map)?;

    tracing::debug!(
        segments = segments.len(),
        speakers = voice_map.len(),
        "Dialogue segmented"
    );

    Ok(segments)
}

/// 按原文顺序为每次出现配上音色，任何一次出现都不能被丢弃
fn attach_voices(
    occurrences: Vec<DialogueOccurrence>,
    voice_map: &SpeakerVoiceMap,
) -> Result<Vec<DialogueSegment>, DialogueError> {
    occurrences
        .into_iter()
        .map(|occurrence| {
            let voice = voice_map
                .get(occurrence.speaker.as_str())
                .cloned()
                .ok_or_else(|| {
                    tracing::error!(
                        speaker = %occurrence.speaker,
                        line = occurrence.line,
                        "Speaker has no assigned voice"
                    );
                    DialogueError::UnassignedSpeaker(occurrence.speaker.to_string())
                })?;
            Ok(DialogueSegment {
                speaker: occurrence.speaker,
                text: occurrence.utterance,
                voice,
            })
        })
        .collect()
}

/// 使用默认配置分段（便捷方法）
pub fn segment_dialogue_default(
    text: &str,
    voices: &[VoiceId],
) -> Result<Vec<DialogueSegment>, DialogueError> {
    segment_dialogue(text, voices, &DialogueConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<VoiceId> {
        vec!["af_sarah".into(), "am_adam".into()]
    }

    #[test]
    fn test_segments_follow_text_order() {
        let text = "Alice: Hi Bob.\nBob: Hello Alice!\nAlice: How are you?\nCarol: Hey all.";
        let segments = segment_dialogue_default(text, &voices()).unwrap();

        let summary: Vec<(&str, &str, &str)> = segments
            .iter()
            .map(|s| (s.speaker.as_str(), s.text.as_str(), s.voice.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Alice", "Hi Bob.", "af_sarah"),
                ("Bob", "Hello Alice!", "am_adam"),
                ("Alice", "How are you?", "af_sarah"),
                ("Carol", "Hey all.", "af_sarah"),
            ]
        );
    }

    #[test]
    fn test_no_speakers_falls_back_to_narrator() {
        let text = "Once upon a time.\nThe end.";
        let segments = segment_dialogue_default(text, &voices()).unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].speaker.as_str(), NARRATOR_LABEL);
        assert_eq!(segments[0].text, text);
        assert_eq!(segments[0].voice.as_str(), "af_sarah");
    }

    #[test]
    fn test_custom_narrator_label() {
        let config = DialogueConfig {
            narrator_label: "Storyteller".to_string(),
        };
        let segments = segment_dialogue("plain text", &voices(), &config).unwrap();
        assert_eq!(segments[0].speaker.as_str(), "Storyteller");
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert_eq!(
            segment_dialogue_default("plain text", &[]).unwrap_err(),
            DialogueError::NoVoicesAvailable { speakers: 1 }
        );
        assert_eq!(
            segment_dialogue_default("Alice: hi\nBob: yo", &[]).unwrap_err(),
            DialogueError::NoVoicesAvailable { speakers: 2 }
        );
    }

    #[test]
    fn test_unassigned_speaker_is_error() {
        let occurrences = vec![
            DialogueOccurrence {
                speaker: "Alice".into(),
                utterance: "Hi.".to_string(),
                position: 0,
                line: 1,
            },
            DialogueOccurrence {
                speaker: "Bob".into(),
                utterance: "Hey.".to_string(),
                position: 1,
                line: 2,
            },
        ];
        let partial = SpeakerVoiceMap::from_ordered([("Alice".into(), "af_sarah".into())]);

        let err = attach_voices(occurrences, &partial).unwrap_err();
        assert_eq!(err, DialogueError::UnassignedSpeaker("Bob".to_string()));
        assert!(err.is_internal());
    }

    #[test]
    fn test_segmenting_is_idempotent() {
        let text = "Alice: One.\n\"Two,\" - Bob\nCarol said: Three.";
        let first = serde_json::to_string(&segment_dialogue_default(text, &voices()).unwrap()).unwrap();
        let second = serde_json::to_string(&segment_dialogue_default(text, &voices()).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
