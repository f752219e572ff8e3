//! 说话人音色分配
//!
//! 按说话人首次出现顺序对音色池轮询分配，超出音色数时回绕

use std::collections::HashSet;

use super::{DialogueError, SpeakerLabel, SpeakerVoiceMap};
use crate::domain::voice::VoiceId;

/// 为说话人分配音色
///
/// 确定性：相同的说话人顺序与音色池总是得到相同的映射。
/// 重复的说话人只按第一次出现计数
pub fn assign_voices(
    speakers: &[SpeakerLabel],
    voices: &[VoiceId],
) -> Result<SpeakerVoiceMap, DialogueError> {
    let mut seen: HashSet<&SpeakerLabel> = HashSet::new();
    let distinct: Vec<&SpeakerLabel> = speakers.iter().filter(|s| seen.insert(*s)).collect();

    if distinct.is_empty() {
        return Ok(SpeakerVoiceMap::default());
    }
    if voices.is_empty() {
        return Err(DialogueError::NoVoicesAvailable {
            speakers: distinct.len(),
        });
    }

    if distinct.len() > voices.len() {
        tracing::debug!(
            speakers = distinct.len(),
            voices = voices.len(),
            "More speakers than voices, assignment wraps around"
        );
    }

    Ok(SpeakerVoiceMap::from_ordered(
        distinct
            .into_iter()
            .enumerate()
            .map(|(i, speaker)| (speaker.clone(), voices[i % voices.len()].clone())),
    ))
}
