//! Dialogue Context - 对话限界上下文
//!
//! 职责:
//! - 从自由文本中识别说话人
//! - 说话人到音色的确定性分配
//! - 生成按原文顺序排列的对话片段

mod errors;
mod segmenter;
mod speaker_detector;
mod value_objects;
mod voice_assigner;

pub use errors::DialogueError;
pub use segmenter::{segment_dialogue, segment_dialogue_default, DialogueConfig, NARRATOR_LABEL};
pub use speaker_detector::{detect_speakers, AttributionRule, RuleMatch};
pub use value_objects::{DialogueOccurrence, DialogueSegment, SpeakerLabel, SpeakerVoiceMap};
pub use voice_assigner::assign_voices;
