//! Dialogue Queries

/// 对话分段查询
#[derive(Debug, Clone)]
pub struct SegmentDialogue {
    pub text: String,
    /// 音色池（每项可以是混合描述），为 None 时使用默认音色池
    pub voice_pool: Option<Vec<String>>,
}
