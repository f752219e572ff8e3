//! Voice Commands

/// 解析音色描述并生成合成所用的音色
#[derive(Debug, Clone)]
pub struct ResolveVoice {
    /// 单音色 ID 或混合描述，如 "af_sarah:60,am_adam:40"
    pub spec: String,
}
