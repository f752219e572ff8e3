//! Voice Queries

/// 列出可用音色查询
#[derive(Debug, Clone)]
pub struct ListVoices;

/// 解析音色描述查询（只解析与归一化，不混合向量）
#[derive(Debug, Clone)]
pub struct ParseVoiceSpec {
    pub spec: String,
}
