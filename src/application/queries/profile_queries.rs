//! Profile Queries

/// 列出情绪查询
#[derive(Debug, Clone)]
pub struct ListEmotions;

/// 列出音效查询
#[derive(Debug, Clone)]
pub struct ListEffects;

/// 列出预设查询
#[derive(Debug, Clone)]
pub struct ListPresets;
