//! Engine Adapter - 合成引擎实现

mod in_memory_engine;

pub use in_memory_engine::{InMemoryVoiceEngine, InMemoryVoiceEngineConfig, DEFAULT_EMBEDDING_DIM};
