//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod dialogue_handlers;
mod profile_handlers;
mod voice_handlers;

pub use dialogue_handlers::*;
pub use profile_handlers::*;
pub use voice_handlers::*;
