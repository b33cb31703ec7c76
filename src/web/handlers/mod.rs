// src/web/handlers/mod.rs
pub mod language_handlers;
pub mod system_handlers;
pub mod translation_handlers;

pub use language_handlers::*;
pub use system_handlers::*;
pub use translation_handlers::*;
