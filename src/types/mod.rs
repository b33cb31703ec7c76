// src/types/mod.rs
pub mod user;

pub use user::{LanguageUpdate, UserProfile, UserRole};
