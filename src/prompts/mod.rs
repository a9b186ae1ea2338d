//! Prompt text and response schemas sent to the generation service.

pub mod discover;
pub mod draft;
