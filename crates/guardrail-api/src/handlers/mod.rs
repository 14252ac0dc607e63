//! HTTP request handlers

pub mod appeal;
pub mod detection;
pub mod dify;
pub mod direct_model;
pub mod gateway;
pub mod health;
pub mod proxy;
pub mod scan;

pub use appeal::{show as appeal_show, submit as appeal_submit};
pub use detection::guardrails;
pub use dify::moderation as dify_moderation;
pub use direct_model::chat_completions as direct_model_chat_completions;
pub use gateway::{process_input, process_output};
pub use health::{health, live, ready, version};
pub use proxy::{chat_completions, completions, list_models};
pub use scan::{scan_email, scan_webpage};
