//! Detection pipeline: the scanner engine (§4.1), disposition resolver
//! (§4.2), sliding-window splitter, and GenAI scanner wire protocol.

pub mod disposition;
pub mod engine;
pub mod genai;
pub mod kinds;
pub mod window;

// Re-exports
pub use disposition::{
    BlacklistEntry, DataLeakagePolicy, Disposition, DispositionResolver, GatewayPolicy,
    KnowledgeBaseProvider, TemplateProvider, WhitelistEntry,
};
pub use engine::ScannerEngine;
pub use genai::{GenaiClient, GenaiMatch};
pub use window::split_into_windows;
