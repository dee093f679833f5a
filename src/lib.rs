pub mod app;
pub mod cli;
pub mod collection;
pub mod config;
pub mod env_manager;
pub mod error;
pub mod event;
pub mod fetch;
pub mod parser;

// Re-export commonly used types
pub use collection::EventCollection;
pub use config::Config;
pub use error::{EventError, EventResult};
pub use event::{EventRecord, SerializedEvent};
pub use parser::{ParsePipeline, TableExtractor, TableLayout};
