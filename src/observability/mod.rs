//! Observability - Typed events and the structured logger

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
