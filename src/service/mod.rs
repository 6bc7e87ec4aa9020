//! Service layer between the transport handlers and the core

mod events;

pub use events::{EventService, Ingested};
