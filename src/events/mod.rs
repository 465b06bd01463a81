//! # Workflow Events
//!
//! Lifecycle events and confirmation messages emitted by the workflows and
//! simulators. Event names are defined in [`crate::constants::events`].

pub mod publisher;

pub use publisher::{EventPublisher, PublishedEvent};
