//! # Event Bus Module
//!
//! Publish/subscribe notifications for engine state changes.
//!
//! ## Overview
//!
//! - The engine publishes typed events after each operation completes
//! - Subscribers filter and receive events of interest
//! - Supports both sync handlers and async broadcast receivers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tacmap_core::event_bus::{EngineEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Shape]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//!
//! // Unsubscribe when done
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
