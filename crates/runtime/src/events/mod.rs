//! Topic-based event bus for battle notifications.
//!
//! The scheduler notifies observers synchronously; [`BusObserver`] forwards
//! those notifications onto broadcast channels so consumers can subscribe
//! only to the topics they need.

mod bus;
mod observer;

pub use bus::{Event, EventBus, Topic};
pub use observer::{BusObserver, TickClock};
