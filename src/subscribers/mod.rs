//! Subscriber registry for real-time fan-out
//!
//! ## Delivery model
//! - One bounded queue per connection, drained by that connection's task
//! - `broadcast` only enqueues; it never waits on the network
//! - A closed connection or a full queue evicts the subscriber
//! - No retries: an evicted client reconnects to resume

mod registry;
mod subscriber;

pub use registry::{BroadcastReport, SubscriberRegistry};
pub use subscriber::{DeliveryFailure, Payload, Subscriber, SubscriberId, SubscriberStream};
