//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) the background loops require from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `PollTarget`: HTTP endpoint the self-poller fetches
//! - `SampleSink`: Destination for random sampler observations

pub mod poll_target;
pub mod sample_sink;

pub use poll_target::PollTarget;
pub use sample_sink::SampleSink;
