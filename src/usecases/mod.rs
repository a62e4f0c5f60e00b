//! Use Cases Layer - Application Workflows
//!
//! Orchestrates the metrics registry with port interfaces to drive
//! the service's background traffic.
//!
//! Use cases:
//! - `RandomSampler`: Busy loop feeding the histogram
//! - `SelfPoller`: Periodic GET against the service's own root
//! - `TaskSupervisor`: Spawns both loops and fans out shutdown

pub mod random_sampler;
pub mod self_poller;
pub mod task_supervisor;

pub use random_sampler::RandomSampler;
pub use self_poller::{PollOutcome, PollStats, SelfPoller};
pub use task_supervisor::{BackgroundTasks, TaskSupervisor};
