//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache instance.
//!
//! # Tasks
//! - Reclaimer: drains expired cache entries at a fixed interval

mod reclaimer;

pub use reclaimer::{spawn_reclaimer, ReclaimerHandle};
