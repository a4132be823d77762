//! Popularity ranking on top of the stacks catalog.
//!
//! Provides: exponential borrow-count decay, a bounded selection heap,
//! per-genre recommendations, and a lock-guarded shared catalog with a
//! periodic decay task.

pub mod decay;
pub mod recommend;
pub mod service;
pub mod topk;

pub use decay::{decay_all, decay_all_with, DecayPolicy, DecayReport};
pub use recommend::{recommend, recommend_with_capacity};
pub use topk::TopK;
