//! Port trait definitions (Hexagonal Architecture)
//!
//! The engine is pure apart from two inputs it cannot compute itself:
//! - Clock: the current instant all recency metrics are measured against
//! - StallHorizon: the bounded draw used for some stall estimates
//!
//! Both are injected so assessments are reproducible in tests.

pub mod clock;
pub mod stall_horizon;

pub use clock::{Clock, FixedClock, SystemClock};
pub use stall_horizon::{FixedHorizon, RandomHorizon, StallHorizon};
