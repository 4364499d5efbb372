//! State module for tracking one collection run
//!
//! Everything here lives for exactly one run: it is created empty when the
//! run starts and dropped when the run returns. Nothing is persisted and
//! nothing is shared between runs.
//!
//! # Components
//!
//! - `RateLimitState`: last access time per domain
//! - `PageBudget`: pages fetched per domain against the configured maximum
//! - `RunPhase`: where the collector is in its per-URL state machine

mod budget;
mod rate_limit;
mod run_phase;

pub use budget::PageBudget;
pub use rate_limit::RateLimitState;
pub use run_phase::RunPhase;
