/// Health-check engine.
///
/// This module is responsible for:
/// - Validating response bodies against declared contracts
/// - Executing HTTP probes and classifying their outcomes
/// - Scheduling concurrent check cycles over all registered endpoints
/// - Deriving rolling status and uptime from recent results
pub mod contract;
pub mod prober;
pub mod scheduler;
pub mod stats;
pub mod types;

pub use prober::EndpointProber;
pub use scheduler::CheckScheduler;
pub use types::{CheckOutcome, CheckResult};
