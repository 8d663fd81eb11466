//! # Services

pub mod confirmation;
pub mod orchestrator;

pub use confirmation::ConfirmationOutcome;
pub use orchestrator::{LifecycleDependencies, LifecycleOrchestrator, RecoveryReport};
