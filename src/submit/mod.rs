//! The submit workflow
//!
//! Two-phase pattern:
//! 1. Decide - map the reconciled PR status + local facts to a single
//!    action (pure, testable)
//! 2. Apply - perform that action via the hosting service (effectful)

mod decide;
mod execute;

pub use decide::{AbortReason, SubmitAction, decide};
pub use execute::{AUTO_MERGE_COMMENT, SubmitOutcome, apply_submit_action};
