//! Testing utilities for the driver
//!
//! - **Recording doubles**: a link and a sleeper that remember every call
//! - **Reference script**: the exact compliant event sequence for a plan,
//!   paired with the link actions each event must trigger
//!
//! # Example
//!
//! ```ignore
//! use resilience_driver::testing::{RecordingLink, ReferenceScript};
//!
//! let plan = TestPlan::kvstore();
//! let script = ReferenceScript::for_plan(&plan);
//! let link = RecordingLink::new();
//! // ... drive with link.clone(), then:
//! assert_eq!(link.actions(), script.actions());
//! ```

mod recording;
mod reference;

pub use recording::{LinkAction, RecordingLink, RecordingSleeper};
pub use reference::{ReferenceScript, ScriptStep};
