//! Severity tiering of threat scores.

mod policy;

pub use policy::{Action, Assessment, Severity, SeverityPolicy};
