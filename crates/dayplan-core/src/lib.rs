//! Daily plan resolution engine.
//!
//! Given the saved biometrics, workout, nutrition, supplement and planner
//! documents, [`daily_plan`] works out what applies to a single calendar
//! date. Resolution is a pure function of its inputs: nothing is read from
//! disk here and no error escapes for bad data, each section degrading to
//! `None` plus a message instead.

pub mod biometrics;
pub mod calendar;
pub mod document;
pub mod json;
pub mod lookup;
pub mod nutrition;
pub mod plan;
pub mod planner;
pub mod section;
pub mod supplements;
pub mod workout;

pub use document::{DocumentError, DocumentKind, DocumentLoader, DocumentSet};
pub use plan::{DailyPlan, Messages, daily_plan, daily_plan_from};
