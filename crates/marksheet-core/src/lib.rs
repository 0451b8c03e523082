//! marksheet-core — Marks model, averages, and persistence session.
//!
//! This crate defines the roster data model, mark validation, average
//! computation, and the session that keeps the roster in sync with a
//! key-value store.

pub mod error;
pub mod mark;
pub mod model;
pub mod session;
pub mod statistics;
pub mod traits;

pub use error::RosterError;
pub use mark::{MarkState, MarkUpdate, Rejection};
pub use model::{Roster, Subject, Theme};
pub use session::{Session, SessionKeys};
pub use statistics::{format_average, overall_average, subject_average, RosterSummary};
pub use traits::KeyValueStore;
