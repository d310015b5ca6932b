//! Stage/time lineup planner for a multi-stage festival.
//!
//! The [`lineup`] module holds the data model and the slot assignment rule,
//! [`session`] applies user actions and keeps the [`store`] in step, and the
//! outer modules render, import/export and serve the lineup.

pub mod catalog;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod lineup;
pub mod parser;
pub mod session;
pub mod store;
pub mod web;

pub use catalog::Catalog;
pub use error::{LineupError, StoreError};
pub use lineup::{Lineup, Performer, PerformerId, Slot};
pub use session::{Action, Outcome, Session, ViewMode};
