pub mod assignments;
pub mod state;
pub mod types;
pub mod views;

pub use assignments::{Assignments, SlotEntry};
pub use state::Lineup;
pub use types::{Performer, PerformerId, Slot};
pub use views::{CellView, GridRow, GridView, ListView, PerformerView};
