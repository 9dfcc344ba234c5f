//! Data structures for unit stats and board layouts.
//!
//! Everything here is plain data designed to be deserialized from RON
//! files. Turning it into [`Board`](crate::board::Board) and
//! [`Player`](crate::roster::Player) values happens once, before a battle
//! starts; the resolver never looks at it.

mod composition;
pub mod compositions;
mod unit_data;

pub use composition::{Composition, Placement, RosterData};
pub use unit_data::{UnitCatalog, UnitData};
