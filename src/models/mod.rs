//! Data models for the keyboard layout, the edit buffer and the session result.
//!
//! Models are independent of rendering and of the event loop.

pub mod field;
pub mod layout;
pub mod outcome;

pub use field::{EditableField, Pending};
pub use layout::{KeyLayout, KeySlot, Page, SlotId, SLOTS_PER_PAGE, SPACE};
pub use outcome::Outcome;
