//! Helpers shared between the unit tests of the collection modules.

pub mod alloc;
pub mod panic;
