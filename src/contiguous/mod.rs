//! Contiguous collection types. Namely [`DynArray`], a growable contiguous collection with an
//! exactly controlled capacity, and the error types produced by its fallible allocation methods.
#![warn(missing_docs)]

pub mod dyn_array;
pub mod error;

pub(crate) mod raw_buf;

#[doc(inline)]
pub use dyn_array::DynArray;
#[doc(inline)]
pub use error::{AllocFailure, CapacityOverflow, TryReserveError};
