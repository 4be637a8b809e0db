//! A module containing [`DynArray`] and associated types.
//!
//! Currently, the only other included type is [`IntoIter`] for owned iteration over a DynArray.
//! [`Iter`](std::slice::Iter) and [`IterMut`](std::slice::IterMut) from [`std::slice`] are used
//! for borrowed iteration, via `Deref<Target = [T]>`.
//!
//! [`DynArray`] is also re-exported under the parent module.

mod dyn_array;
mod iter;

pub use dyn_array::*;
pub use iter::*;
