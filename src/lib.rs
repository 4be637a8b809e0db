//! A growable, contiguous array container with explicit capacity control.
//!
//! # Purpose
//! This crate provides [`DynArray`](contiguous::DynArray), a variable size contiguous collection
//! built directly on raw allocations rather than on [`Vec`]. Unlike [`Vec`], its capacity is
//! always exactly the value produced by its documented policies, so callers can reason about (and
//! tests can assert on) the backing storage at every step.
//!
//! # Capacity Policy
//! Appending to a full container grows it by a factor of 1.25 rather than the classic doubling,
//! trading more reallocations over a container's lifetime for less peak memory overhead. Removal
//! is unordered ([`swap_remove`](contiguous::DynArray::swap_remove)): the last element fills the
//! vacated slot, which keeps removal `O(1)` at the cost of element order. A removal that leaves
//! the container sufficiently over-provisioned shrinks the buffer back down to a tight fit.
//!
//! # Error Handling
//! Misuse of the API (out-of-bounds indices) is a programming error and panics immediately,
//! rather than returning a sentinel or an `Option`. Allocation failure is the one recoverable
//! condition: the `try_` variants of the allocating methods report it as a strongly typed
//! [`TryReserveError`](contiguous::TryReserveError) and leave the container untouched. The
//! infallible methods map the same condition to a panic or [`std::alloc::handle_alloc_error`].
//!
//! # Dependencies
//! The container itself only needs the global allocator. The crate also depends on some derive
//! macros for its error types because they remove the need for some very repetitive programming.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod contiguous;

#[cfg(test)]
pub(crate) mod util;
