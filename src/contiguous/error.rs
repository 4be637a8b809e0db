//! Error types for fallible capacity changes. See [`DynArray::try_reserve`] and
//! [`DynArray::try_with_cap`].
//!
//! [`DynArray::try_reserve`]: super::DynArray::try_reserve
//! [`DynArray::try_with_cap`]: super::DynArray::try_with_cap

use std::alloc::{self, Layout};

use derive_more::{Display, Error, From, IsVariant, TryInto};

/// The requested capacity exceeds the maximum size of a single allocation ([`isize::MAX`] bytes).
///
/// Unlike [`AllocFailure`], this variant doesn't depend on the state of the allocator: a request
/// of the same size will always fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("capacity overflow: can't allocate storage for {requested} elements")]
pub struct CapacityOverflow {
    /// The capacity, in elements, that was requested.
    pub requested: usize,
}

/// The global allocator declined an otherwise valid allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("allocation of {} bytes failed", layout.size())]
pub struct AllocFailure {
    /// The layout of the failed request, as required by [`alloc::handle_alloc_error`].
    pub layout: Layout,
}

/// The error type returned when a fallible capacity change can't be carried out. The container is
/// left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
pub enum TryReserveError {
    /// See [`CapacityOverflow`].
    CapacityOverflow(CapacityOverflow),
    /// See [`AllocFailure`].
    AllocFailure(AllocFailure),
}

impl TryReserveError {
    /// Escalates the error for the infallible methods: capacity overflow becomes a panic, while
    /// allocation failure is reported via [`alloc::handle_alloc_error`] as recommended, to avoid
    /// new allocations rather than panicking.
    pub(crate) fn escalate(self) -> ! {
        match self {
            Self::CapacityOverflow(_) => panic!("Capacity overflow!"),
            Self::AllocFailure(AllocFailure { layout }) => alloc::handle_alloc_error(layout),
        }
    }
}
