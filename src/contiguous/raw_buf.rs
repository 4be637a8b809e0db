//! The raw backing storage for [`DynArray`](super::DynArray): a single contiguous allocation of
//! uninitialized slots. This type only manages the allocation itself; tracking which slots are
//! initialized (and dropping their contents) is entirely the container's responsibility.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use super::error::{AllocFailure, CapacityOverflow, TryReserveError};

/// An owned allocation of `cap` slots of `MaybeUninit<T>`.
///
/// The pointer is dangling when `cap == 0` or `T` is zero-sized; in both cases no allocation is
/// held. Dropping a `RawBuf` releases the allocation without dropping any elements.
pub(crate) struct RawBuf<T> {
    pub(crate) ptr: NonNull<MaybeUninit<T>>,
    cap: usize,
    _phantom: PhantomData<T>,
}

impl<T> RawBuf<T> {
    /// Creates a buffer with capacity 0 and no allocation.
    pub(crate) const fn new() -> RawBuf<T> {
        RawBuf {
            ptr: NonNull::dangling(),
            cap: 0,
            _phantom: PhantomData,
        }
    }

    /// The number of element slots in the buffer.
    pub(crate) const fn cap(&self) -> usize {
        self.cap
    }

    /// Creates a buffer with exactly `cap` uninitialized slots.
    pub(crate) fn try_with_cap(cap: usize) -> Result<RawBuf<T>, TryReserveError> {
        let mut buf = RawBuf::new();
        buf.try_realloc(cap)?;
        Ok(buf)
    }

    /// Infallible form of [`RawBuf::try_realloc`].
    ///
    /// # Panics
    /// Panics if the new memory layout size would exceed [`isize::MAX`].
    pub(crate) fn realloc(&mut self, new_cap: usize) {
        if let Err(err) = self.try_realloc(new_cap) {
            err.escalate()
        }
    }

    /// Reallocates the buffer to hold exactly `new_cap` slots, with any slots beyond the old
    /// capacity uninitialized. Slots up to `min(cap, new_cap)` keep their contents: a grow or
    /// shrink relocates them bitwise, which is a move in Rust's semantics.
    ///
    /// On failure the buffer is left exactly as it was, still owning its old allocation.
    pub(crate) fn try_realloc(&mut self, new_cap: usize) -> Result<(), TryReserveError> {
        let new_ptr = match (self.cap, new_cap) {
            (_, _) if size_of::<T>() == 0 => {
                // Zero-sized types never allocate. The capacity is still tracked numerically
                // below so that the container's is_full accounting works.
                self.ptr
            },
            (old, new) if old == new => {
                return Ok(());
            },
            (0, _) => {
                let layout = Self::layout_for(new_cap)?;

                // SAFETY: The layout has non-zero size, because both zero-sized types and a zero
                // capacity are handled in earlier arms.
                let raw_ptr: *mut MaybeUninit<T> = unsafe { alloc::alloc(layout).cast() };

                NonNull::new(raw_ptr).ok_or(AllocFailure { layout })?
            },
            (_, 0) => {
                let layout = Self::layout_for(self.cap)?;

                // SAFETY: cap > 0 and T is not zero-sized, so the pointer refers to a live
                // allocation made in the global allocator with this exact layout.
                unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }

                NonNull::dangling()
            },
            (_, _) => {
                let old_layout = Self::layout_for(self.cap)?;
                let new_layout = Self::layout_for(new_cap)?;

                // SAFETY: The pointer was allocated in the global allocator with old_layout, and
                // the new size is non-zero and validated to fit isize::MAX.
                let raw_ptr: *mut MaybeUninit<T> = unsafe {
                    alloc::realloc(
                        self.ptr.as_ptr().cast(),
                        old_layout,
                        new_layout.size()
                    ).cast()
                };

                NonNull::new(raw_ptr).ok_or(AllocFailure { layout: new_layout })?
            },
        };

        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// A helper function to create a [`Layout`] for `cap` slots of `MaybeUninit<T>`, rejecting
    /// layouts whose size would exceed [`isize::MAX`].
    fn layout_for(cap: usize) -> Result<Layout, CapacityOverflow> {
        Layout::array::<MaybeUninit<T>>(cap).map_err(|_| CapacityOverflow { requested: cap })
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.cap != 0 && size_of::<T>() != 0 {
            // The layout was already validated when the allocation was made.
            let layout = Self::layout_for(self.cap).expect("Capacity overflow!");

            // SAFETY: ptr was allocated in the global allocator with this exact layout. Dangling
            // pointers (zero capacity, zero-sized types) are guarded against above.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }

        // The slots are MaybeUninit and are never dropped here. Any initialized contents must be
        // dropped by the owner before the buffer itself.
    }
}
