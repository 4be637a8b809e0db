use std::borrow::{Borrow, BorrowMut};
use std::cmp;
use std::fmt::{self, Debug, Display, Formatter};
use std::mem::{self, MaybeUninit};
use std::ops::{Deref, DerefMut};
use std::slice;

use crate::contiguous::error::{CapacityOverflow, TryReserveError};
use crate::contiguous::raw_buf::RawBuf;

const MIN_CAP: usize = 2;
const MAX_CAP: usize = isize::MAX as usize;

/// Growth and shrink happen in steps of a quarter of the current value, i.e. a resize factor of
/// 1.25. Gentler than the classic doubling: more reallocations over a container's lifetime, less
/// peak memory overhead.
const RESIZE_STEP: usize = 4;

/// A container smaller than this never shrinks. Without a floor, tiny containers would shrink on
/// nearly every removal (a container of one element is over-provisioned at capacity 2), churning
/// through reallocations that save almost nothing.
const SHRINK_FLOOR: usize = 8;

/// A variable size contiguous collection with an exactly controlled capacity.
///
/// The capacity is guaranteed to be exactly the value produced by the documented policies: it
/// starts at the value given to [`with_cap`](DynArray::with_cap) (or 0 for
/// [`new`](DynArray::new)), grows by a factor of 1.25 when a [`push`](DynArray::push) finds the
/// container full, and shrinks to a tight fit when a [`swap_remove`](DynArray::swap_remove)
/// leaves it sufficiently over-provisioned.
///
/// Removal is unordered: [`swap_remove`](DynArray::swap_remove) fills the vacated slot with the
/// last element instead of shifting, so it runs in `O(1)` but the relative order of the remaining
/// elements is not preserved.
///
/// Indexing, slicing, borrowed iteration and [`swap`](slice::swap) are all provided through
/// `Deref<Target = [T]>`.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the DynArray.
///
/// | Method | Complexity |
/// |-|-|
/// | `get` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `push_unchecked` | `O(1)` |
/// | `pop` | `O(1)` |
/// | `replace` | `O(1)` |
/// | `swap` | `O(1)` |
/// | `swap_remove` | `O(1)`**, `O(n)` |
/// | `clear` | `O(n)` |
/// | `reserve` | `O(n)` |
/// | `shrink_to_fit` | `O(n)` |
///
/// \* `O(n)` when the push triggers growth.
///
/// \** `O(n)` when the removal triggers a shrink.
pub struct DynArray<T> {
    pub(crate) buf: RawBuf<T>,
    pub(crate) len: usize,
}

impl<T> DynArray<T> {
    /// Returns the number of live elements in the DynArray.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let vec = DynArray::from([1_u8, 2, 3]);
    /// assert_eq!(vec.len(), 3);
    /// ```
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the current capacity of the DynArray. Unlike [`Vec`], the capacity is guaranteed
    /// to be exactly the value produced by the documented growth, shrink and reservation
    /// policies.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let vec: DynArray<u8> = DynArray::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub const fn cap(&self) -> usize {
        self.buf.cap()
    }

    /// Returns true if the DynArray contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec: DynArray<u8> = DynArray::new();
    /// assert!(vec.is_empty());
    /// vec.push(1);
    /// assert!(!vec.is_empty())
    /// ```
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the DynArray has no spare capacity, meaning the next
    /// [`push`](DynArray::push) will reallocate.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec: DynArray<u8> = DynArray::with_cap(2);
    /// vec.push(1);
    /// assert!(!vec.is_full());
    /// vec.push(2);
    /// assert!(vec.is_full());
    /// ```
    pub const fn is_full(&self) -> bool {
        self.len == self.cap()
    }

    /// Creates a new DynArray with length and capacity 0. Memory will be allocated when the
    /// capacity changes.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let vec: DynArray<u8> = DynArray::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 0);
    /// ```
    pub const fn new() -> DynArray<T> {
        DynArray {
            buf: RawBuf::new(),
            len: 0,
        }
    }

    /// Creates a new DynArray with capacity exactly equal to the provided value, allowing values
    /// to be added without reallocation. No elements are constructed.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec: DynArray<u8> = DynArray::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// vec.extend([1_u8, 2, 3, 4, 5]);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub fn with_cap(cap: usize) -> DynArray<T> {
        match Self::try_with_cap(cap) {
            Ok(vec) => vec,
            Err(err) => err.escalate(),
        }
    }

    /// Fallible form of [`with_cap`](DynArray::with_cap): reports allocation failure as an error
    /// instead of aborting.
    ///
    /// # Errors
    /// Returns a [`TryReserveError`] if the layout size would exceed [`isize::MAX`] or the
    /// allocator can't satisfy the request.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let vec = DynArray::<u8>::try_with_cap(5).expect("small allocations should succeed");
    /// assert_eq!(vec.cap(), 5);
    ///
    /// let err = DynArray::<u8>::try_with_cap(isize::MAX as usize + 1).unwrap_err();
    /// assert!(err.is_capacity_overflow());
    /// ```
    pub fn try_with_cap(cap: usize) -> Result<DynArray<T>, TryReserveError> {
        Ok(DynArray {
            buf: RawBuf::try_with_cap(cap)?,
            len: 0,
        })
    }

    /// Push the provided value onto the end of the DynArray, increasing the capacity first if the
    /// container is full.
    ///
    /// # Panics
    /// Panics if the grown memory layout size would exceed [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec = DynArray::<u8>::new();
    /// for i in 0..=5 {
    ///     vec.push(i);
    /// }
    /// assert_eq!(&*vec, &[0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn push(&mut self, value: T) {
        if self.is_full() {
            self.grow();
        }
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
    }

    /// Push the provided value onto the end of the DynArray, assuming that there is enough
    /// capacity to do so.
    ///
    /// # Safety
    /// It is up to the caller to ensure that the DynArray has enough capacity to add the provided
    /// value, using methods like [`reserve`](DynArray::reserve) or
    /// [`with_cap`](DynArray::with_cap) to do so. Using this method on a DynArray without enough
    /// capacity is undefined behavior.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let values = [1_u8, 2, 3];
    /// let mut vec = DynArray::with_cap(values.len());
    /// for i in values {
    ///     // SAFETY: We know that vec has enough capacity to store all elements of values.
    ///     unsafe { vec.push_unchecked(i); }
    /// }
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// ```
    pub unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: It is up to the caller to ensure that the DynArray has enough capacity for this
        // push, leading to the pointer write being in bounds of the allocation.
        unsafe { self.buf.ptr.add(self.len).write(MaybeUninit::new(value)); }
        self.len += 1;
    }

    /// Pops the last value off the end of the DynArray, returning an owned value if the DynArray
    /// has length greater than 0. The capacity is unchanged.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec = DynArray::from([0, 1, 2]);
    /// assert_eq!(vec.pop(), Some(2));
    /// assert_eq!(vec.pop(), Some(1));
    /// assert_eq!(vec.pop(), Some(0));
    /// assert_eq!(vec.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            // Decrement len before reading, so the slot counts as uninitialized from here on.
            self.len -= 1;

            // SAFETY: len has just been decremented and is within the capacity of the DynArray,
            // and all slots below the old len are initialized. We make a bitwise copy of the
            // value and treat the slot as uninitialized afterwards, which is as close as we can
            // get to actually moving the value off of the heap.
            let value = unsafe {
                self.buf.ptr.add(self.len).read().assume_init()
            };
            Some(value)
        }
    }

    /// Overwrites the element at the provided index with the new value, returning the old one.
    /// The length is unchanged.
    ///
    /// Note that this replaces in place. It does not shift the following elements along, so it is
    /// not an ordered insertion.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec = DynArray::from([1, 2, 3]);
    /// assert_eq!(vec.replace(1, 9), 2);
    /// assert_eq!(&*vec, &[1, 9, 3]);
    /// assert_eq!(vec.len(), 3);
    /// ```
    pub fn replace(&mut self, index: usize, new_value: T) -> T {
        self.check_index(index);

        // SAFETY: index has been checked to be less than len, so the slot holds an initialized
        // value which is dropped by the caller (or their caller) after being swapped out.
        unsafe {
            mem::replace(
                self.buf.ptr.add(index).as_mut(),
                MaybeUninit::new(new_value)
            ).assume_init()
        }
    }

    /// Removes the element at the provided index by moving the last element into its slot,
    /// returning the removed value. When the index refers to the last element, it is simply
    /// removed.
    ///
    /// This keeps removal `O(1)` but does not preserve the relative order of the remaining
    /// elements. If the removal leaves the container sufficiently over-provisioned (capacity more
    /// than 1.25 times the length, and above the small-container floor of 8 slots), the buffer is
    /// reallocated to a tight fit.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec = DynArray::from([0, 1, 2, 3, 4]);
    /// assert_eq!(vec.swap_remove(1), 1);
    /// assert_eq!(&*vec, &[0, 4, 2, 3]);
    /// ```
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.check_index(index);

        self.len -= 1;
        // SAFETY: index and the old last slot are both initialized and in bounds. The value at
        // index is moved out and the former last element takes its place, leaving the slot past
        // the new len uninitialized.
        let removed = unsafe {
            let removed = self.buf.ptr.add(index).read();
            if index != self.len {
                let last = self.buf.ptr.add(self.len).read();
                self.buf.ptr.add(index).write(last);
            }
            removed.assume_init()
        };

        if self.needs_to_shrink() {
            self.buf.realloc(self.len);
        }

        removed
    }

    /// Destroys all live elements and sets the length to 0. The capacity is deliberately
    /// unchanged, unlike [`swap_remove`](DynArray::swap_remove): clearing is a bulk operation
    /// where the capacity is likely about to be reused.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec = DynArray::from([1, 2, 3]);
    /// vec.clear();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 3);
    /// ```
    pub fn clear(&mut self) {
        for i in 0..self.len {
            // SAFETY: All slots below len hold initialized values, and each is dropped exactly
            // once because len is reset afterwards.
            unsafe { self.buf.ptr.add(i).as_mut().assume_init_drop(); }
        }

        self.len = 0;
    }

    /// Reallocates so that the capacity is exactly `len + extra`, making room for `extra` more
    /// elements without further reallocation.
    ///
    /// # Panics
    /// Panics if the new memory layout size would exceed [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec = DynArray::from([1_u8, 2, 3]);
    /// vec.reserve(5);
    /// assert_eq!(vec.cap(), 8);
    /// ```
    pub fn reserve(&mut self, extra: usize) {
        if let Err(err) = self.try_reserve(extra) {
            err.escalate()
        }
    }

    /// Fallible form of [`reserve`](DynArray::reserve): reports allocation failure as an error
    /// instead of aborting. On failure the DynArray is left exactly as it was, with its length,
    /// capacity and contents untouched.
    ///
    /// # Errors
    /// Returns a [`TryReserveError`] if the layout size would exceed [`isize::MAX`] or the
    /// allocator can't satisfy the request.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec = DynArray::from([1_u8, 2, 3]);
    /// assert!(vec.try_reserve(isize::MAX as usize).is_err());
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// assert_eq!(vec.cap(), 3);
    /// ```
    pub fn try_reserve(&mut self, extra: usize) -> Result<(), TryReserveError> {
        let new_cap = self.len.checked_add(extra)
            .ok_or(CapacityOverflow { requested: usize::MAX })?;

        self.buf.try_realloc(new_cap)
    }

    /// Reallocates so that the capacity is exactly equal to the length.
    ///
    /// # Examples
    /// ```
    /// # use dyn_array::contiguous::DynArray;
    /// let mut vec: DynArray<u8> = DynArray::with_cap(10);
    /// vec.extend([1, 2, 3]);
    /// vec.shrink_to_fit();
    /// assert_eq!(vec.cap(), 3);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.buf.realloc(self.len);
    }
}

impl<T> DynArray<T> {
    pub(crate) fn grow(&mut self) {
        // Grow by a quarter of the current capacity, rounding up, with a floor of MIN_CAP for the
        // first allocation. cap <= isize::MAX, so the addition can't overflow.
        let mut new_cap = cmp::max(self.cap() + self.cap().div_ceil(RESIZE_STEP), MIN_CAP);

        // If we would grow past the maximum capacity, instead use the maximum if it represents
        // growth.
        if size_of::<T>() != 0 {
            let max_elements = MAX_CAP / size_of::<T>();
            if new_cap > max_elements && max_elements > self.cap() {
                new_cap = max_elements;
            }
        }

        self.buf.realloc(new_cap);
    }

    pub(crate) const fn needs_to_shrink(&self) -> bool {
        // cap - len > len / 4 is the integer form of cap / len > 1.25. The floor stops tiny
        // containers from reallocating on nearly every removal.
        self.len > 0
            && self.cap() > SHRINK_FLOOR
            && self.cap() - self.len > self.len / RESIZE_STEP
    }

    pub(crate) fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "index {} out of bounds for collection with {} elements",
            index,
            self.len
        );
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<A: IntoIterator<Item = T>>(&mut self, iter: A) {
        for item in iter.into_iter() {
            self.push(item);
        }
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(values: [T; N]) -> Self {
        let mut vec = DynArray::with_cap(N);

        for value in values {
            // SAFETY: The DynArray has been created with capacity for all N values.
            unsafe { vec.push_unchecked(value); }
        }

        vec
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let iter = value.into_iter();
        let mut vec = DynArray::with_cap(iter.size_hint().0);

        for item in iter {
            vec.push(item);
        }

        vec
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        debug_assert!(self.len <= self.cap());

        // Call drop on all initialized values in place. The allocation itself is released by
        // RawBuf's Drop, which never drops slot contents.
        for i in 0..self.len {
            // SAFETY: All slots below len hold initialized values, each dropped exactly once.
            unsafe { self.buf.ptr.add(i).as_mut().assume_init_drop(); }
        }
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: Slots [0, len) are initialized and contiguous, the pointer is properly aligned
        // and len never exceeds the allocated capacity. Reinterprets *mut MaybeUninit<T> as
        // *const T for all values below len.
        unsafe {
            slice::from_raw_parts(
                self.buf.ptr.as_ptr().cast(),
                self.len
            )
        }
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: Slots [0, len) are initialized and contiguous, the pointer is properly aligned
        // and len never exceeds the allocated capacity. Reinterprets *mut MaybeUninit<T> as
        // *mut T for all values below len.
        unsafe {
            slice::from_raw_parts_mut(
                self.buf.ptr.as_ptr().cast(),
                self.len
            )
        }
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self.deref()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.deref_mut()
    }
}

impl<T> Borrow<[T]> for DynArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_ref()
    }
}

impl<T> BorrowMut<[T]> for DynArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut()
    }
}

// SAFETY: DynArrays, when used safely, rely on unique pointers and are therefore safe for Send
// when T: Send.
unsafe impl<T: Send> Send for DynArray<T> {}
// SAFETY: DynArray's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs. This means that DynArray<T> can safely implement Sync when T: Sync.
unsafe impl<T: Sync> Sync for DynArray<T> {}

impl<T: Clone> Clone for DynArray<T> {
    /// Performs a deep copy: a fresh buffer with the same capacity as the source, with each live
    /// element cloned into it. The two DynArrays own independent storage afterwards.
    fn clone(&self) -> Self {
        let mut vec = Self::with_cap(self.cap());

        for value in self.iter() {
            // SAFETY: The DynArray has been created with the source's capacity, which is at least
            // the source's length.
            unsafe { vec.push_unchecked(value.clone()); }
        }

        vec
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: Debug> Debug for DynArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArray")
            .field("contents", &&**self)
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Debug> Display for DynArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
