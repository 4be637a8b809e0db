use std::iter::FusedIterator;
use std::mem;
use std::ptr;

use super::DynArray;
use crate::contiguous::raw_buf::RawBuf;

impl<T> IntoIterator for DynArray<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        // SAFETY: self is forgotten immediately after the buffer is read out of it, so the
        // allocation has exactly one owner, the iterator, and no element is dropped twice.
        let buf = unsafe { ptr::read(&self.buf) };
        let len = self.len;
        mem::forget(self);

        IntoIter {
            buf,
            index: 0,
            len,
        }
    }
}

/// An owned iterator over the elements of a [`DynArray`]. See [`DynArray::into_iter`].
///
/// Yields from both ends. Elements that are never yielded are dropped along with the buffer when
/// the iterator is dropped.
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    index: usize,
    len: usize,
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        for i in self.index..self.len {
            // SAFETY: Slots in index..len have not been yielded from either end and still hold
            // initialized values. The buffer itself is released by RawBuf's Drop.
            unsafe { self.buf.ptr.add(i).as_mut().assume_init_drop() }
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.len {
            // SAFETY: index is within the initialized range and is advanced past the slot
            // immediately, so the value is read exactly once and never dropped in place.
            let value = unsafe { self.buf.ptr.add(self.index).read().assume_init() };
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len - self.index, Some(self.len - self.index))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.index < self.len {
            self.len -= 1;
            // SAFETY: len has just been decremented, so the slot is within the unyielded range
            // and holds an initialized value which is read exactly once.
            let value = unsafe { self.buf.ptr.add(self.len).read().assume_init() };
            Some(value)
        } else {
            None
        }
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.len - self.index
    }
}

// Borrowed iteration uses the iter and iter_mut definitions provided by Deref<Target = [T]>.
