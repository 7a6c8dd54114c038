// Owning handle for a heap-allocated array.
// Allocation happens once in the constructor and release happens once in Drop;
// there is no other way to free the memory and the handle cannot be cloned.

use std::alloc::{self, Layout};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use bytemuck::Pod;
use log::debug;

use crate::error::FillError;
use crate::size::{ByteLen, ElementCount};
use crate::zero_fill::fill_elements;

/// A fixed-length heap array of `T` with a single release point.
pub struct HeapBuffer<T: Pod> {
    ptr: NonNull<T>,
    len: usize,
}

// SAFETY: HeapBuffer uniquely owns its allocation, like Box<[T]>.
unsafe impl<T: Pod + Send> Send for HeapBuffer<T> {}
unsafe impl<T: Pod + Sync> Sync for HeapBuffer<T> {}

impl<T: Pod> HeapBuffer<T> {
    /// Allocates `count` elements with every byte set to zero.
    pub fn zeroed(count: ElementCount) -> Result<Self, FillError> {
        Self::allocate(count, |layout| unsafe { alloc::alloc_zeroed(layout) })
    }

    /// Allocates `count` elements with every byte set to `byte`.
    ///
    /// Handy for sentinel patterns such as `0xFF` that make an unfilled
    /// element easy to spot.
    pub fn filled(count: ElementCount, byte: u8) -> Result<Self, FillError> {
        Self::allocate(count, |layout| unsafe {
            let raw = alloc::alloc(layout);
            if !raw.is_null() {
                // Fresh memory is uninitialized, so it is written through
                // the raw pointer rather than a slice.
                ptr::write_bytes(raw, byte, layout.size());
            }
            raw
        })
    }

    fn allocate(count: ElementCount, raw_alloc: impl FnOnce(Layout) -> *mut u8) -> Result<Self, FillError> {
        // Zero-sized element types never fail the layout computation.
        let layout = Layout::array::<T>(count.get())
            .map_err(|_| FillError::length_overflow(count.get(), mem::size_of::<T>()))?;

        if layout.size() == 0 {
            return Ok(HeapBuffer {
                ptr: NonNull::dangling(),
                len: count.get(),
            });
        }

        let raw = raw_alloc(layout);
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            alloc::handle_alloc_error(layout);
        };

        debug!("[heap_buffer] allocated {} ({} bytes)", count, layout.size());
        Ok(HeapBuffer {
            ptr,
            len: count.get(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count(&self) -> ElementCount {
        ElementCount::new(self.len)
    }

    pub fn byte_len(&self) -> ByteLen {
        ByteLen::of_slice(self.as_slice())
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid and initialized for len elements (or dangling
        // and len elements of zero bytes).
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for as_slice, and &mut self guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Sets every byte of the buffer to `byte`.
    pub fn fill(&mut self, byte: u8) -> ByteLen {
        fill_elements(self.as_mut_slice(), byte)
    }

    pub fn zero(&mut self) -> ByteLen {
        self.fill(0)
    }

    fn layout(&self) -> Option<Layout> {
        Layout::array::<T>(self.len).ok().filter(|layout| layout.size() != 0)
    }
}

impl<T: Pod> Drop for HeapBuffer<T> {
    fn drop(&mut self) {
        if let Some(layout) = self.layout() {
            debug!("[heap_buffer] released {} bytes", layout.size());
            // SAFETY: allocated in `allocate` with this very layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) }
        }
    }
}

impl<T: Pod> Deref for HeapBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Pod> DerefMut for HeapBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for HeapBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
