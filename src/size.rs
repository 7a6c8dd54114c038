// Element counts, element sizes and byte lengths as distinct types.
// A ByteLen can only come from count * size, so passing an element count
// where a byte count is expected does not type-check.

use std::fmt;
use std::mem;
use std::num::NonZeroUsize;

use crate::error::FillError;

//==============================================================================
// ElementCount
//==============================================================================

/// Number of elements in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ElementCount(usize);

impl ElementCount {
    pub const ZERO: ElementCount = ElementCount(0);

    pub const fn new(count: usize) -> Self {
        ElementCount(count)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Total bytes occupied by this many elements of `size`.
    pub fn bytes(self, size: ElementSize) -> Result<ByteLen, FillError> {
        self.0
            .checked_mul(size.get())
            .map(ByteLen)
            .ok_or_else(|| FillError::length_overflow(self.0, size.get()))
    }
}

impl From<usize> for ElementCount {
    fn from(count: usize) -> Self {
        ElementCount(count)
    }
}

impl fmt::Display for ElementCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} elements", self.0)
    }
}

//==============================================================================
// ElementSize
//==============================================================================

/// Size of one element in bytes. Never zero, never guessed: the only
/// constructor is the size query [`ElementSize::of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ElementSize(NonZeroUsize);

impl ElementSize {
    /// Size query for `T`; the only way to learn how wide an element is.
    pub fn of<T>() -> Result<Self, FillError> {
        NonZeroUsize::new(mem::size_of::<T>())
            .map(ElementSize)
            .ok_or(FillError::ZeroSizedElement {
                type_name: std::any::type_name::<T>(),
            })
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for ElementSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes/element", self.0)
    }
}

//==============================================================================
// ByteLen
//==============================================================================

/// Byte length of a region: element count times element size.
///
/// There is deliberately no `From<usize>`; see [`ElementCount::bytes`],
/// [`ByteLen::of`] and [`ByteLen::of_slice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ByteLen(usize);

impl ByteLen {
    pub const ZERO: ByteLen = ByteLen(0);

    /// Bytes needed for `count` values of `T`.
    pub fn of<T>(count: ElementCount) -> Result<Self, FillError> {
        count.bytes(ElementSize::of::<T>()?)
    }

    /// Bytes occupied by an existing slice. Zero-sized element types
    /// occupy zero bytes.
    pub fn of_slice<T>(elements: &[T]) -> Self {
        ByteLen(mem::size_of_val(elements))
    }

    pub const fn get(self) -> usize {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ByteLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

//==============================================================================
// Coverage
//==============================================================================

/// How far a byte prefix reaches into an array of fixed-size elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    /// Elements whose every byte lies inside the prefix.
    pub whole_elements: usize,
    /// Bytes of the next element that the prefix also touches.
    pub partial_bytes: usize,
}

impl Coverage {
    pub fn of(prefix_bytes: usize, size: ElementSize) -> Self {
        Coverage {
            whole_elements: prefix_bytes / size.get(),
            partial_bytes: prefix_bytes % size.get(),
        }
    }

    /// Elements the prefix reaches at all, whole or in part.
    pub fn touched_elements(&self) -> usize {
        self.whole_elements + usize::from(self.partial_bytes > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_size_of_primitives() {
        assert_eq!(ElementSize::of::<u8>().unwrap().get(), 1);
        assert_eq!(ElementSize::of::<i32>().unwrap().get(), mem::size_of::<i32>());
        assert_eq!(ElementSize::of::<u64>().unwrap().get(), 8);
    }

    #[test]
    fn test_element_size_rejects_zero_sized() {
        let err = ElementSize::of::<()>().unwrap_err();
        assert_eq!(err, FillError::ZeroSizedElement { type_name: "()" });
    }

    #[test]
    fn test_byte_len_is_count_times_size() {
        let len = ByteLen::of::<i32>(ElementCount::new(10)).unwrap();
        assert_eq!(len.get(), 10 * mem::size_of::<i32>());
        assert_ne!(len.get(), 10);
    }

    #[test]
    fn test_byte_len_of_slice() {
        let data = [0u16; 7];
        assert_eq!(ByteLen::of_slice(&data).get(), 14);
        let empty: [u64; 0] = [];
        assert!(ByteLen::of_slice(&empty).is_zero());
    }

    #[test]
    fn test_byte_len_overflow() {
        let err = ByteLen::of::<u32>(ElementCount::new(usize::MAX)).unwrap_err();
        assert!(err.is_invalid_length());
    }

    #[test]
    fn test_zero_count_is_zero_bytes() {
        assert_eq!(ByteLen::of::<u64>(ElementCount::ZERO).unwrap(), ByteLen::ZERO);
    }

    #[test]
    fn test_coverage_of_element_count_prefix() {
        // 10 bytes over 4-byte ints: elements 0 and 1, plus half of element 2
        let coverage = Coverage::of(10, ElementSize::of::<i32>().unwrap());
        assert_eq!(coverage.whole_elements, 2);
        assert_eq!(coverage.partial_bytes, 2);
        assert_eq!(coverage.touched_elements(), 3);
    }

    #[test]
    fn test_coverage_exact_fit() {
        let size = ElementSize::of::<u32>().unwrap();
        let coverage = Coverage::of(40, size);
        assert_eq!(coverage.whole_elements, 10);
        assert_eq!(coverage.partial_bytes, 0);
        assert_eq!(coverage.touched_elements(), 10);
    }

    #[test]
    fn test_display() {
        assert_eq!(ElementCount::new(3).to_string(), "3 elements");
        assert_eq!(ByteLen::of::<u8>(ElementCount::new(3)).unwrap().to_string(), "3 bytes");
    }
}
