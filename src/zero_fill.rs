//! Byte-wise fill of a typed buffer. The element size always comes from the
//! buffer's element type, never from the caller.

use bytemuck::Pod;
use log::debug;

use crate::error::FillError;
use crate::size::{ByteLen, ElementCount, ElementSize};

/// Fills the bytes of the first `count` elements of `buffer` with `fill`.
///
/// `None` stands for an unbound buffer. All checks run before the write, so
/// a rejected call leaves the buffer exactly as it was. Rejections are
/// returned to the caller and only logged at debug level.
pub fn fill_bytes<T: Pod>(
    buffer: Option<&mut [T]>,
    count: ElementCount,
    fill: u8,
) -> Result<ByteLen, FillError> {
    let size = ElementSize::of::<T>()?;
    let len = count.bytes(size).map_err(|err| {
        debug!("[zero_fill] rejected: {err}");
        err
    })?;

    if len.is_zero() {
        return Ok(ByteLen::ZERO);
    }

    let Some(region) = buffer else {
        debug!("[zero_fill] rejected: unbound buffer, {len} requested");
        return Err(FillError::NullBuffer { requested: len.get() });
    };

    let capacity = ByteLen::of_slice(region);
    if len > capacity {
        debug!("[zero_fill] rejected: {len} requested, capacity {capacity}");
        return Err(FillError::invalid_length(len.get(), capacity.get()));
    }

    debug!("[zero_fill] {count} x {size} = {len}, fill {fill:#04x}");
    write_prefix(bytemuck::cast_slice_mut(region), len, fill);
    Ok(len)
}

/// [`fill_bytes`] with a fill byte of zero.
pub fn zero_fill<T: Pod>(buffer: Option<&mut [T]>, count: ElementCount) -> Result<ByteLen, FillError> {
    fill_bytes(buffer, count, 0)
}

/// Sets every byte of every element to `fill`.
pub fn fill_elements<T: Pod>(elements: &mut [T], fill: u8) -> ByteLen {
    let len = ByteLen::of_slice(elements);
    // bytemuck refuses to view zero-sized elements as bytes; there is
    // nothing to write anyway.
    if len.is_zero() {
        return len;
    }
    debug!("[zero_fill] {} elements, {len}, fill {fill:#04x}", elements.len());
    write_prefix(bytemuck::cast_slice_mut(elements), len, fill);
    len
}

/// Zeroes every element of the slice.
pub fn zero_elements<T: Pod>(elements: &mut [T]) -> ByteLen {
    fill_elements(elements, 0)
}

fn write_prefix(region: &mut [u8], len: ByteLen, fill: u8) {
    region[..len.get()].fill(fill);
}
