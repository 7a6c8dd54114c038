//! Zero-filling arrays without confusing element counts with byte counts.
//!
//! Fills take a typed buffer and an [`ElementCount`]; the element size is
//! always the buffer's own element type, via [`ElementSize::of`]. There is no
//! way to hand in a byte length or a guessed element size.
//!
//! ```
//! use memset_lesson::{zero_fill, ElementCount};
//!
//! let mut totals = [-1i64; 10];
//! let written = zero_fill(Some(&mut totals[..]), ElementCount::new(10)).unwrap();
//! assert_eq!(written.get(), 80);
//! assert_eq!(totals, [0; 10]);
//! ```
//!
//! An element size cannot be written by hand:
//!
//! ```compile_fail
//! use std::num::NonZeroUsize;
//! use memset_lesson::ElementSize;
//!
//! let four = ElementSize::from(NonZeroUsize::new(4).unwrap());
//! ```
//!
//! and the fill does not accept one, so an `i64` buffer cannot be sized as
//! if it held 4-byte ints:
//!
//! ```compile_fail
//! use memset_lesson::{zero_fill, ElementCount, ElementSize};
//!
//! let mut wide = [0i64; 10];
//! let size = ElementSize::of::<i32>().unwrap();
//! zero_fill(Some(&mut wide[..]), ElementCount::new(10), size).unwrap();
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod lesson;
pub mod size;
pub mod zero_fill;

pub use buffer::HeapBuffer;
pub use config::LessonConfig;
pub use error::{ConfigError, FillError, LessonError};
pub use lesson::{Lesson, LessonReport, Step};
pub use size::{ByteLen, Coverage, ElementCount, ElementSize};
pub use zero_fill::{fill_bytes, fill_elements, zero_elements, zero_fill};
