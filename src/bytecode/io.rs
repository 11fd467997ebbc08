//! Little-endian reading and writing of fixed-width payload elements.
//!
//! Array payloads store their elements as packed little-endian integers of 1, 2, 4 or
//! 8 bytes. This module provides the bounds-checked primitives used to decode and
//! re-encode them, so that a regenerated payload is bit-exact with what a compiler
//! would have emitted.
//!
//! # Key Components
//!
//! - [`crate::bytecode::io::PayloadIO`] - Trait implemented by every element integer type
//! - [`crate::bytecode::io::read_le_at`] - Read a value at an offset and advance the offset
//! - [`crate::bytecode::io::write_le_at`] - Write a value at an offset and advance the offset
//!
//! # Usage Examples
//!
//! ```rust
//! use resremap::bytecode::io::{read_le_at, write_le_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_le_at(&mut data, &mut offset, 0x0300_u16)?;
//! write_le_at(&mut data, &mut offset, 0x7f01_0000_u32)?;
//!
//! let mut offset = 0;
//! assert_eq!(read_le_at::<u16>(&data, &mut offset)?, 0x0300);
//! assert_eq!(read_le_at::<u32>(&data, &mut offset)?, 0x7f01_0000);
//! # Ok::<(), resremap::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Trait for integer types that can appear as payload elements or payload header fields.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait PayloadIO: Sized {
    /// Byte array representation of this integer type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

// Implement PayloadIO support for u64
impl PayloadIO for u64 {
    type Bytes = [u8; 8];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u64::from_le_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u64::to_le_bytes(self)
    }
}

// Implement PayloadIO support for u32
impl PayloadIO for u32 {
    type Bytes = [u8; 4];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u32::from_le_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u32::to_le_bytes(self)
    }
}

// Implement PayloadIO support for u16
impl PayloadIO for u16 {
    type Bytes = [u8; 2];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u16::from_le_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u16::to_le_bytes(self)
    }
}

// Implement PayloadIO support for u8
impl PayloadIO for u8 {
    type Bytes = [u8; 1];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u8::from_le_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u8::to_le_bytes(self)
    }
}

/// Reads a value of type `T` in little-endian order at `offset`, advancing the offset.
///
/// # Arguments
///
/// * `data` - The buffer to read from
/// * `offset` - Position to read at; advanced by `size_of::<T>()` on success
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the read would exceed the buffer.
pub fn read_le_at<T: PayloadIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Writes `value` in little-endian order at `offset`, advancing the offset.
///
/// # Arguments
///
/// * `data` - The buffer to write into
/// * `offset` - Position to write at; advanced by `size_of::<T>()` on success
/// * `value` - The value to write
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the write would exceed the buffer.
pub fn write_le_at<T: PayloadIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let bytes = value.to_le_bytes();
    data[*offset..end].copy_from_slice(bytes.as_ref());
    *offset = end;

    Ok(())
}
