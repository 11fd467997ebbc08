//! Fixed-width array payloads used by bulk-fill instructions.
//!
//! A bulk-fill instruction initializes a whole array from a constant table embedded in
//! the method. The table is stored as a `fill-array-data-payload` pseudo-instruction:
//!
//! ```text
//! +--------+---------------+-----------------+------------------------------+
//! | u16    | u16           | u32             | count * width bytes (LE)     |
//! | 0x0300 | element width | element count   | padded to whole code units   |
//! +--------+---------------+-----------------+------------------------------+
//! ```
//!
//! [`ArrayPayload`] keeps the element data in an immutable, reference-counted buffer.
//! Rewriting a payload always builds a new buffer and swaps it in, so a payload that is
//! still referenced elsewhere (for example by a clone taken for diagnostics) is never
//! observed in a half-updated state.

use std::{fmt, sync::Arc};

use strum::{EnumCount, EnumIter};

use crate::{
    bytecode::io::{read_le_at, write_le_at},
    Result,
};

/// Identifier of the `fill-array-data-payload` pseudo-instruction.
pub const FILL_ARRAY_DATA_IDENT: u16 = 0x0300;

/// Size of the payload header (ident, width and count) in bytes.
const HEADER_SIZE: usize = 8;

/// Width in bytes of a single array payload element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum ElementWidth {
    /// `byte[]` / `boolean[]`
    One,
    /// `short[]` / `char[]`
    Two,
    /// `int[]` / `float[]`, the width of a resource ID
    Four,
    /// `long[]` / `double[]`
    Eight,
}

impl ElementWidth {
    /// Returns the width in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            ElementWidth::One => 1,
            ElementWidth::Two => 2,
            ElementWidth::Four => 4,
            ElementWidth::Eight => 8,
        }
    }

    /// Returns the width as encoded in the payload header.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.bytes() as u16
    }

    /// Converts a payload header width into an [`ElementWidth`].
    ///
    /// Returns `None` for widths the format does not allow.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            1 => Some(ElementWidth::One),
            2 => Some(ElementWidth::Two),
            4 => Some(ElementWidth::Four),
            8 => Some(ElementWidth::Eight),
            _ => None,
        }
    }

    /// Largest element value representable at this width.
    #[must_use]
    pub const fn max_value(self) -> u64 {
        match self {
            ElementWidth::Eight => u64::MAX,
            _ => (1_u64 << (self.bytes() * 8)) - 1,
        }
    }
}

/// The constant data of a bulk-fill instruction.
///
/// Elements are kept as packed little-endian bytes at a fixed [`ElementWidth`]. The
/// buffer itself is shared and never mutated; see [`ArrayPayload::replace_elements`].
#[derive(Clone, PartialEq, Eq)]
pub struct ArrayPayload {
    width: ElementWidth,
    data: Arc<[u8]>,
}

impl ArrayPayload {
    /// Creates a 4-byte payload holding the given 32-bit values.
    #[must_use]
    pub fn from_u32s(values: &[u32]) -> Self {
        let mut data = vec![0_u8; values.len() * 4];
        for (chunk, value) in data.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }

        ArrayPayload {
            width: ElementWidth::Four,
            data: Arc::from(data),
        }
    }

    /// Creates a payload of the given width from unsigned element values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if a value does not fit into `width`.
    pub fn from_elements(width: ElementWidth, values: &[u64]) -> Result<Self> {
        let mut data = vec![0_u8; values.len() * width.bytes()];
        let mut offset = 0;
        for &value in values {
            if value > width.max_value() {
                return Err(malformed_error!(
                    "Element value 0x{:x} does not fit into {} bytes",
                    value,
                    width.bytes()
                ));
            }
            match width {
                ElementWidth::One => write_le_at(&mut data, &mut offset, value as u8)?,
                ElementWidth::Two => write_le_at(&mut data, &mut offset, value as u16)?,
                ElementWidth::Four => write_le_at(&mut data, &mut offset, value as u32)?,
                ElementWidth::Eight => write_le_at(&mut data, &mut offset, value)?,
            }
        }

        Ok(ArrayPayload {
            width,
            data: Arc::from(data),
        })
    }

    /// Decodes a `fill-array-data-payload` pseudo-instruction.
    ///
    /// Trailing padding after the element data is accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the buffer is shorter than the header or
    /// the declared element data, and [`crate::Error::Malformed`] for a wrong ident or an
    /// invalid element width.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut offset = 0;
        let ident: u16 = read_le_at(data, &mut offset)?;
        if ident != FILL_ARRAY_DATA_IDENT {
            return Err(malformed_error!(
                "Invalid array payload ident 0x{:04x}",
                ident
            ));
        }

        let raw_width: u16 = read_le_at(data, &mut offset)?;
        let Some(width) = ElementWidth::from_raw(raw_width) else {
            return Err(malformed_error!("Invalid array element width {}", raw_width));
        };

        let count: u32 = read_le_at(data, &mut offset)?;
        let Some(size) = (count as usize).checked_mul(width.bytes()) else {
            return Err(malformed_error!("Array payload size overflow - {} elements", count));
        };
        let Some(end) = offset.checked_add(size) else {
            return Err(crate::Error::OutOfBounds);
        };
        if end > data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        Ok(ArrayPayload {
            width,
            data: Arc::from(&data[offset..end]),
        })
    }

    /// Encodes this payload as a `fill-array-data-payload` pseudo-instruction.
    ///
    /// The output is padded with zero bytes to a whole number of 16-bit code units.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the element count exceeds `u32::MAX`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let Ok(count) = u32::try_from(self.len()) else {
            return Err(malformed_error!("Too many payload elements - {}", self.len()));
        };

        let size = HEADER_SIZE + self.data.len();
        let mut out = vec![0_u8; size + (size & 1)];
        let mut offset = 0;
        write_le_at(&mut out, &mut offset, FILL_ARRAY_DATA_IDENT)?;
        write_le_at(&mut out, &mut offset, self.width.raw())?;
        write_le_at(&mut out, &mut offset, count)?;
        out[offset..offset + self.data.len()].copy_from_slice(&self.data);

        Ok(out)
    }

    /// Returns the element width.
    #[must_use]
    pub fn width(&self) -> ElementWidth {
        self.width
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.width.bytes()
    }

    /// Returns true if the payload holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the raw little-endian element bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the element at `index` zero-extended to 64 bits.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u64> {
        let mut offset = index.checked_mul(self.width.bytes())?;
        match self.width {
            ElementWidth::One => read_le_at::<u8>(&self.data, &mut offset).ok().map(u64::from),
            ElementWidth::Two => read_le_at::<u16>(&self.data, &mut offset).ok().map(u64::from),
            ElementWidth::Four => read_le_at::<u32>(&self.data, &mut offset).ok().map(u64::from),
            ElementWidth::Eight => read_le_at::<u64>(&self.data, &mut offset).ok(),
        }
    }

    /// Returns all elements zero-extended to 64 bits.
    #[must_use]
    pub fn elements(&self) -> Vec<u64> {
        (0..self.len()).filter_map(|index| self.get(index)).collect()
    }

    /// Returns all elements as 32-bit values, or `None` if this is not a 4-byte payload.
    #[must_use]
    pub fn as_u32s(&self) -> Option<Vec<u32>> {
        if self.width != ElementWidth::Four {
            return None;
        }

        Some(
            self.data
                .chunks_exact(4)
                .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }

    /// Builds a payload with new elements at this payload's width.
    ///
    /// The returned payload owns a fresh buffer; `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if a value does not fit into the width.
    pub fn replace_elements(&self, values: &[u64]) -> Result<Self> {
        ArrayPayload::from_elements(self.width, values)
    }

    /// Returns true if both payloads share the same underlying buffer.
    #[must_use]
    pub fn shares_buffer(&self, other: &ArrayPayload) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for ArrayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayPayload")
            .field("width", &self.width.bytes())
            .field("elements", &self.elements())
            .finish()
    }
}

impl fmt::Display for ArrayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.width.bytes() * 2;
        write!(f, "[")?;
        for (index, value) in self.elements().iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "0x{:0width$x}", value, width = digits)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::Error;

    #[test]
    fn element_width_roundtrip() {
        assert_eq!(ElementWidth::COUNT, 4);
        for width in ElementWidth::iter() {
            assert_eq!(ElementWidth::from_raw(width.raw()), Some(width));
        }
        assert_eq!(ElementWidth::from_raw(3), None);
        assert_eq!(ElementWidth::from_raw(0), None);
        assert_eq!(ElementWidth::Two.max_value(), 0xffff);
    }

    #[test]
    fn from_u32s_layout() {
        let payload = ArrayPayload::from_u32s(&[0x7f01_0000, 0x7f01_0001]);
        assert_eq!(payload.width(), ElementWidth::Four);
        assert_eq!(payload.len(), 2);
        assert_eq!(
            payload.data(),
            &[0x00, 0x00, 0x01, 0x7f, 0x01, 0x00, 0x01, 0x7f]
        );
        assert_eq!(payload.get(1), Some(0x7f01_0001));
        assert_eq!(payload.get(2), None);
    }

    #[test]
    fn encode_matches_compiler_output() {
        // fill-array-data-payload for new int[] { 0x7f040000, 0x7f040001 }
        let expected = [
            0x00, 0x03, 0x04, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x7f, 0x01, 0x00,
            0x04, 0x7f,
        ];
        let payload = ArrayPayload::from_u32s(&[0x7f04_0000, 0x7f04_0001]);
        assert_eq!(payload.to_bytes().unwrap(), expected);

        let parsed = ArrayPayload::parse(&expected).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn encode_pads_odd_byte_payloads() {
        let payload = ArrayPayload::from_elements(ElementWidth::One, &[1, 2, 3]).unwrap();
        let bytes = payload.to_bytes().unwrap();
        assert_eq!(bytes, [0x00, 0x03, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 1, 2, 3, 0]);

        let parsed = ArrayPayload::parse(&bytes).unwrap();
        assert_eq!(parsed.elements(), vec![1, 2, 3]);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            ArrayPayload::parse(&[0x00, 0x01, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            ArrayPayload::parse(&[0x00, 0x03, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00]),
            Err(Error::Malformed { .. })
        ));
        assert_eq!(
            ArrayPayload::parse(&[0x00, 0x03, 0x04, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01]),
            Err(Error::OutOfBounds)
        );
        assert_eq!(ArrayPayload::parse(&[0x00]), Err(Error::OutOfBounds));
    }

    #[test]
    fn from_elements_rejects_overflow() {
        assert!(ArrayPayload::from_elements(ElementWidth::Two, &[0x1_0000]).is_err());
        let wide = ArrayPayload::from_elements(ElementWidth::Eight, &[u64::MAX]).unwrap();
        assert_eq!(wide.elements(), vec![u64::MAX]);
        assert_eq!(wide.as_u32s(), None);
    }

    #[test]
    fn replace_elements_uses_fresh_buffer() {
        let original = ArrayPayload::from_u32s(&[1, 2, 3]);
        let alias = original.clone();
        assert!(alias.shares_buffer(&original));

        let replaced = original.replace_elements(&[3]).unwrap();
        assert!(!replaced.shares_buffer(&original));
        assert_eq!(replaced.width(), ElementWidth::Four);
        assert_eq!(replaced.as_u32s(), Some(vec![3]));
        assert_eq!(alias.as_u32s(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn display_formats_elements() {
        let payload = ArrayPayload::from_u32s(&[0x7f04_0001, 0]);
        assert_eq!(payload.to_string(), "[0x7f040001, 0x00000000]");
    }
}
