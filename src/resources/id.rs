use std::fmt;

/// A compiled resource identifier.
///
/// Resource IDs are 32-bit values laid out as `0xPPTTEEEE`:
/// - The high byte (bits 24-31) is the package
/// - The next byte (bits 16-23) is the resource type
/// - The low 16 bits (bits 0-15) are the entry index within that type
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// Creates a new resource ID from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        ResourceId(value)
    }

    /// Returns the raw value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the package ID (high byte)
    #[must_use]
    pub fn package(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the type ID (bits 16-23)
    #[must_use]
    pub fn type_id(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Extracts the entry index (low 16 bits)
    #[must_use]
    pub fn entry(&self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Returns true for the null ID (value 0), which is what a deleted styleable slot holds
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for ResourceId {
    fn from(value: u32) -> Self {
        ResourceId(value)
    }
}

impl From<ResourceId> for u32 {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ResourceId(0x{:08x}, package: 0x{:02x}, type: 0x{:02x}, entry: {})",
            self.0,
            self.package(),
            self.type_id(),
            self.entry()
        )
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
