use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into two groups with very different recovery behaviour when a
/// static initializer is rewritten:
///
/// # Error Categories
///
/// ## Site-level errors (recoverable)
/// - [`Error::MalformedInitializer`] - An array site does not have the expected shape; the
///   site is skipped and the remaining sites of the method are still processed
///
/// ## Class-level errors (abort the class)
/// - [`Error::PayloadWidthMismatch`] - A bulk-fill payload does not use 4-byte elements;
///   rewriting it could truncate surviving resource IDs, so the whole class is left untouched
///
/// ## Encoding and patching errors
/// - [`Error::Malformed`] - Corrupted binary payload data
/// - [`Error::OutOfBounds`] - Attempted to read or write beyond a buffer
/// - [`Error::Patch`] - An instruction patch primitive was applied to the wrong instruction
///
/// # Examples
///
/// ```rust
/// use resremap::{bytecode::ArrayPayload, Error};
///
/// match ArrayPayload::parse(&[0x00, 0x03]) {
///     Ok(payload) => println!("{} elements", payload.len()),
///     Err(Error::OutOfBounds) => eprintln!("payload is truncated"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed payload: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An array allocation has no reaching literal size definition, or the code that
    /// populates it does not describe a well-formed array.
    ///
    /// This is reported per site. The site is left untouched and processing continues
    /// with the other sites of the same method.
    ///
    /// # Fields
    ///
    /// * `position` - Instruction index of the offending allocation
    /// * `message` - What exactly did not match the expected initializer shape
    #[error("Malformed initializer at instruction {position}: {message}")]
    MalformedInitializer {
        /// Instruction index of the allocation
        position: usize,
        /// Description of the shape violation
        message: String,
    },

    /// A bulk-fill payload uses an element width different from the width of a
    /// resource ID.
    ///
    /// Rewriting such a payload would silently truncate or widen the surviving IDs, so
    /// this error aborts processing of the entire class.
    #[error("Payload width mismatch at instruction {position}: expected {expected} bytes, found {actual}")]
    PayloadWidthMismatch {
        /// Instruction index of the bulk-fill instruction
        position: usize,
        /// The element width required for resource IDs
        expected: u16,
        /// The element width found in the payload
        actual: u16,
    },

    /// The data is damaged and could not be decoded.
    ///
    /// Raised while decoding binary array payloads. The error includes the source
    /// location where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading or writing a buffer.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// An instruction patch primitive was applied to a position that does not hold
    /// the expected instruction kind, or lies outside the method body.
    #[error("Invalid patch - {0}")]
    Patch(String),
}
