//! Configuration for resource class selection.
//!
//! Controls which classes have their static initializers examined and which of them
//! follow the styleable (zero-fill) convention.

use std::collections::HashSet;

/// Simple name prefix of generated resource inner classes (`R$string`, `R$id`, ...).
pub const RESOURCE_CLASS_PREFIX: &str = "R$";

/// Simple name of the generated styleable class.
pub const STYLEABLE_CLASS_NAME: &str = "R$styleable";

/// Configuration for resource table remapping.
///
/// # Examples
///
/// ```rust
/// use resremap::resources::ResourceConfig;
///
/// let config = ResourceConfig::default().customized_class("Lcom/example/R;");
/// assert!(config.is_customized("Lcom/example/R;"));
/// assert!(!config.is_customized("Lcom/example/R$string;"));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    /// Fully qualified class descriptors that are examined even though their simple name
    /// does not look like a generated resource class (e.g. an outer `R` class customized
    /// to carry extra arrays).
    pub customized_classes: HashSet<String>,

    /// Simple class names (without package and trailing `;`) whose arrays are indexed by
    /// position from unrelated code and must keep their length (default: `R$styleable`).
    pub styleable_class_names: HashSet<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            customized_classes: HashSet::new(),
            styleable_class_names: HashSet::from([STYLEABLE_CLASS_NAME.to_string()]),
        }
    }
}

impl ResourceConfig {
    /// Adds a class descriptor to the customized allowlist.
    #[must_use]
    pub fn customized_class(mut self, descriptor: impl Into<String>) -> Self {
        self.customized_classes.insert(descriptor.into());
        self
    }

    /// Adds a simple class name that follows the styleable convention.
    #[must_use]
    pub fn styleable_class(mut self, simple_name: impl Into<String>) -> Self {
        self.styleable_class_names.insert(simple_name.into());
        self
    }

    /// Returns true if `descriptor` is on the customized allowlist.
    #[must_use]
    pub fn is_customized(&self, descriptor: &str) -> bool {
        self.customized_classes.contains(descriptor)
    }

    /// Returns true if the simple class name follows the styleable convention.
    #[must_use]
    pub fn is_styleable(&self, simple_name: &str) -> bool {
        self.styleable_class_names.contains(simple_name)
    }
}
