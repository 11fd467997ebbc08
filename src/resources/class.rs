use std::fmt;

/// Table convention of a resource class.
///
/// The two conventions differ only in how deletions are applied, so they are a plain
/// tag rather than separate types; [`crate::remap::rewrite_site`] dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Arrays may shrink; deleted IDs are removed and the length is reduced.
    Plain,
    /// Arrays are indexed by position from other code; deleted IDs become 0 and the
    /// length never changes.
    Styleable,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Plain => write!(f, "plain"),
            ClassKind::Styleable => write!(f, "styleable"),
        }
    }
}

/// The class an array site belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassContext {
    /// Descriptor-form class name
    pub name: String,
    /// Table convention of the class
    pub kind: ClassKind,
    /// Whether the class was selected through the customized allowlist
    pub customized: bool,
}

impl ClassContext {
    /// Creates a context for a class that is not on the customized allowlist.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        ClassContext {
            name: name.into(),
            kind,
            customized: false,
        }
    }

    /// Creates a context for a plain class.
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Plain)
    }

    /// Creates a context for a styleable class.
    #[must_use]
    pub fn styleable(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Styleable)
    }

    /// Returns the simple name of the class; see [`simple_name`].
    #[must_use]
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}

/// Strips the package and the descriptor decoration from a class name.
///
/// `Lcom/example/R$styleable;` becomes `R$styleable`; dotted names such as
/// `com.example.R$id` are handled as well.
#[must_use]
pub fn simple_name(descriptor: &str) -> &str {
    let trimmed = descriptor.strip_suffix(';').unwrap_or(descriptor);
    let start = trimmed
        .rfind(|c| c == '/' || c == '.')
        .map_or_else(|| usize::from(trimmed.starts_with('L')), |pos| pos + 1);
    &trimmed[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("Lcom/redextest/R$styleable;"), "R$styleable");
        assert_eq!(simple_name("Lcom/redextest/R;"), "R");
        assert_eq!(simple_name("com.example.R$id"), "R$id");
        assert_eq!(simple_name("LR$string;"), "R$string");
        assert_eq!(simple_name("R$string"), "R$string");
    }

    #[test]
    fn test_context_constructors() {
        let ctx = ClassContext::styleable("Lcom/example/R$styleable;");
        assert_eq!(ctx.kind, ClassKind::Styleable);
        assert!(!ctx.customized);
        assert_eq!(ctx.simple_name(), "R$styleable");
        assert_eq!(ClassContext::plain("LR$id;").kind.to_string(), "plain");
    }
}
