use std::fmt;

/// Errors reported by the checked accessor [`PtrUnion::downcast`](crate::PtrUnion::downcast)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionError {
    /// The handle carries no type (tag 0), for instance a failed lookup
    Untyped { expected: &'static str },
    /// The handle carries the requested type but its address is null
    Null { expected: &'static str },
    /// The handle holds a different listed type than the one requested
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for UnionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnionError::Untyped { expected } => {
                write!(f, "Expected {} but the pointer is untyped", expected)
            }
            UnionError::Null { expected } => write!(f, "Null pointer of type {}", expected),
            UnionError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for UnionError {}
