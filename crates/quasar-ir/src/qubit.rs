//! Dense integer identifiers for registers allocated by a compile pass.

use std::fmt;

/// A resolved qubit register slot. Dense, zero-based, assigned by a
/// resource allocator during lowering — never stored back onto an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct QubitId(pub u32);

/// A resolved classical-bit register slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct CbitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}]", self.0)
    }
}

impl fmt::Display for CbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c[{}]", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(value: u32) -> Self {
        QubitId(value)
    }
}

impl From<u32> for CbitId {
    fn from(value: u32) -> Self {
        CbitId(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        assert_eq!(QubitId(3).to_string(), "q[3]");
        assert_eq!(CbitId(1).to_string(), "c[1]");
    }
}
