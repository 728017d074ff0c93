//! Indentation of generated sources.

/// Width of one nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    unit: &'static str,
}

impl Indent {
    /// Four spaces, as rustfmt emits.
    pub const RUST: Self = Self { unit: "    " };

    pub const TAB: Self = Self { unit: "\t" };

    /// One level of `width` spaces; widths above eight are clamped.
    pub fn spaces(width: usize) -> Self {
        const SPACES: &str = "        ";
        let width = width.min(SPACES.len());
        Self {
            unit: SPACES.split_at(width).0,
        }
    }

    pub fn unit(&self) -> &'static str {
        self.unit
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::RUST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(Indent::spaces(2).unit(), "  ");
        assert_eq!(Indent::spaces(4), Indent::RUST);
        assert_eq!(Indent::spaces(12).unit().len(), 8);
        assert_eq!(Indent::TAB.unit(), "\t");
        assert_eq!(Indent::default(), Indent::RUST);
    }
}
