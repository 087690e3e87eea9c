//! GraphBLAS Descriptor
//!
//! Controls operation modifiers like transpose, complement mask, etc.

/// GraphBLAS Descriptor
///
/// Modifies how operations are performed:
/// - Transpose the relation (compose against columns instead of rows)
/// - Complement mask
/// - Replace vs merge output
/// - Structural mask (only pattern, not values)
///
/// Unlike the C API, complement and structure are independent flags, so
/// `RSC` (replace + structural + complement) is representable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// Transpose the matrix input
    pub transpose: bool,
    /// Complement the mask
    pub complement: bool,
    /// Use only the mask's pattern, ignoring its values
    pub structural: bool,
    /// Clear the output before writing
    pub replace: bool,
}

impl Descriptor {
    /// Create default descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose against the transposed relation
    pub fn transpose_input(mut self) -> Self {
        self.transpose = true;
        self
    }

    /// Set mask to complement
    pub fn complement_mask(mut self) -> Self {
        self.complement = true;
        self
    }

    /// Set mask to structural
    pub fn structural_mask(mut self) -> Self {
        self.structural = true;
        self
    }

    /// Set output to replace mode
    pub fn replace_output(mut self) -> Self {
        self.replace = true;
        self
    }

    /// Check if the matrix input should be transposed
    pub fn is_transposed(&self) -> bool {
        self.transpose
    }

    /// Check if mask should be complemented
    pub fn is_mask_complemented(&self) -> bool {
        self.complement
    }

    /// Check if mask is structural
    pub fn is_mask_structural(&self) -> bool {
        self.structural
    }

    /// Check if output should be replaced
    pub fn should_replace_output(&self) -> bool {
        self.replace
    }
}

/// Common descriptor presets
#[allow(non_snake_case)]
pub mod GrBDesc {
    use super::*;

    /// Default descriptor
    pub fn default() -> Descriptor {
        Descriptor::new()
    }

    /// Transpose the relation
    pub fn t() -> Descriptor {
        Descriptor::new().transpose_input()
    }

    /// Structural mask
    pub fn s() -> Descriptor {
        Descriptor::new().structural_mask()
    }

    /// Replace output and structural mask
    pub fn rs() -> Descriptor {
        Descriptor::new().replace_output().structural_mask()
    }

    /// Structural complement
    pub fn sc() -> Descriptor {
        Descriptor::new().structural_mask().complement_mask()
    }

    /// Replace, structural, complement: the BFS "not yet visited" descriptor
    pub fn rsc() -> Descriptor {
        Descriptor::new()
            .replace_output()
            .structural_mask()
            .complement_mask()
    }
}
