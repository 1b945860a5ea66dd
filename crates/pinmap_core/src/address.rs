//! Free-text address decomposition.
//!
//! # Responsibility
//! - Split one comma-separated address line into street/town/state/zip.
//! - Own the single display format used to reassemble those fields.
//!
//! # Invariants
//! - Decomposition never fails; missing trailing components are empty.
//! - This is a lossy, best-effort parse with no postal validation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Structured components of a pin address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    pub street: String,
    pub town: String,
    pub state: String,
    pub zip: String,
}

impl Display for AddressParts {
    /// Canonical display form: `"{street}, {town}, {state} {zip}"`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {} {}",
            self.street, self.town, self.state, self.zip
        )
    }
}

/// Splits a free-text address on commas into its four components.
///
/// Tokens are trimmed; missing trailing tokens become empty strings and
/// tokens beyond the fourth are dropped.
pub fn decompose(full_address: &str) -> AddressParts {
    let mut tokens = full_address.split(',').map(str::trim);
    AddressParts {
        street: tokens.next().unwrap_or("").to_string(),
        town: tokens.next().unwrap_or("").to_string(),
        state: tokens.next().unwrap_or("").to_string(),
        zip: tokens.next().unwrap_or("").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::decompose;

    #[test]
    fn decompose_full_address() {
        let parts = decompose("12 Elm St, Springfield, IL, 62704");

        assert_eq!(parts.street, "12 Elm St");
        assert_eq!(parts.town, "Springfield");
        assert_eq!(parts.state, "IL");
        assert_eq!(parts.zip, "62704");
    }

    #[test]
    fn display_reassembles_expected_format() {
        let parts = decompose("12 Elm St, Springfield, IL, 62704");
        assert_eq!(parts.to_string(), "12 Elm St, Springfield, IL 62704");
    }

    #[test]
    fn decompose_with_missing_components_leaves_trailing_fields_empty() {
        let parts = decompose("12 Elm St, Springfield");

        assert_eq!(parts.street, "12 Elm St");
        assert_eq!(parts.town, "Springfield");
        assert_eq!(parts.state, "");
        assert_eq!(parts.zip, "");
    }

    #[test]
    fn decompose_empty_input_is_all_empty() {
        let parts = decompose("");
        assert_eq!(parts, super::AddressParts::default());
    }

    #[test]
    fn decompose_drops_tokens_beyond_the_fourth() {
        let parts = decompose("12 Elm St, Apt 4, Springfield, IL, 62704");
        assert_eq!(parts.zip, "IL");
    }
}
