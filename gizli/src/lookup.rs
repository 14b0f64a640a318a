//! Comparison allow-list for encrypted and search-token attributes.
//!
//! A search token only supports equality and null-check comparisons:
//! ordering, prefix, and range comparisons on a hash are meaningless. An
//! encrypted blob supports no comparisons at all, since ciphertext is never
//! comparable to plaintext. Anything else is rejected at configuration time
//! with an error naming the attribute and the operation.

use crate::error::Error;
use std::fmt;

/// The kind of stored artifact a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// The encrypted blob column
    Encrypted,
    /// The search-token column
    SearchToken,
}

/// The comparison operations a query layer might request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Exact equality
    Exact,
    /// Null check
    IsNull,
    /// Strictly less than
    LessThan,
    /// Less than or equal
    LessThanOrEqual,
    /// Strictly greater than
    GreaterThan,
    /// Greater than or equal
    GreaterThanOrEqual,
    /// Substring containment
    Contains,
    /// Prefix match
    StartsWith,
    /// Suffix match
    EndsWith,
    /// Membership in a value set
    In,
    /// Inclusive range
    Range,
}

impl Comparison {
    /// Returns the lookup name as a query layer would spell it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IsNull => "isnull",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "lte",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "gte",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::In => "in",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks whether `comparison` is permitted against an attribute of `kind`.
///
/// Permitted comparisons are a static allow-list: search tokens accept
/// `Exact` and `IsNull`; encrypted attributes accept nothing.
///
/// # Errors
///
/// Returns `Error::UnsupportedLookup` naming the attribute and the rejected
/// operation.
///
/// # Example
///
/// ```
/// use gizli::lookup::{check_comparison, AttributeKind, Comparison};
///
/// check_comparison("email_token", AttributeKind::SearchToken, Comparison::Exact).unwrap();
/// assert!(check_comparison("email", AttributeKind::Encrypted, Comparison::Exact).is_err());
/// ```
pub fn check_comparison(
    attribute: &str,
    kind: AttributeKind,
    comparison: Comparison,
) -> Result<(), Error> {
    let permitted = match kind {
        AttributeKind::Encrypted => false,
        AttributeKind::SearchToken => {
            matches!(comparison, Comparison::Exact | Comparison::IsNull)
        }
    };
    if permitted {
        Ok(())
    } else {
        Err(Error::UnsupportedLookup {
            attribute: attribute.to_string(),
            operation: comparison.to_string(),
        })
    }
}
