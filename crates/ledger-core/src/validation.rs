//! # Validation Module
//!
//! Input validation for numbering administration and generation.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (ledger-api)                                    │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── branch id, mode, next number, manual id rules                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (branch_id, doc_type)                                      │
//! │  └── partial UNIQUE (branch_id, <number>) WHERE is_deleted = 0         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates and trims a branch identifier.
///
/// ## Example
/// ```rust
/// use ledger_core::validation::validate_branch_id;
///
/// assert_eq!(validate_branch_id(" b-1 ").unwrap(), "b-1");
/// assert!(validate_branch_id("   ").is_err());
/// ```
pub fn validate_branch_id(branch_id: &str) -> ValidationResult<String> {
    let branch_id = branch_id.trim();

    if branch_id.is_empty() {
        return Err(ValidationError::Required {
            field: "branchId".to_string(),
        });
    }

    Ok(branch_id.to_string())
}

/// Validates a caller-supplied document number for Manual mode.
///
/// ## Rules
/// - Missing, empty and whitespace-only ids are rejected
/// - Surrounding whitespace is trimmed from the returned id
///
/// ## Example
/// ```rust
/// use ledger_core::validation::validate_manual_id;
///
/// assert_eq!(validate_manual_id(Some("  INV-99  ")).unwrap(), "INV-99");
/// assert!(validate_manual_id(Some(" ")).is_err());
/// assert!(validate_manual_id(None).is_err());
/// ```
pub fn validate_manual_id(manual_id: Option<&str>) -> ValidationResult<String> {
    let id = manual_id.map(str::trim).unwrap_or_default();

    if id.is_empty() {
        return Err(ValidationError::ManualIdRequired);
    }

    Ok(id.to_string())
}

// =============================================================================
// Setting Validators
// =============================================================================

/// Parses the Auto-mode starting number.
///
/// ## Rules
/// - Must be present and non-blank
/// - Only ASCII digits (no sign, no exponent, no decimals)
/// - Value must be >= 1 and fit in an `i64`
///
/// ## Returns
/// `(raw, value)`: the trimmed raw string (its length sets the padding width)
/// and its numeric value.
///
/// ## Example
/// ```rust
/// use ledger_core::validation::parse_next_number;
///
/// assert_eq!(parse_next_number(Some("00007")).unwrap(), ("00007".to_string(), 7));
/// assert!(parse_next_number(Some("abc")).is_err());
/// assert!(parse_next_number(Some("000")).is_err());
/// ```
pub fn parse_next_number(next_number: Option<&str>) -> ValidationResult<(String, i64)> {
    let raw = next_number.map(str::trim).unwrap_or_default();

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidNextNumber);
    }

    let value: i64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidNextNumber)?;

    if value < 1 {
        return Err(ValidationError::InvalidNextNumber);
    }

    Ok((raw.to_string(), value))
}

/// Resolves the prefix to store: omitted or blank → `default`, otherwise
/// the trimmed value.
///
/// ## Example
/// ```rust
/// use ledger_core::validation::resolve_prefix;
///
/// assert_eq!(resolve_prefix(Some("  "), "QT-"), "QT-");
/// assert_eq!(resolve_prefix(Some(" EST- "), "QT-"), "EST-");
/// ```
pub fn resolve_prefix(prefix: Option<&str>, default: &str) -> String {
    match prefix.map(str::trim) {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => default.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_branch_id() {
        assert_eq!(validate_branch_id("branch-1").unwrap(), "branch-1");
        assert!(validate_branch_id("").is_err());
        assert!(validate_branch_id("  \t").is_err());
    }

    #[test]
    fn test_validate_manual_id() {
        assert_eq!(validate_manual_id(Some("  INV-99  ")).unwrap(), "INV-99");
        assert_eq!(validate_manual_id(Some("Q/2024/1")).unwrap(), "Q/2024/1");

        for missing in [None, Some(""), Some("   "), Some("\n\t")] {
            assert!(matches!(
                validate_manual_id(missing),
                Err(ValidationError::ManualIdRequired)
            ));
        }

        // Any length is accepted
        let long = format!("INV-{}", "9".repeat(70));
        assert_eq!(validate_manual_id(Some(&long)).unwrap(), long);
    }

    #[test]
    fn test_parse_next_number() {
        assert_eq!(parse_next_number(Some("1")).unwrap(), ("1".to_string(), 1));
        assert_eq!(
            parse_next_number(Some(" 0009 ")).unwrap(),
            ("0009".to_string(), 9)
        );

        for bad in [None, Some(""), Some("abc"), Some("0"), Some("-3"), Some("1.5"), Some("1e3"), Some("+4")] {
            assert!(
                matches!(parse_next_number(bad), Err(ValidationError::InvalidNextNumber)),
                "{bad:?} should be rejected"
            );
        }

        // Larger than i64
        assert!(parse_next_number(Some("99999999999999999999")).is_err());
    }

    #[test]
    fn test_resolve_prefix() {
        assert_eq!(resolve_prefix(None, "QT-"), "QT-");
        assert_eq!(resolve_prefix(Some("   "), "QT-"), "QT-");
        assert_eq!(resolve_prefix(Some(" EST- "), "QT-"), "EST-");
        assert_eq!(
            resolve_prefix(Some("ACME-HEADQUARTERS-INV-"), "INV-"),
            "ACME-HEADQUARTERS-INV-"
        );
    }
}
