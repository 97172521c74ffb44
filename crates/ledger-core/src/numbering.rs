//! # Numbering Rules
//!
//! Pure functions behind document-number generation. The database layer
//! loads and stores [`NumberSetting`]s; everything that decides *what* the
//! number is lives here.
//!
//! ## Auto-Mode Formatting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NumberSetting { prefix: "INV-", next_number: 7, next_number_raw: "00007" }
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CounterState::of(setting)                                             │
//! │       numeric = 7, width = len("00007") = 5                            │
//! │       │                                                                 │
//! │       ├── document_number() → "INV-" + "00007" = "INV-00007"           │
//! │       │                                                                 │
//! │       └── advance()         → numeric = 8, raw = "00008"               │
//! │                                                                         │
//! │  Width is a minimum: numeric 100 at width 2 pads to "100", never "00". │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::types::{DocType, NumberMode, NumberPreview, NumberSetting, SettingUpdate};
use crate::validation::{parse_next_number, resolve_prefix, ValidationResult};

/// Raw counter shown by the preview for an unconfigured branch/doc type.
pub const DEFAULT_NEXT_NUMBER_RAW: &str = "00001";

/// Left-pads `value` with zeros to at least `width` characters.
///
/// ## Example
/// ```rust
/// use ledger_core::numbering::zero_pad;
///
/// assert_eq!(zero_pad(7, 5), "00007");
/// assert_eq!(zero_pad(100, 2), "100");
/// ```
pub fn zero_pad(value: i64, width: usize) -> String {
    format!("{:0>width$}", value, width = width)
}

// =============================================================================
// Counter State
// =============================================================================

/// Resolved Auto-mode counter: the value to issue and its padding width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    /// Value that will be issued next.
    pub numeric: i64,
    /// Zero-padded string form; `raw.len()` was the width source.
    pub raw: String,
    /// Minimum number of digits.
    pub width: usize,
}

impl CounterState {
    /// Resolves the counter from the stored columns.
    ///
    /// ## Fallbacks
    /// ```text
    /// raw     = next_number_raw  → string of next_number → "1"
    /// numeric = next_number      → parse(raw)            → 1
    /// width   = len(raw)
    /// ```
    /// An empty stored raw string counts as absent.
    pub fn from_stored(next_number: Option<i64>, next_number_raw: Option<&str>) -> Self {
        let raw = next_number_raw
            .filter(|raw| !raw.is_empty())
            .map(str::to_string)
            .or_else(|| next_number.map(|n| n.to_string()))
            .unwrap_or_else(|| "1".to_string());

        let numeric = next_number
            .or_else(|| raw.trim().parse().ok())
            .unwrap_or(1);

        let width = raw.chars().count();

        CounterState { numeric, raw, width }
    }

    /// Resolves the counter of a stored setting.
    pub fn of(setting: &NumberSetting) -> Self {
        CounterState::from_stored(setting.next_number, setting.next_number_raw.as_deref())
    }

    /// The numeric part of the next document number.
    pub fn padded(&self) -> String {
        zero_pad(self.numeric, self.width)
    }

    /// The full document number for `prefix`.
    pub fn document_number(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.padded())
    }

    /// Counter after issuing the current value. The width never changes.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::numbering::CounterState;
    ///
    /// let next = CounterState::from_stored(Some(9), Some("0009")).advance().unwrap();
    /// assert_eq!(next.raw, "0010");
    /// ```
    pub fn advance(&self) -> CoreResult<CounterState> {
        let numeric = self
            .numeric
            .checked_add(1)
            .ok_or(CoreError::CounterExhausted)?;

        Ok(CounterState {
            numeric,
            raw: zero_pad(numeric, self.width),
            width: self.width,
        })
    }
}

// =============================================================================
// Administration
// =============================================================================

/// Validates administrator input and computes the fields to store.
///
/// ## Rules
/// - Auto: `next_number` must parse (see [`parse_next_number`]); the trimmed
///   raw string is kept so its length sets the padding width
/// - Manual: the counter is cleared
/// - Both: blank/omitted prefix falls back to [`DocType::default_prefix`]
pub fn plan_setting_update(
    doc_type: DocType,
    mode: NumberMode,
    prefix: Option<&str>,
    next_number: Option<&str>,
) -> ValidationResult<SettingUpdate> {
    let prefix = resolve_prefix(prefix, doc_type.default_prefix());

    match mode {
        NumberMode::Auto => {
            let (raw, value) = parse_next_number(next_number)?;
            Ok(SettingUpdate {
                mode,
                prefix,
                next_number: Some(value),
                next_number_raw: Some(raw),
            })
        }
        NumberMode::Manual => Ok(SettingUpdate {
            mode,
            prefix,
            next_number: None,
            next_number_raw: None,
        }),
    }
}

/// Builds the preview for a doc type from its setting, if any.
///
/// Unconfigured pairs get a synthesized Auto preview starting at
/// [`DEFAULT_NEXT_NUMBER_RAW`].
pub fn preview(doc_type: DocType, setting: Option<&NumberSetting>) -> NumberPreview {
    let (prefix, mode, counter) = match setting {
        Some(setting) => (setting.prefix.clone(), setting.mode, CounterState::of(setting)),
        None => (
            doc_type.default_prefix().to_string(),
            NumberMode::Auto,
            CounterState::from_stored(None, Some(DEFAULT_NEXT_NUMBER_RAW)),
        ),
    };

    NumberPreview {
        doc_type,
        generated_id: counter.document_number(&prefix),
        prefix,
        next_number: counter.numeric,
        next_number_raw: counter.raw,
        mode,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::Utc;

    fn auto_setting(prefix: &str, next: Option<i64>, raw: Option<&str>) -> NumberSetting {
        NumberSetting {
            id: "setting-1".to_string(),
            branch_id: "branch-1".to_string(),
            doc_type: DocType::Invoice,
            mode: NumberMode::Auto,
            prefix: prefix.to_string(),
            next_number: next,
            next_number_raw: raw.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_zero_pad_is_minimum_width() {
        assert_eq!(zero_pad(7, 5), "00007");
        assert_eq!(zero_pad(12345, 5), "12345");
        assert_eq!(zero_pad(100, 2), "100");
        assert_eq!(zero_pad(3, 0), "3");
    }

    #[test]
    fn test_document_number_from_setting() {
        let setting = auto_setting("INV-", Some(7), Some("00007"));
        let counter = CounterState::of(&setting);
        assert_eq!(counter.document_number(&setting.prefix), "INV-00007");

        let next = counter.advance().unwrap();
        assert_eq!(next.numeric, 8);
        assert_eq!(next.raw, "00008");
    }

    #[test]
    fn test_width_survives_power_of_ten() {
        let next = CounterState::from_stored(Some(9), Some("0009")).advance().unwrap();
        assert_eq!(next.raw, "0010");

        let next = CounterState::from_stored(Some(99), Some("0099")).advance().unwrap();
        assert_eq!(next.raw, "0100");
        assert_eq!(next.width, 4);

        // Width 2 overflowing to 3 digits is not truncated
        let next = CounterState::from_stored(Some(99), Some("99")).advance().unwrap();
        assert_eq!(next.raw, "100");
        assert_eq!(next.width, 2);
        assert_eq!(next.advance().unwrap().raw, "101");
    }

    #[test]
    fn test_sequential_advance_is_monotonic() {
        let mut counter = CounterState::from_stored(Some(1), Some("001"));
        let mut issued = Vec::new();
        for _ in 0..12 {
            issued.push(counter.document_number("SO-"));
            counter = counter.advance().unwrap();
        }
        assert_eq!(issued[0], "SO-001");
        assert_eq!(issued[9], "SO-010");
        assert_eq!(issued[11], "SO-012");
        assert_eq!(counter.numeric, 13);
    }

    #[test]
    fn test_stored_fallbacks() {
        // Raw missing: width comes from the numeric value
        let counter = CounterState::from_stored(Some(42), None);
        assert_eq!((counter.numeric, counter.raw.as_str(), counter.width), (42, "42", 2));

        // Numeric missing: parsed from raw
        let counter = CounterState::from_stored(None, Some("0005"));
        assert_eq!((counter.numeric, counter.width), (5, 4));

        // Both missing
        let counter = CounterState::from_stored(None, None);
        assert_eq!((counter.numeric, counter.raw.as_str()), (1, "1"));

        // Empty raw behaves as missing
        let counter = CounterState::from_stored(Some(3), Some(""));
        assert_eq!(counter.raw, "3");

        // Numeric wins over raw, raw still sets the width
        let counter = CounterState::from_stored(Some(9), Some("00007"));
        assert_eq!(counter.padded(), "00009");
    }

    #[test]
    fn test_advance_overflow() {
        let counter = CounterState::from_stored(Some(i64::MAX), None);
        assert!(matches!(counter.advance(), Err(CoreError::CounterExhausted)));
    }

    #[test]
    fn test_plan_auto_update() {
        let update =
            plan_setting_update(DocType::Invoice, NumberMode::Auto, Some(" INV/ "), Some("00042"))
                .unwrap();
        assert_eq!(update.prefix, "INV/");
        assert_eq!(update.next_number, Some(42));
        assert_eq!(update.next_number_raw.as_deref(), Some("00042"));

        let update =
            plan_setting_update(DocType::SaleOrder, NumberMode::Auto, None, Some("1")).unwrap();
        assert_eq!(update.prefix, "SO-");
    }

    #[test]
    fn test_plan_auto_requires_next_number() {
        for bad in [None, Some("abc"), Some("0")] {
            assert!(matches!(
                plan_setting_update(DocType::Invoice, NumberMode::Auto, None, bad),
                Err(ValidationError::InvalidNextNumber)
            ));
        }
    }

    #[test]
    fn test_plan_manual_clears_counter() {
        let update =
            plan_setting_update(DocType::Quote, NumberMode::Manual, None, Some("00010")).unwrap();
        assert_eq!(update.prefix, "QT-");
        assert_eq!(update.next_number, None);
        assert_eq!(update.next_number_raw, None);
    }

    #[test]
    fn test_preview_unconfigured() {
        let preview = preview(DocType::Quote, None);
        assert_eq!(preview.generated_id, "QT-00001");
        assert_eq!(preview.next_number, 1);
        assert_eq!(preview.next_number_raw, "00001");
        assert_eq!(preview.mode, NumberMode::Auto);
    }

    #[test]
    fn test_preview_configured() {
        let setting = auto_setting("INV-", Some(7), Some("00007"));
        let preview = preview(DocType::Invoice, Some(&setting));
        assert_eq!(preview.generated_id, "INV-00007");
        assert_eq!(preview.prefix, "INV-");
        assert_eq!(preview.next_number, 7);
    }

    #[test]
    fn test_preview_serializes_camel_case() {
        let json = serde_json::to_value(preview(DocType::Invoice, None)).unwrap();
        assert_eq!(json["docType"], "INVOICE");
        assert_eq!(json["generatedId"], "INV-00001");
        assert_eq!(json["nextNumberRaw"], "00001");
        assert_eq!(json["mode"], "Auto");
    }
}
