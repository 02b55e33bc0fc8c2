//! Locale conversions for quantities and tax ids
//!
//! Source documents write quantities with `.` as the decimal separator; the
//! exported tables use the Brazilian convention with `,`.

use std::num::IntErrorKind;

/// Convert a raw quantity to its display form (`1.234` -> `1,234`)
pub fn display_quantity(raw: &str) -> String {
    raw.replace('.', ",")
}

/// Integer units of a display quantity, used for aggregation only
///
/// Commas are dropped before parsing, so `1,234` counts as 1234. Blank or
/// unparsable values count as zero. Integers beyond the `i64` range clamp to
/// its bounds, like the saturating totals they feed.
pub fn quantity_units(display: &str) -> i64 {
    match display.replace(',', "").trim().parse::<i64>() {
        Ok(units) => units,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}

/// Escape a CNPJ so spreadsheet consumers keep it as text
pub fn escape_tax_id(raw: &str) -> String {
    if raw.is_empty() {
        String::new()
    } else {
        format!("'{}", raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quantity_swaps_decimal_point() {
        assert_eq!(display_quantity("1.234"), "1,234");
        assert_eq!(display_quantity("12"), "12");
        assert_eq!(display_quantity(""), "");
    }

    #[test]
    fn test_quantity_units() {
        assert_eq!(quantity_units("1,234"), 1234);
        assert_eq!(quantity_units("10"), 10);
        assert_eq!(quantity_units(" 7 "), 7);
        assert_eq!(quantity_units(""), 0);
        assert_eq!(quantity_units("abc"), 0);
    }

    #[test]
    fn test_out_of_range_quantity_clamps() {
        assert_eq!(quantity_units("99999999999999999999"), i64::MAX);
        assert_eq!(quantity_units("-99,999,999,999,999,999,999"), i64::MIN);
    }

    #[test]
    fn test_fractional_quantity_loses_separator() {
        // "10.5" displays as "10,5" and aggregates as 105
        assert_eq!(quantity_units(&display_quantity("10.5")), 105);
    }

    #[test]
    fn test_escape_tax_id() {
        assert_eq!(escape_tax_id("12345678000199"), "'12345678000199");
        assert_eq!(escape_tax_id(""), "");
    }
}
