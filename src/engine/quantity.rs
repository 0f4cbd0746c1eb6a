// ==========================================
// Reagent Inventory - Quantity parser
// ==========================================
// Free-form text → (value, unit) and back
// Accepted shape: [+-]digits[.digits][ ]*[letters]
// ==========================================

use crate::domain::{Quantity, QuantityUnit, Reagent};

/// Parses `"1,25 L"`, `"3 KG"`, `"500ml"`, `"12"`.
///
/// Unparseable input yields an empty quantity; unknown unit tokens
/// keep the value and drop the unit.
pub fn parse_quantity(raw: &str) -> Quantity {
    let text = raw.trim().replacen(',', ".", 1);
    if text.is_empty() {
        return Quantity::empty();
    }

    match split_number_and_unit(&text) {
        Some((number, unit_token)) => {
            let value = number.parse::<f64>().ok();
            let unit = unit_token.and_then(QuantityUnit::from_token);
            Quantity::new(value, unit)
        }
        None => Quantity::empty(),
    }
}

/// Returns the numeric prefix and optional unit token, or `None` when
/// the text does not match the accepted shape.
fn split_number_and_unit(text: &str) -> Option<(&str, Option<&str>)> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == int_start {
        return None;
    }

    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end == frac_start {
            return None;
        }
        pos = frac_end;
    }

    let number = &text[..pos];
    let rest = text[pos..].trim_start();
    if rest.is_empty() {
        return Some((number, None));
    }
    if rest.chars().all(char::is_alphabetic) {
        Some((number, Some(rest)))
    } else {
        None
    }
}

/// Rounds to 6 decimals so `0.1 + 0.2` renders as `0.3`.
pub fn format_value(value: f64) -> String {
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Display form of a reagent's stock.
///
/// Structured pair when both parts are present, legacy free text
/// otherwise, empty when neither exists.
pub fn format_quantity(reagent: &Reagent) -> String {
    match (reagent.quantity_value, reagent.quantity_unit) {
        (Some(value), Some(unit)) if value.is_finite() => {
            format!("{} {}", format_value(value), unit)
        }
        _ => reagent.legacy_quantity.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_decimal() {
        let q = parse_quantity("1,25 L");
        assert_eq!(q.value, Some(1.25));
        assert_eq!(q.unit, Some(QuantityUnit::Liter));
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert_eq!(parse_quantity(""), Quantity::empty());
        assert_eq!(parse_quantity("   "), Quantity::empty());
        assert_eq!(parse_quantity("abc"), Quantity::empty());
        assert_eq!(parse_quantity("1.5 L extra"), Quantity::empty());
        assert_eq!(parse_quantity(".5 L"), Quantity::empty());
        assert_eq!(parse_quantity("5. L"), Quantity::empty());
    }

    #[test]
    fn test_parse_unit_case_folding() {
        let q = parse_quantity("3 KG");
        assert_eq!(q.value, Some(3.0));
        assert_eq!(q.unit, Some(QuantityUnit::Kilogram));

        let q = parse_quantity("250ml");
        assert_eq!(q.value, Some(250.0));
        assert_eq!(q.unit, Some(QuantityUnit::Milliliter));
    }

    #[test]
    fn test_parse_unknown_or_missing_unit() {
        let q = parse_quantity("12 oz");
        assert_eq!(q.value, Some(12.0));
        assert_eq!(q.unit, None);

        let q = parse_quantity("-4");
        assert_eq!(q.value, Some(-4.0));
        assert_eq!(q.unit, None);
    }

    #[test]
    fn test_format_prefers_structured_pair() {
        let mut r = Reagent::new("X");
        r.set_quantity(Quantity::new(Some(1.5), Some(QuantityUnit::Liter)));
        r.legacy_quantity = Some("viejo".to_string());
        assert_eq!(format_quantity(&r), "1.5 L");
    }

    #[test]
    fn test_format_falls_back_to_legacy() {
        let mut r = Reagent::new("X");
        assert_eq!(format_quantity(&r), "");
        r.legacy_quantity = Some("2 frascos".to_string());
        assert_eq!(format_quantity(&r), "2 frascos");
    }

    #[test]
    fn test_format_rounds_noise() {
        assert_eq!(format_value(0.1 + 0.2), "0.3");
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(-0.0000001), "0");
    }

    #[test]
    fn test_round_trip() {
        let mut r = Reagent::new("X");
        r.set_quantity(Quantity::new(Some(1.5), Some(QuantityUnit::Liter)));
        let text = format_quantity(&r);
        assert_eq!(text, "1.5 L");
        assert_eq!(parse_quantity(&text), r.quantity());
    }
}
