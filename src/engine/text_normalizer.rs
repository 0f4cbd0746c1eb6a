// ==========================================
// Reagent Inventory - Text normalizer
// ==========================================
// Diacritic-insensitive search keys and natural ordering
// Total functions: no error paths
// ==========================================

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// NFD-decomposes and drops combining marks (`"Ácido"` → `"Acido"`).
pub fn strip_diacritics(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Search key: trim, lower-case, NFD, strip combining marks.
///
/// Only used for substring containment, never displayed.
pub fn normalize_for_search(input: &str) -> String {
    strip_diacritics(&input.trim().to_lowercase())
}

/// `None` behaves like the empty string.
pub fn normalize_optional(input: Option<&str>) -> String {
    normalize_for_search(input.unwrap_or(""))
}

// ==========================================
// Natural comparison
// ==========================================
// Base-level collation: case and accents ignored, digit runs
// compared by numeric value ("item2" < "item10").

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Digits(String),
    Char(char),
}

fn segments(input: &str) -> Vec<Segment> {
    let folded = strip_diacritics(input).to_lowercase();
    let mut out = Vec::new();
    let mut digits = String::new();

    for c in folded.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if !digits.is_empty() {
            out.push(Segment::Digits(std::mem::take(&mut digits)));
        }
        out.push(Segment::Char(c));
    }
    if !digits.is_empty() {
        out.push(Segment::Digits(digits));
    }
    out
}

/// Primary weight class: whitespace/punctuation < digits < letters < other.
fn char_class(c: char) -> u8 {
    if c.is_whitespace() || c.is_ascii_punctuation() {
        0
    } else if c.is_alphabetic() {
        2
    } else {
        3
    }
}

const DIGIT_CLASS: u8 = 1;

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_segments(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Digits(x), Segment::Digits(y)) => compare_digit_runs(x, y),
        (Segment::Digits(_), Segment::Char(c)) => DIGIT_CLASS.cmp(&char_class(*c)),
        (Segment::Char(c), Segment::Digits(_)) => char_class(*c).cmp(&DIGIT_CLASS),
        (Segment::Char(x), Segment::Char(y)) => {
            char_class(*x).cmp(&char_class(*y)).then_with(|| x.cmp(y))
        }
    }
}

/// Locale-style natural comparison used by every sortable column.
pub fn natural_compare(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);

    for (x, y) in left.iter().zip(right.iter()) {
        let ord = compare_segments(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}
