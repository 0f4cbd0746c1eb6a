// ==========================================
// Reagent Inventory - Flexible CSV tokenizer
// ==========================================
// Line-oriented: text is split into lines before quote handling,
// so quoted fields cannot span lines.
// Delimiter: explicit, else `;` when the header line has `;` and no `,`.
// ==========================================

use std::collections::HashMap;

/// One data row keyed by lower-cased header.
pub type CsvRow = HashMap<String, String>;

const QUOTE: char = '"';

/// Parses `text` into header → cell mappings.
///
/// Blank lines are dropped wherever they appear. Missing trailing cells map
/// to `""`; cells beyond the header count are ignored. Never fails.
pub fn parse_csv(text: &str, explicit_delimiter: Option<char>) -> Vec<CsvRow> {
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let header_line = match lines.next() {
        Some(line) => line,
        None => return Vec::new(),
    };

    let delimiter = explicit_delimiter.unwrap_or_else(|| detect_delimiter(header_line));
    let headers: Vec<String> = tokenize_line(header_line, delimiter)
        .iter()
        .map(|h| unquote(h).trim().to_lowercase())
        .collect();

    lines
        .map(|line| {
            let cells = tokenize_line(line, delimiter);
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let cell = cells.get(i).map(|raw| unquote(raw)).unwrap_or_default();
                    (header.clone(), cell)
                })
                .collect()
        })
        .collect()
}

/// `;` when the line has a semicolon and no comma, else `,`.
pub fn detect_delimiter(first_line: &str) -> char {
    if first_line.contains(';') && !first_line.contains(',') {
        ';'
    } else {
        ','
    }
}

/// Splits one line on `delimiter`, honouring quoted regions.
/// Returned tokens are raw: quotes are kept for `unquote`.
pub fn tokenize_line(line: &str, delimiter: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == QUOTE {
            if in_quotes && chars.peek() == Some(&QUOTE) {
                // escaped quote: keep both so unquote can collapse them
                current.push(QUOTE);
                current.push(QUOTE);
                chars.next();
            } else {
                in_quotes = !in_quotes;
                current.push(QUOTE);
            }
        } else if c == delimiter && !in_quotes {
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    tokens.push(current);
    tokens
}

/// Trims, strips one pair of wrapping quotes, collapses `""` to `"`.
pub fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = if trimmed.len() >= 2 && trimmed.starts_with(QUOTE) && trimmed.ends_with(QUOTE) {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    inner.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_inside_quotes_does_not_split() {
        let rows = parse_csv("nombre,lugar\n\"Acido, Fuerte\",204\n", None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["nombre"], "Acido, Fuerte");
        assert_eq!(rows[0]["lugar"], "204");
    }

    #[test]
    fn test_semicolon_detected_and_escaped_quote() {
        let rows = parse_csv("a;b\n\"x\"\"y\";z", None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["a"], "x\"y");
        assert_eq!(rows[0]["b"], "z");
    }

    #[test]
    fn test_comma_wins_when_both_present() {
        assert_eq!(detect_delimiter("a;b,c"), ',');
        assert_eq!(detect_delimiter("a;b"), ';');
        assert_eq!(detect_delimiter("a"), ',');
    }

    #[test]
    fn test_explicit_delimiter_overrides_detection() {
        let rows = parse_csv("a\tb\n1\t2", Some('\t'));
        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], "2");
    }

    #[test]
    fn test_headers_lowercased_and_trimmed() {
        let rows = parse_csv(" Nombre , \"LUGAR\"\r\nx,y\r\n", None);
        assert_eq!(rows[0]["nombre"], "x");
        assert_eq!(rows[0]["lugar"], "y");
    }

    #[test]
    fn test_blank_lines_dropped_and_short_rows_padded() {
        let rows = parse_csv("a,b,c\n\n   \n1\n2,3,4,5\n", None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], "");
        assert_eq!(rows[0]["c"], "");
        assert_eq!(rows[1]["c"], "4");
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_empty_and_header_only_input() {
        assert!(parse_csv("", None).is_empty());
        assert!(parse_csv("\n\r\n", None).is_empty());
        assert!(parse_csv("nombre,lugar\n", None).is_empty());
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("  \"a\"\"b\"  "), "a\"b");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("\"\""), "");
    }
}
