//! Quote-aware splitting of sheet text into rows of fields
//!
//! A `"` toggles the in-quotes state and is not copied into the field, so a
//! comma inside a quoted span stays part of the field. An unterminated quote
//! swallows the rest of the line into one field. There is no failure case.

const BOM: char = '\u{FEFF}';

/// Split one line into trimmed fields
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(clean_field(&std::mem::take(&mut current))),
            _ => current.push(ch),
        }
    }
    fields.push(clean_field(&current));
    fields
}

/// Strip a leading BOM, split on LF/CRLF, drop blank lines, and tokenize the rest
pub fn split_rows(content: &str) -> Vec<Vec<String>> {
    content
        .strip_prefix(BOM)
        .unwrap_or(content)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(split_line)
        .collect()
}

/// Trim, then remove at most one leading and one trailing double quote
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}
