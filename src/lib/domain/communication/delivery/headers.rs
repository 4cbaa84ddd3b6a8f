//! Header sanitizing

/// Strip everything that could end a header line or start a new one.
///
/// CR, LF and the other ASCII control characters are removed (horizontal
/// tab is kept, it is valid folding whitespace) and the result is trimmed.
pub fn secure_header(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c == '\t' || !c.is_ascii_control())
        .collect::<String>()
        .trim()
        .to_string()
}
