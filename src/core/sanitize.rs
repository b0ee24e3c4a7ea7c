// src/core/sanitize.rs

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Currency codes are compared and stored upper-case, without padding.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Reduce a cell to something `f64::from_str` accepts, or `None` if it isn't a
/// plain decimal. Thousands separators (`,` between digits) are dropped; an optional leading
/// sign and a single `.` are allowed. Exponents, `%`, `inf`/`NaN` are rejected.
pub fn numeric_text(s: &str) -> Option<String> {
    let s = s.trim();
    let mut out = String::with_capacity(s.len());
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, ch) in s.char_indices() {
        match ch {
            '0'..='9' => { out.push(ch); seen_digit = true; }
            '.' if !seen_dot => { out.push(ch); seen_dot = true; }
            ',' if seen_digit && !seen_dot && s[i + 1..].starts_with(|c: char| c.is_ascii_digit()) => {}
            '-' | '+' if i == 0 => out.push(ch),
            _ => return None,
        }
    }
    if seen_digit { Some(out) } else { None }
}
