/// True if `s` has at least one whitespace character.
pub fn contains_whitespace(s: &str) -> bool {
    s.chars().any(char::is_whitespace)
}

/// True if `s` is empty or only whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
