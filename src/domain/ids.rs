/// Canonical form of a document identifier: trimmed, and with leading zeros
/// stripped when the identifier is purely numeric. Non-numeric identifiers
/// are only trimmed, so "A123" never collides with "123".
pub fn canonical(id: &str) -> &str {
    let trimmed = id.trim();
    if !trimmed.is_empty() && is_all_digits(trimmed) {
        strip_leading_zeros(trimmed)
    } else {
        trimmed
    }
}

/// The single identifier predicate used by every lookup. Legacy records
/// zero-pad numeric keys inconsistently ("00123" vs "123"), so two numeric
/// identifiers match on their unpadded value; anything else matches exactly.
pub fn identifiers_match(a: &str, b: &str) -> bool {
    canonical(a) == canonical(b)
}

fn is_all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn strip_leading_zeros(s: &str) -> &str {
    let stripped = s.trim_start_matches('0');
    if stripped.is_empty() { "0" } else { stripped }
}
