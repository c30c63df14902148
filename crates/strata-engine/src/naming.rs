//! Identifier assignment for top-level objects.

/// How an identifier request was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Naming {
    /// The requested identifier was granted verbatim.
    Exact,
    /// The requested identifier was unavailable; a unique one was made up.
    Synthesized,
}

/// Requested identifiers shorter than this are always synthesized.
pub const MIN_EXACT_LEN: usize = 2;

/// The base a synthesized identifier is built from.
///
/// A trailing two-digit number is stripped (`"Foo01"` → `"Foo"`); ids
/// shorter than [`MIN_EXACT_LEN`] fall back to `type_name`.
pub fn base_name<'a>(requested: &'a str, type_name: &'a str) -> &'a str {
    let mut tail = requested.char_indices().rev();
    match (tail.next(), tail.next()) {
        (Some((_, last)), Some((start, prev))) => {
            if prev.is_ascii_digit() && last.is_ascii_digit() {
                &requested[..start]
            } else {
                requested
            }
        }
        _ => type_name,
    }
}

/// Pick an identifier for `requested`, consulting `taken` for conflicts.
///
/// `requested` is granted when it is free and at least
/// [`MIN_EXACT_LEN`] characters long. Otherwise the result is
/// [`base_name`] followed by the smallest free counter, formatted with
/// at least two digits and starting at 1.
pub fn unique_name(requested: &str, type_name: &str, taken: impl Fn(&str) -> bool) -> (String, Naming) {
    if requested.chars().count() >= MIN_EXACT_LEN && !taken(requested) {
        return (requested.to_string(), Naming::Exact);
    }
    let base = base_name(requested, type_name);
    let mut n: u64 = 1;
    loop {
        let candidate = format!("{base}{n:02}");
        if !taken(&candidate) {
            return (candidate, Naming::Synthesized);
        }
        n += 1;
    }
}
