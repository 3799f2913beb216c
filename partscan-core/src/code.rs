/// Normalize a raw part code for catalog keying.
///
/// Strips every hyphen and whitespace character and uppercases the rest.
/// All other characters pass through unchanged. Empty input stays empty;
/// callers treat an empty result as "no code" and must skip insertion and
/// lookup.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}
