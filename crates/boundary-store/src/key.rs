//! Join-key canonicalization.
//!
//! Both sides of a data join go through [`canonical_key`], so boundary names
//! and caller keys compare equal despite minor formatting differences:
//! - surrounding whitespace is trimmed and inner runs collapse to one space
//! - letters are lowercased
//! - the variant character `台` is folded to `臺`

/// Separator between the parts of a composite (multi-level) key.
pub const KEY_SEPARATOR: char = '/';

/// Canonical form of a single key part.
pub fn canonical_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace('台', "臺")
}

/// Canonical key built from parts ordered outermost first, e.g.
/// `["臺北市", "大安區"]` for a town.
pub fn composite_key<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| canonical_key(p.as_ref()))
        .collect::<Vec<_>>()
        .join(&KEY_SEPARATOR.to_string())
}

/// Canonical form of an already-joined key such as `"臺中市 / 南區"`.
/// Each part is canonicalized on its own, as in [`composite_key`].
pub fn canonical_joined_key(raw: &str) -> String {
    composite_key(&raw.split(KEY_SEPARATOR).collect::<Vec<_>>())
}
