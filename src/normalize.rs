//! City-name normalization
//!
//! CPTEC's city search matches plain lower-case ASCII-ish names, so every
//! query sent there (and every key stored in the lookup table) goes through
//! [`normalize_name`].

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lower-case and strip diacritics: `"São Paulo"` becomes `"sao paulo"`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    // lower-casing first: some lower-case mappings emit combining marks
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect()
}

/// URL slug used by the CPTEC site: `"São João del-Rei"` becomes `"sao-joao-del-rei"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in normalize_name(name).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
