//! Slug generation for public identifiers.

use uuid::Uuid;

/// Lowercase, hyphen-separated ASCII slug with a short random suffix.
///
/// Non-ASCII letters are dropped rather than transliterated.
pub fn slugify(text: &str) -> String {
    let mut base = String::with_capacity(text.len());
    let mut last_dash = true;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            base.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            base.push('-');
            last_dash = true;
        }
    }
    let base = base.trim_end_matches('-');
    let suffix = &Uuid::new_v4().simple().to_string()[..6];
    if base.is_empty() {
        suffix.to_string()
    } else {
        format!("{base}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_shape() {
        let slug = slugify("  Pista Central #1 ");
        assert!(slug.starts_with("pista-central-1-"));
        assert_eq!(slug.len(), "pista-central-1-".len() + 6);
    }

    #[test]
    fn empty_input_gets_suffix_only() {
        assert_eq!(slugify("¡¿").len(), 6);
    }
}
