// Utility functions
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds a categorical label into a lookup key: accents stripped, lower-cased,
/// separators dropped. `"Liège"`, `"LIEGE"` and `"li-ege"` all fold to `"liege"`.
pub fn fold_key(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Converts a field name to kebab-case: `bathroomCount` and `bathroom_count`
/// both become `bathroom-count`.
pub fn to_kebab_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev_lower = false;
    for c in text.trim().chars() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Upper-cases an enum label and turns `_`/`-` into spaces, collapsing runs of
/// whitespace, so `to_renovate` reads as `TO RENOVATE`.
pub fn normalize_enum_label(text: &str) -> String {
    text.replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_key_strips_accents_and_separators() {
        assert_eq!(fold_key("Liège"), "liege");
        assert_eq!(fold_key("Liege"), "liege");
        assert_eq!(fold_key("Brussels-Capital Region"), "brusselscapitalregion");
        assert_eq!(fold_key("FLAT_STUDIO"), "flatstudio");
        assert_eq!(fold_key("  A+ "), "a+");
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("bathroomCount"), "bathroom-count");
        assert_eq!(to_kebab_case("hasPhotovoltaicPanels"), "has-photovoltaic-panels");
        assert_eq!(to_kebab_case("rooms_number"), "rooms-number");
        assert_eq!(to_kebab_case("zip-code"), "zip-code");
        assert_eq!(to_kebab_case("area"), "area");
    }

    #[test]
    fn test_normalize_enum_label() {
        assert_eq!(normalize_enum_label("to_renovate"), "TO RENOVATE");
        assert_eq!(normalize_enum_label(" Just-Renovated "), "JUST RENOVATED");
        assert_eq!(normalize_enum_label("house"), "HOUSE");
    }
}
