//! URL-safe slug generation.

/// Turn a display name into a URL-safe slug.
///
/// Lowercases, collapses runs of non-alphanumeric characters into a single
/// `-`, and trims leading/trailing dashes. Mirrors how product slugs are
/// derived from names in the admin product form.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
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

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_dashes() {
        assert_eq!(slugify("Linen Shirt"), "linen-shirt");
    }

    #[test]
    fn collapses_symbol_runs() {
        assert_eq!(slugify("Mug — 12 oz. (Blue)"), "mug-12-oz-blue");
    }

    #[test]
    fn trims_edge_dashes() {
        assert_eq!(slugify("  Sale!  "), "sale");
    }

    #[test]
    fn empty_input_yields_empty_slug() {
        assert_eq!(slugify("!!!"), "");
    }
}
