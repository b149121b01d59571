//! Small text helpers shared by the admin write paths.

use unicode_normalization::UnicodeNormalization;

use crate::domain::DomainError;

/// URL slug: accents folded, lowercase ASCII alphanumerics separated by single hyphens.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.nfkd().filter(|c| c.is_ascii()) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Trimmed value of a required field, or a validation error naming it.
pub fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DomainError::validation(format!("{} is required", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trim an optional field; blank becomes `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Optional link: absolute http(s) URL or a path served by this site.
pub fn optional_url(field: &str, value: Option<String>) -> Result<Option<String>, DomainError> {
    match optional(value) {
        Some(url)
            if url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/') =>
        {
            Ok(Some(url))
        }
        Some(_) => Err(DomainError::validation(format!(
            "{} must be an http(s) URL",
            field
        ))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_accents_and_punctuation() {
        assert_eq!(slugify("Études: Light & Shadow"), "etudes-light-shadow");
        assert_eq!(slugify("  --Hello   World--  "), "hello-world");
        assert_eq!(slugify("Año 2024"), "ano-2024");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Ada ").unwrap(), "Ada");
        assert!(matches!(
            required("name", "   "),
            Err(DomainError::Validation(msg)) if msg == "name is required"
        ));
    }

    #[test]
    fn optional_url_accepts_site_paths() {
        assert_eq!(
            optional_url("image_url", Some("/storage/artworks/a.png".into())).unwrap(),
            Some("/storage/artworks/a.png".to_string())
        );
        assert_eq!(optional_url("image_url", Some("  ".into())).unwrap(), None);
        assert!(optional_url("image_url", Some("javascript:alert(1)".into())).is_err());
    }
}
