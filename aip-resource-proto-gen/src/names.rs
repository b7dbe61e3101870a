//! Name derivation
//!
//! Pure functions turning a [`ResourceConfig`] into the identifiers used
//! throughout the generated schema: collection identifier, resource type,
//! name pattern, URL references and casing variants.

use heck::{ToLowerCamelCase, ToSnakeCase};

use crate::config::ResourceConfig;

impl ResourceConfig {
    /// Plural resource name, defaulting to the singular name plus "s"
    pub fn plural(&self) -> String {
        match &self.plural {
            Some(plural) if !plural.is_empty() => plural.clone(),
            _ => format!("{}s", self.resource),
        }
    }

    /// Whether a parent pattern is configured
    pub fn has_parent(&self) -> bool {
        self.parent_pattern.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Collection identifier, the lowerCamelCase plural (e.g., "bookShelves")
    pub fn collection_identifier(&self) -> String {
        self.plural().to_lower_camel_case()
    }

    /// lowerCamelCase singular, used by the resource descriptor
    pub fn singular(&self) -> String {
        self.resource.to_lower_camel_case()
    }

    /// AIP resource type (e.g., "library.example.com/Book")
    pub fn resource_type_name(&self) -> String {
        format!("{}/{}", self.service, self.resource)
    }

    /// snake_case singular, used as field name
    pub fn resource_snake_case(&self) -> String {
        self.resource.to_snake_case()
    }

    /// snake_case plural, used as the List response field name
    pub fn plural_resource_snake_case(&self) -> String {
        self.plural().to_snake_case()
    }

    /// Canonical resource name template
    ///
    /// `publishers/{publisher}/books/{book}` with a parent, `books/{book}`
    /// without one.
    pub fn name_pattern(&self) -> String {
        let own = format!(
            "{}/{{{}}}",
            self.collection_identifier(),
            self.resource_snake_case()
        );
        match self.parent_pattern.as_deref() {
            Some(parent) if !parent.is_empty() => format!("{parent}/{own}"),
            _ => own,
        }
    }

    /// The name pattern with every placeholder replaced by `*`
    pub fn name_url_ref(&self) -> String {
        url_ref(&self.name_pattern())
    }

    /// The parent pattern with every placeholder replaced by `*`
    pub fn parent_url_ref(&self) -> Option<String> {
        self.parent_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(url_ref)
    }

    /// Name of the generated file (e.g., "book_shelf.proto")
    pub fn file_name(&self) -> String {
        format!("{}.proto", self.resource_snake_case())
    }

    /// Name of the generated service (e.g., "BookService")
    pub fn service_name(&self) -> String {
        format!("{}Service", self.resource)
    }
}

/// Replace every `{...}` placeholder of a pattern with `*`
///
/// Placeholders are replaced independently from left to right. Empty `{}`
/// pairs and unterminated `{` are left untouched.
pub fn url_ref(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if close > 0 => {
                out.push('*');
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> ResourceConfig {
        ResourceConfig::new("Book", "library.v1", "library.example.com")
    }

    #[test]
    fn test_plural_defaults_to_singular_plus_s() {
        let cfg = book();
        assert_eq!(cfg.plural(), "Books");
        assert_eq!(cfg.collection_identifier(), "books");
        assert_eq!(cfg.plural_resource_snake_case(), "books");
    }

    #[test]
    fn test_plural_override() {
        let mut cfg = ResourceConfig::new("BookShelf", "library.v1", "library.example.com");
        cfg.plural = Some("BookShelves".to_string());
        assert_eq!(cfg.collection_identifier(), "bookShelves");
        assert_eq!(cfg.plural_resource_snake_case(), "book_shelves");
        assert_eq!(cfg.resource_snake_case(), "book_shelf");
        assert_eq!(cfg.singular(), "bookShelf");
    }

    #[test]
    fn test_resource_type_name() {
        assert_eq!(book().resource_type_name(), "library.example.com/Book");
    }

    #[test]
    fn test_name_pattern_without_parent() {
        let cfg = book();
        assert_eq!(cfg.name_pattern(), "books/{book}");
        assert_eq!(cfg.name_url_ref(), "books/*");
        assert_eq!(cfg.parent_url_ref(), None);
    }

    #[test]
    fn test_name_pattern_with_parent() {
        let mut cfg = book();
        cfg.parent_pattern = Some("publishers/{publisher}".to_string());
        assert_eq!(cfg.name_pattern(), "publishers/{publisher}/books/{book}");
        assert_eq!(cfg.name_url_ref(), "publishers/*/books/*");
        assert_eq!(cfg.parent_url_ref().as_deref(), Some("publishers/*"));
    }

    #[test]
    fn test_empty_parent_is_no_parent() {
        let mut cfg = book();
        cfg.parent_pattern = Some(String::new());
        assert!(!cfg.has_parent());
        assert_eq!(cfg.name_pattern(), "books/{book}");
    }

    #[test]
    fn test_url_ref_replaces_each_placeholder() {
        let pattern = "shelves/{shelf}/publishers/{publisher}/books/{book}";
        let url = url_ref(pattern);
        assert_eq!(url, "shelves/*/publishers/*/books/*");
        assert_eq!(url.matches('*').count(), 3);
        assert!(!url.contains('{') && !url.contains('}'));
    }

    #[test]
    fn test_url_ref_leaves_malformed_placeholders() {
        assert_eq!(url_ref("a/{}/b"), "a/{}/b");
        assert_eq!(url_ref("a/{b"), "a/{b");
        assert_eq!(url_ref("plain/path"), "plain/path");
    }

    #[test]
    fn test_file_and_service_names() {
        let cfg = ResourceConfig::new("BookShelf", "library.v1", "library.example.com");
        assert_eq!(cfg.file_name(), "book_shelf.proto");
        assert_eq!(cfg.service_name(), "BookShelfService");
    }
}
