//! Resource configuration
//!
//! [`ResourceConfig`] is the single input of the generator. It is populated by
//! the CLI (or by library callers) and validated once with
//! [`ResourceConfig::validate`] before any shape is assembled.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Protobuf syntax version of the generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    /// `syntax = "proto2"`
    Proto2,
    /// `syntax = "proto3"` (default)
    #[default]
    Proto3,
}

impl Syntax {
    /// The value used in the `syntax` statement and descriptor
    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::Proto2 => "proto2",
            Syntax::Proto3 => "proto3",
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Syntax {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "proto2" => Ok(Syntax::Proto2),
            "proto3" => Ok(Syntax::Proto3),
            other => Err(ConfigError::InvalidSyntax(other.to_string())),
        }
    }
}

/// A standard AIP method that can be generated for the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Get (`r`)
    Get,
    /// List (`l`)
    List,
    /// Create (`c`)
    Create,
    /// Update (`u`)
    Update,
    /// Delete (`d`)
    Delete,
}

impl Method {
    /// All methods in generation order
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::List,
        Method::Create,
        Method::Update,
        Method::Delete,
    ];

    /// Selector letter for this method
    pub fn letter(&self) -> char {
        match self {
            Method::Get => 'r',
            Method::List => 'l',
            Method::Create => 'c',
            Method::Update => 'u',
            Method::Delete => 'd',
        }
    }

    /// Verb prefix used in method and message names
    pub fn verb(&self) -> &'static str {
        match self {
            Method::Get => "Get",
            Method::List => "List",
            Method::Create => "Create",
            Method::Update => "Update",
            Method::Delete => "Delete",
        }
    }

    /// Parse a selector letter (case-insensitive)
    pub fn from_letter(c: char) -> Result<Method, ConfigError> {
        match c.to_ascii_lowercase() {
            'r' => Ok(Method::Get),
            'l' => Ok(Method::List),
            'c' => Ok(Method::Create),
            'u' => Ok(Method::Update),
            'd' => Ok(Method::Delete),
            _ => Err(ConfigError::InvalidMethod(c)),
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Method::Get => 1,
            Method::List => 1 << 1,
            Method::Create => 1 << 2,
            Method::Update => 1 << 3,
            Method::Delete => 1 << 4,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Unordered set of methods to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSet(u8);

impl MethodSet {
    /// The empty set
    pub const fn empty() -> Self {
        MethodSet(0)
    }

    /// All five standard methods
    pub fn all() -> Self {
        Method::ALL.into_iter().collect()
    }

    /// Add a method to the set
    pub fn insert(&mut self, method: Method) {
        self.0 |= method.bit();
    }

    /// Membership test
    pub fn contains(&self, method: Method) -> bool {
        self.0 & method.bit() != 0
    }

    /// Whether no method is selected
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Selected methods in generation order
    pub fn iter(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        MethodSet::all()
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut set = MethodSet::empty();
        for method in iter {
            set.insert(method);
        }
        set
    }
}

impl FromStr for MethodSet {
    type Err = ConfigError;

    /// Parse a selector such as `crudl`, `rl` or `c,r,u`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = MethodSet::empty();
        for c in s.chars().filter(|c| *c != ',' && !c.is_whitespace()) {
            set.insert(Method::from_letter(c)?);
        }
        if set.is_empty() {
            return Err(ConfigError::NoMethods);
        }
        Ok(set)
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Canonical crudl order
        for method in [
            Method::Create,
            Method::Get,
            Method::Update,
            Method::Delete,
            Method::List,
        ] {
            if self.contains(method) {
                write!(f, "{}", method.letter())?;
            }
        }
        Ok(())
    }
}

/// Declarative description of the resource to scaffold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Singular resource name (e.g., "Book")
    pub resource: String,
    /// Plural override; defaults to `resource + "s"`
    pub plural: Option<String>,
    /// Protobuf package (e.g., "library.v1")
    pub package: String,
    /// Service name, used as the resource type domain and default host
    pub service: String,
    /// Syntax version of the generated file
    pub syntax: Syntax,
    /// Methods to generate
    pub methods: MethodSet,
    /// Name pattern of the parent resource (e.g., "publishers/{publisher}")
    pub parent_pattern: Option<String>,
    /// Whether the `<resource>_id` field of Create is required
    pub id_required: bool,
    /// Generate `display_name` on the resource
    pub with_display_name: bool,
    /// Generate `create_time` and `update_time` on the resource
    pub with_timestamps: bool,
    /// Generate the `annotations` map on the resource
    pub with_annotations: bool,
    /// Generate `filter` on the List request
    pub with_list_filter: bool,
    /// Generate `order_by` on the List request
    pub with_list_order_by: bool,
    /// Generate `update_mask` on the Update request
    pub with_update_field_mask: bool,
    /// Generate `allow_missing` on the Update request
    pub with_update_allow_missing: bool,
    /// Generate `allow_missing` on the Delete request
    pub with_delete_allow_missing: bool,
    /// Attach HTTP rules and method signatures to methods
    pub with_http_options: bool,
    /// Render without blank lines between declarations
    pub compact: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            resource: String::new(),
            plural: None,
            package: String::new(),
            service: String::new(),
            syntax: Syntax::default(),
            methods: MethodSet::default(),
            parent_pattern: None,
            id_required: false,
            with_display_name: true,
            with_timestamps: true,
            with_annotations: true,
            with_list_filter: true,
            with_list_order_by: true,
            with_update_field_mask: true,
            with_update_allow_missing: true,
            with_delete_allow_missing: true,
            with_http_options: true,
            compact: false,
        }
    }
}

impl ResourceConfig {
    /// Create a configuration with default toggles
    pub fn new(
        resource: impl Into<String>,
        package: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            package: package.into(),
            service: service.into(),
            ..Default::default()
        }
    }

    /// Reject configurations that cannot produce a valid schema
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource.trim().is_empty() {
            return Err(ConfigError::MissingResource);
        }
        if self.package.trim().is_empty() {
            return Err(ConfigError::MissingPackage);
        }
        if self.service.trim().is_empty() {
            return Err(ConfigError::MissingService);
        }

        if !is_upper_camel_identifier(&self.resource) {
            return Err(ConfigError::InvalidResourceName(self.resource.clone()));
        }

        if let Some(plural) = &self.plural {
            if !is_identifier(plural) {
                return Err(ConfigError::InvalidPlural(plural.clone()));
            }
        }

        if !self.package.split('.').all(is_identifier) {
            return Err(ConfigError::InvalidPackage(self.package.clone()));
        }

        if let Some(pattern) = &self.parent_pattern {
            validate_parent_pattern(pattern)?;
        }

        if self.methods.is_empty() {
            return Err(ConfigError::NoMethods);
        }

        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_upper_camel_identifier(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_uppercase()) && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn validate_parent_pattern(pattern: &str) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidParentPattern {
        pattern: pattern.to_string(),
        reason,
    };

    if pattern.is_empty() {
        return Err(invalid("pattern is empty"));
    }

    for segment in pattern.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty path segment"));
        }

        if let Some(inner) = segment.strip_prefix('{') {
            let variable = inner
                .strip_suffix('}')
                .ok_or_else(|| invalid("unbalanced braces"))?;
            if variable.is_empty() {
                return Err(invalid("empty placeholder"));
            }
            if !is_identifier(variable) {
                return Err(invalid("placeholder is not an identifier"));
            }
        } else if segment.contains(['{', '}']) {
            return Err(invalid("unbalanced braces"));
        } else if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(invalid("invalid character in segment"));
        }
    }

    Ok(())
}
