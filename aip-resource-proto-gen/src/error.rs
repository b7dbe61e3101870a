//! Error types for schema generation
//!
//! Configuration problems are reported as [`ConfigError`] before any shape is
//! built. Everything that can go wrong while assembling the schema is a
//! [`GeneratorError`].

use crate::config::Method;

/// Error in the resource configuration, raised before assembly begins
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No resource name was given
    #[error("resource name is required")]
    MissingResource,

    /// No package name was given
    #[error("package name is required")]
    MissingPackage,

    /// No service name was given
    #[error("service name is required")]
    MissingService,

    /// Resource (or plural) name is not an upper camel case identifier
    #[error("invalid resource name {0:?}: expected an UpperCamelCase identifier")]
    InvalidResourceName(String),

    /// Plural override is not an identifier
    #[error("invalid plural resource name {0:?}")]
    InvalidPlural(String),

    /// Package is not a dot separated list of identifiers
    #[error("invalid package name {0:?}")]
    InvalidPackage(String),

    /// Parent pattern is malformed
    #[error("invalid parent pattern {pattern:?}: {reason}")]
    InvalidParentPattern {
        /// The offending pattern
        pattern: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Method selector contains a letter outside of `crudl`
    #[error("invalid method {0:?}: expected one of c, r, u, d, l")]
    InvalidMethod(char),

    /// Method selector selects nothing
    #[error("at least one method must be selected")]
    NoMethods,

    /// Unknown syntax version
    #[error("invalid syntax {0:?}: expected proto2 or proto3")]
    InvalidSyntax(String),
}

/// Error type for schema generation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The configuration was rejected
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A well-known type could not be resolved
    #[error("well-known type {type_name} is not available")]
    WellKnownType {
        /// Fully qualified protobuf name of the type
        type_name: &'static str,
    },

    /// Two messages in the file share a name
    #[error("duplicate message {name}")]
    DuplicateMessage {
        /// Message name
        name: String,
    },

    /// Two fields in a message share a name
    #[error("duplicate field {field} in message {message}")]
    DuplicateField {
        /// Message name
        message: String,
        /// Field name
        field: String,
    },

    /// Two methods in the service share a name
    #[error("duplicate method {name}")]
    DuplicateMethod {
        /// Method name
        name: String,
    },

    /// A method assembler failed
    #[error("{resource}: failed to build {method} method: {source}")]
    Method {
        /// Resource being generated
        resource: String,
        /// Method that failed
        method: Method,
        /// Underlying error
        #[source]
        source: Box<GeneratorError>,
    },

    /// Writing generated output failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneratorError {
    /// Attach resource and method context to an error raised by a method assembler
    pub fn in_method(self, resource: &str, method: Method) -> Self {
        GeneratorError::Method {
            resource: resource.to_string(),
            method,
            source: Box::new(self),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            GeneratorError::Config(_) => 2,
            GeneratorError::Io(_) => 3,
            _ => 1,
        }
    }
}
