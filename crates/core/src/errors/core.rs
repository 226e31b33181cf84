use thiserror::Error;

/// Core error type for the IoC container
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Class '{class}' is not injectable: no declaration was found for it")]
    NotInjectable { class: String },

    #[error("Invalid alias '{alias}' for class '{class}': alias must differ from the class name")]
    InvalidAlias { class: String, alias: String },

    #[error("Class '{class}' was already registered in this container")]
    AlreadyRegistered { class: String },

    #[error("Class name '{name}' is already taken by '{existing}' in this container (while registering '{class}')")]
    DuplicateName {
        name: String,
        existing: String,
        class: String,
    },

    #[error("Class \"{name}\" is not registered in container")]
    NotRegistered { name: String },

    #[error("Dependency failed for '{class}' at argument {slot}: check for unregistered or circular dependencies")]
    MissingDependency { class: String, slot: usize },

    #[error("Circular dependency detected: {path} (cycle at: {cycle_service})")]
    CircularDependency { path: String, cycle_service: String },

    #[error("Resolution of '{class}' exceeded the maximum depth of {depth}")]
    ResolutionDepthExceeded { class: String, depth: usize },

    #[error("Alias '{alias}' is ambiguous: {candidates:?}")]
    AmbiguousAlias {
        alias: String,
        candidates: Vec<String>,
    },

    #[error("Argument {slot} of '{class}' does not hold a value of type '{expected}'")]
    DependencyTypeMismatch {
        class: String,
        slot: usize,
        expected: &'static str,
    },

    #[error("Instance '{name}' is not of type '{expected}'")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    #[error("Construction of '{class}' failed: {message}")]
    ConstructionFailed { class: String, message: String },

    #[error("Lock error on resource: {resource}")]
    LockError { resource: String },
}

impl CoreError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new not registered error
    pub fn not_registered(name: impl Into<String>) -> Self {
        Self::NotRegistered { name: name.into() }
    }

    /// Create a construction error, for use inside `Injectable::construct`
    pub fn construction_failed(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Create a lock error for the named resource
    pub(crate) fn lock(resource: &str) -> Self {
        Self::LockError {
            resource: resource.to_string(),
        }
    }

    /// Check if the error is a not injectable error
    pub fn is_not_injectable(&self) -> bool {
        matches!(self, Self::NotInjectable { .. })
    }

    /// Check if the error is an already registered error
    pub fn is_already_registered(&self) -> bool {
        matches!(self, Self::AlreadyRegistered { .. })
    }

    /// Check if the error is a not registered error
    pub fn is_not_registered(&self) -> bool {
        matches!(self, Self::NotRegistered { .. })
    }

    /// Check if the error is a missing dependency error
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingDependency { .. })
    }

    /// Check if the error is a circular dependency error
    pub fn is_circular_dependency(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }

    /// Check if the error is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
