use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Class identity: the type id plus its full type name for diagnostics
///
/// A `ClassRef` can be taken for any `'static` type. Whether the class is
/// injectable is answered by the descriptor registry, not by the type system,
/// so that registering an undeclared type is a run-time error.
#[derive(Clone, Copy)]
pub struct ClassRef {
    type_id: TypeId,
    type_name: &'static str,
}

impl ClassRef {
    /// Get the class reference of a type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Get the type id of the class
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get the full type name of the class
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", self.type_name)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// What a single constructor argument depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencySpec {
    /// Resolved by class identity
    Direct(ClassRef),
    /// Resolved by alias name
    Aliased(String),
}

impl DependencySpec {
    /// Create a direct dependency on a type
    pub fn direct<T: ?Sized + 'static>() -> Self {
        Self::Direct(ClassRef::of::<T>())
    }

    /// Create a dependency on an alias
    pub fn aliased(alias: impl Into<String>) -> Self {
        Self::Aliased(alias.into())
    }

    /// Check if the dependency is resolved by alias
    pub fn is_aliased(&self) -> bool {
        matches!(self, Self::Aliased(_))
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(class) => write!(f, "{}", class),
            Self::Aliased(alias) => write!(f, "alias:{}", alias),
        }
    }
}

/// Immutable metadata of an injectable class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectableDescriptor {
    name: String,
    dependencies: Vec<Option<DependencySpec>>,
}

impl InjectableDescriptor {
    /// Start describing a class with the given declared name
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(name)
    }

    /// Describe a class without dependencies
    pub fn leaf(name: impl Into<String>) -> Self {
        DescriptorBuilder::new(name).build()
    }

    /// Declared class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor dependencies in argument order; `None` is an unset slot
    pub fn dependencies(&self) -> &[Option<DependencySpec>] {
        &self.dependencies
    }

    /// Number of constructor arguments
    pub fn arity(&self) -> usize {
        self.dependencies.len()
    }

    /// Index of the first unset slot, if any
    pub fn first_unset_slot(&self) -> Option<usize> {
        self.dependencies.iter().position(Option::is_none)
    }
}

/// Builder for injectable descriptors
#[derive(Debug)]
pub struct DescriptorBuilder {
    name: String,
    dependencies: Vec<Option<DependencySpec>>,
}

impl DescriptorBuilder {
    /// Create a new descriptor builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    /// Add a direct dependency
    pub fn depends_on<T: ?Sized + 'static>(mut self) -> Self {
        self.dependencies.push(Some(DependencySpec::direct::<T>()));
        self
    }

    /// Add a dependency resolved through an alias
    pub fn depends_on_alias(mut self, alias: impl Into<String>) -> Self {
        self.dependencies.push(Some(DependencySpec::aliased(alias)));
        self
    }

    /// Add an argument without a declared dependency
    pub fn unset(mut self) -> Self {
        self.dependencies.push(None);
        self
    }

    /// Add an arbitrary slot
    pub fn slot(mut self, dependency: Option<DependencySpec>) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Build the descriptor
    pub fn build(self) -> InjectableDescriptor {
        InjectableDescriptor {
            name: self.name,
            dependencies: self.dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Engine;
    struct Wheel;

    #[test]
    fn test_class_ref_identity() {
        let a = ClassRef::of::<Engine>();
        let b = ClassRef::of::<Engine>();
        let c = ClassRef::of::<Wheel>();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.type_id(), TypeId::of::<Engine>());
        assert!(a.type_name().ends_with("Engine"));
    }

    #[test]
    fn test_descriptor_builder_keeps_slot_order() {
        let descriptor = InjectableDescriptor::builder("Car")
            .depends_on::<Engine>()
            .unset()
            .depends_on_alias("wheels")
            .build();

        assert_eq!(descriptor.name(), "Car");
        assert_eq!(descriptor.arity(), 3);
        assert_eq!(
            descriptor.dependencies()[0],
            Some(DependencySpec::direct::<Engine>())
        );
        assert_eq!(descriptor.dependencies()[1], None);
        assert_eq!(
            descriptor.dependencies()[2],
            Some(DependencySpec::aliased("wheels"))
        );
        assert_eq!(descriptor.first_unset_slot(), Some(1));
    }

    #[test]
    fn test_slot_accepts_prepared_specs() {
        let specs = vec![Some(DependencySpec::aliased("wheels")), None];
        let descriptor = specs
            .into_iter()
            .fold(InjectableDescriptor::builder("Truck"), |builder, spec| builder.slot(spec))
            .build();

        assert_eq!(descriptor.arity(), 2);
        assert!(descriptor.dependencies()[0].as_ref().unwrap().is_aliased());
        assert_eq!(descriptor.first_unset_slot(), Some(1));
    }

    #[test]
    fn test_leaf_descriptor() {
        let descriptor = InjectableDescriptor::leaf("Engine");
        assert_eq!(descriptor.arity(), 0);
        assert_eq!(descriptor.first_unset_slot(), None);
    }

    #[test]
    fn test_dependency_spec_display() {
        assert_eq!(DependencySpec::aliased("wheels").to_string(), "alias:wheels");
        assert!(DependencySpec::direct::<Engine>().to_string().ends_with("Engine"));
        assert!(DependencySpec::aliased("wheels").is_aliased());
    }
}
