use crate::container::descriptor::InjectableDescriptor;
use crate::errors::CoreError;
use std::any::Any;
use std::sync::Arc;

/// Type-erased shared instance as held by the container
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Trait for classes that can be constructed by the IoC container
///
/// `descriptor()` lists the constructor dependencies in argument order and
/// `construct()` receives the resolved values in that same order. Implement it
/// by hand or with `#[injectable]`, then submit the type with
/// [`declare_injectable!`](crate::declare_injectable) so the container can find it.
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Declared name and ordered dependencies of this class
    fn descriptor() -> InjectableDescriptor;

    /// Create an instance from its resolved dependencies
    fn construct(dependencies: Dependencies) -> Result<Self, CoreError>;
}

/// Constructor of a class behind type erasure
pub type ConstructFn = fn(Dependencies) -> Result<Instance, CoreError>;

/// Construct `T` and erase its type
pub fn construct_erased<T: Injectable>(dependencies: Dependencies) -> Result<Instance, CoreError> {
    T::construct(dependencies).map(|instance| Arc::new(instance) as Instance)
}

/// Resolved constructor arguments, in declaration order
///
/// Arguments are read either positionally with [`get`](Self::get) or in order
/// with [`next`](Self::next). Arguments injected through an alias registered
/// with an upcast are read with [`next_interface`](Self::next_interface).
#[derive(Debug)]
pub struct Dependencies {
    owner: String,
    values: Vec<Instance>,
    cursor: usize,
}

impl Dependencies {
    /// Create the argument list of `owner`
    pub fn new(owner: impl Into<String>, values: Vec<Instance>) -> Self {
        Self {
            owner: owner.into(),
            values,
            cursor: 0,
        }
    }

    /// Create an empty argument list
    pub fn empty(owner: impl Into<String>) -> Self {
        Self::new(owner, Vec::new())
    }

    /// Name of the class being constructed
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the argument at `slot` as `T`
    pub fn get<T: Send + Sync + 'static>(&self, slot: usize) -> Result<Arc<T>, CoreError> {
        let value = self
            .values
            .get(slot)
            .ok_or_else(|| CoreError::MissingDependency {
                class: self.owner.clone(),
                slot,
            })?;

        value
            .clone()
            .downcast::<T>()
            .map_err(|_| CoreError::DependencyTypeMismatch {
                class: self.owner.clone(),
                slot,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Get the argument at `slot` as the interface `I`, usually a trait object
    pub fn get_interface<I>(&self, slot: usize) -> Result<Arc<I>, CoreError>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let value = self.get::<Arc<I>>(slot)?;
        Ok(Arc::clone(&value))
    }

    /// Get the argument at `slot` without downcasting
    pub fn get_erased(&self, slot: usize) -> Option<&Instance> {
        self.values.get(slot)
    }

    /// Take the next argument as `T`
    #[allow(clippy::should_implement_trait)]
    pub fn next<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, CoreError> {
        let slot = self.cursor;
        let value = self.get::<T>(slot)?;
        self.cursor += 1;
        Ok(value)
    }

    /// Take the next argument as the interface `I`
    pub fn next_interface<I>(&mut self) -> Result<Arc<I>, CoreError>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let slot = self.cursor;
        let value = self.get_interface::<I>(slot)?;
        self.cursor += 1;
        Ok(value)
    }
}
