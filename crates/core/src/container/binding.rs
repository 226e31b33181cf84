use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::AliasPolicy;
use crate::container::autowiring::Instance;
use crate::container::descriptor::ClassRef;
use crate::errors::CoreError;

type UpcastFn = dyn Fn(&str, Instance) -> Result<Instance, CoreError> + Send + Sync;

/// Conversion applied to an instance resolved through an alias
///
/// Turns an `Arc<T>` into an `Arc<I>`, usually a trait object, and erases it
/// again as an `Arc<Arc<I>>`. Read it back with
/// [`Dependencies::next_interface`](crate::container::Dependencies::next_interface)
/// or [`IocContainer::resolve_interface`](crate::container::IocContainer::resolve_interface).
#[derive(Clone)]
pub struct Upcast {
    target: &'static str,
    convert: Arc<UpcastFn>,
}

impl Upcast {
    /// Build the conversion from a plain function or non-capturing closure
    pub fn new<T, I>(upcast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        T: Send + Sync + 'static,
        I: ?Sized + Send + Sync + 'static,
    {
        Self {
            target: std::any::type_name::<I>(),
            convert: Arc::new(move |alias: &str, instance: Instance| {
                let concrete = instance
                    .downcast::<T>()
                    .map_err(|_| CoreError::TypeMismatch {
                        name: alias.to_string(),
                        expected: std::any::type_name::<T>(),
                    })?;
                Ok(Arc::new(upcast(concrete)) as Instance)
            }),
        }
    }

    /// Name of the type the instance is converted to
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Convert an instance resolved under `alias`
    pub fn apply(&self, alias: &str, instance: Instance) -> Result<Instance, CoreError> {
        (self.convert)(alias, instance)
    }
}

impl fmt::Debug for Upcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Upcast({})", self.target)
    }
}

/// Alias name to the classes bound under it, in registration order
#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    bindings: HashMap<String, Vec<ClassRef>>,
    upcasts: HashMap<(String, ClassRef), Upcast>,
}

impl AliasTable {
    /// Create an empty alias table
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a class under an alias
    pub fn bind(&mut self, alias: impl Into<String>, class: ClassRef) {
        self.bindings.entry(alias.into()).or_default().push(class);
    }

    /// Bind a class under an alias, converting its instance on the way out
    pub fn bind_as(&mut self, alias: impl Into<String>, class: ClassRef, upcast: Upcast) {
        let alias = alias.into();
        self.upcasts.insert((alias.clone(), class), upcast);
        self.bind(alias, class);
    }

    /// Conversion registered for a class under an alias
    pub fn upcast(&self, alias: &str, class: ClassRef) -> Option<&Upcast> {
        self.upcasts.get(&(alias.to_string(), class))
    }

    /// All classes bound under an alias
    pub fn candidates(&self, alias: &str) -> &[ClassRef] {
        self.bindings.get(alias).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pick the class an alias resolves to
    ///
    /// Returns `Ok(None)` when the alias is unknown.
    pub fn pick(&self, alias: &str, policy: AliasPolicy) -> Result<Option<ClassRef>, CoreError> {
        let candidates = self.candidates(alias);

        let picked = match policy {
            AliasPolicy::FirstRegistered => candidates.first().copied(),
            AliasPolicy::LastRegistered => candidates.last().copied(),
            AliasPolicy::Strict => match candidates {
                [] => None,
                [only] => Some(*only),
                _ => {
                    return Err(CoreError::AmbiguousAlias {
                        alias: alias.to_string(),
                        candidates: candidates
                            .iter()
                            .map(|class| class.type_name().to_string())
                            .collect(),
                    })
                }
            },
        };

        Ok(picked)
    }

    /// Check whether an alias is bound
    pub fn contains(&self, alias: &str) -> bool {
        self.bindings.contains_key(alias)
    }

    /// Iterate over the aliases and their classes
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ClassRef])> {
        self.bindings
            .iter()
            .map(|(alias, classes)| (alias.as_str(), classes.as_slice()))
    }

    /// Number of distinct aliases
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no alias is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Remove every alias
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.upcasts.clear();
    }
}
