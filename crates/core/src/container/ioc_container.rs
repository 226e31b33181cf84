use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::ContainerConfig;
use crate::container::autowiring::{Dependencies, Instance};
use crate::container::binding::{AliasTable, Upcast};
use crate::container::debug::ContainerSnapshot;
use crate::container::descriptor::{ClassRef, DependencySpec, InjectableDescriptor};
use crate::container::registry::{Declaration, DescriptorRegistry};
use crate::container::resolver::{DependencyGraph, ResolutionPath};
use crate::container::tokens::ContainerToken;
use crate::errors::CoreError;

/// What to resolve: a class, or a class name / alias
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Class(ClassRef),
    Name(&'a str),
}

impl From<ClassRef> for Lookup<'_> {
    fn from(class: ClassRef) -> Self {
        Lookup::Class(class)
    }
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(name: &'a str) -> Self {
        Lookup::Name(name)
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(name: &'a String) -> Self {
        Lookup::Name(name.as_str())
    }
}

/// One isolated registration, resolution and caching scope
///
/// Classes have to be registered in every container that should build them.
/// Each registered class is constructed at most once per container; later
/// resolutions return the same `Arc`.
///
/// An alias registered with [`register_aliased_as`](Self::register_aliased_as)
/// stands for an interface: resolving it hands out the member as an `Arc<I>`,
/// typically a trait object, and two classes bound under the same alias are
/// interchangeable behind it.
#[derive(Debug)]
pub struct IocContainer {
    token: ContainerToken,
    config: ContainerConfig,
    registry: Arc<DescriptorRegistry>,
    /// Classes accepted by this container; survives `dispose`
    memberships: HashMap<ClassRef, Declaration>,
    member_order: Vec<ClassRef>,
    names: HashMap<String, ClassRef>,
    /// Registration bookkeeping, cleared by `dispose`
    registered: Vec<ClassRef>,
    aliases: AliasTable,
    instances: RwLock<HashMap<String, Instance>>,
}

impl IocContainer {
    /// Create a container over the global descriptor registry
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Create a container with a configuration
    pub fn with_config(config: ContainerConfig) -> Self {
        Self::from_parts(config, DescriptorRegistry::global())
    }

    /// Create a container over an explicit descriptor registry
    pub fn with_registry(registry: Arc<DescriptorRegistry>) -> Self {
        Self::from_parts(ContainerConfig::default(), registry)
    }

    /// Create a container from a configuration and a descriptor registry
    pub fn from_parts(config: ContainerConfig, registry: Arc<DescriptorRegistry>) -> Self {
        let token = ContainerToken::new();
        tracing::debug!(
            container = %token,
            label = config.label.as_deref().unwrap_or("-"),
            "container created"
        );

        Self {
            token,
            config,
            registry,
            memberships: HashMap::new(),
            member_order: Vec::new(),
            names: HashMap::new(),
            registered: Vec::new(),
            aliases: AliasTable::new(),
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// Identity of this container
    pub fn token(&self) -> ContainerToken {
        self.token
    }

    /// Configuration of this container
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Descriptor registry this container reads declarations from
    pub fn registry(&self) -> &Arc<DescriptorRegistry> {
        &self.registry
    }

    /// Register a class under its own name
    pub fn register(&mut self, class: ClassRef) -> Result<(), CoreError> {
        self.register_inner(class, None, None)
    }

    /// Register a class under its own name and an alias
    pub fn register_aliased(&mut self, class: ClassRef, alias: &str) -> Result<(), CoreError> {
        self.register_inner(class, Some(alias), None)
    }

    /// Register `T` under its own name and an alias standing for the interface `I`
    ///
    /// ```ignore
    /// container.register_aliased_as::<StripeGateway, dyn PaymentGateway>(
    ///     "payments",
    ///     |gateway| gateway as Arc<dyn PaymentGateway>,
    /// )?;
    /// ```
    pub fn register_aliased_as<T, I>(
        &mut self,
        alias: &str,
        upcast: fn(Arc<T>) -> Arc<I>,
    ) -> Result<(), CoreError>
    where
        T: Send + Sync + 'static,
        I: ?Sized + Send + Sync + 'static,
    {
        self.register_inner(ClassRef::of::<T>(), Some(alias), Some(Upcast::new(upcast)))
    }

    pub(crate) fn register_inner(
        &mut self,
        class: ClassRef,
        alias: Option<&str>,
        upcast: Option<Upcast>,
    ) -> Result<(), CoreError> {
        let declaration = self
            .registry
            .declaration(class)
            .cloned()
            .ok_or_else(|| CoreError::NotInjectable {
                class: class.type_name().to_string(),
            })?;
        let name = declaration.name().to_string();

        if let Some(alias) = alias {
            if alias == name || alias.trim().is_empty() {
                return Err(CoreError::InvalidAlias {
                    class: name,
                    alias: alias.to_string(),
                });
            }
        }

        if self.memberships.contains_key(&class) {
            return Err(CoreError::AlreadyRegistered { class: name });
        }

        if let Some(existing) = self.names.get(&name) {
            return Err(CoreError::DuplicateName {
                name,
                existing: existing.type_name().to_string(),
                class: class.type_name().to_string(),
            });
        }

        self.names.insert(name.clone(), class);
        self.memberships.insert(class, declaration);
        self.member_order.push(class);
        self.registered.push(class);
        match (alias, upcast) {
            (Some(alias), Some(upcast)) => self.aliases.bind_as(alias, class, upcast),
            (Some(alias), None) => self.aliases.bind(alias, class),
            (None, _) => {}
        }

        tracing::debug!(container = %self.token, class = %name, alias = ?alias, "class registered");
        Ok(())
    }

    /// Resolve a class by type
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, CoreError> {
        let class = ClassRef::of::<T>();
        let instance = self.resolve_erased(class)?;
        downcast_instance(instance, class.type_name())
    }

    /// Resolve a class by its declared name or by an alias
    pub fn resolve_named<T>(&self, name: &str) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        let instance = self.resolve_erased(name)?;
        downcast_instance(instance, name)
    }

    /// Resolve an alias registered with `register_aliased_as` as its interface
    pub fn resolve_interface<I>(&self, alias: &str) -> Result<Arc<I>, CoreError>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve_erased(alias)?;
        let interface = downcast_instance::<Arc<I>>(instance, alias)?;
        Ok(Arc::clone(&interface))
    }

    /// Try to resolve a class by type, returning None on any error
    pub fn try_resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.resolve::<T>().ok()
    }

    /// Try to resolve a class by name or alias, returning None on any error
    pub fn try_resolve_named<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.resolve_named::<T>(name).ok()
    }

    /// Resolve a class or name without downcasting the instance
    pub fn resolve_erased<'a>(
        &self,
        target: impl Into<Lookup<'a>>,
    ) -> Result<Instance, CoreError> {
        let mut path = ResolutionPath::new();
        match target.into() {
            Lookup::Class(class) => self.resolve_class(class, &mut path),
            Lookup::Name(name) => self.resolve_name(name, &mut path),
        }
    }

    /// Find the member class a name refers to: class names first, then aliases
    fn lookup_name(&self, name: &str) -> Result<ClassRef, CoreError> {
        if let Some(class) = self.names.get(name) {
            return Ok(*class);
        }

        self.aliases
            .pick(name, self.config.alias_policy)?
            .ok_or_else(|| CoreError::not_registered(name))
    }

    /// Resolve a class name or alias, applying the alias upcast if there is one
    fn resolve_name(&self, name: &str, path: &mut ResolutionPath) -> Result<Instance, CoreError> {
        let class = self.lookup_name(name)?;
        let instance = self.resolve_class(class, path)?;

        if self.names.contains_key(name) {
            return Ok(instance);
        }
        match self.aliases.upcast(name, class) {
            Some(upcast) => upcast.apply(name, instance),
            None => Ok(instance),
        }
    }

    fn member(&self, class: ClassRef) -> Result<&Declaration, CoreError> {
        self.memberships
            .get(&class)
            .ok_or_else(|| CoreError::not_registered(class.type_name()))
    }

    fn cached(&self, name: &str) -> Result<Option<Instance>, CoreError> {
        let instances = self
            .instances
            .read()
            .map_err(|_| CoreError::lock("instances"))?;
        Ok(instances.get(name).cloned())
    }

    fn resolve_class(
        &self,
        class: ClassRef,
        path: &mut ResolutionPath,
    ) -> Result<Instance, CoreError> {
        let declaration = self.member(class)?;
        let descriptor = declaration.descriptor();
        let name = descriptor.name();

        if let Some(instance) = self.cached(name)? {
            tracing::trace!(container = %self.token, class = name, "instance cache hit");
            return Ok(instance);
        }

        if self.config.detect_cycles && path.contains(class) {
            return Err(path.cycle_error(class, name));
        }

        // cycle detection already bounds the path
        if !self.config.detect_cycles && path.depth() >= self.config.max_resolution_depth {
            return Err(CoreError::ResolutionDepthExceeded {
                class: name.to_string(),
                depth: self.config.max_resolution_depth,
            });
        }

        if let Some(slot) = descriptor.first_unset_slot() {
            return Err(CoreError::MissingDependency {
                class: name.to_string(),
                slot,
            });
        }

        path.push(class, name);
        let mut values = Vec::with_capacity(descriptor.arity());
        for dependency in descriptor.dependencies().iter().flatten() {
            let value = match dependency {
                DependencySpec::Direct(target) => self.resolve_class(*target, path)?,
                DependencySpec::Aliased(alias) => self.resolve_name(alias, path)?,
            };
            values.push(value);
        }
        path.pop();

        tracing::debug!(
            container = %self.token,
            class = name,
            arguments = values.len(),
            "constructing instance"
        );
        let instance = (declaration.constructor())(Dependencies::new(name, values))?;
        self.memoize(name, instance)
    }

    /// Store a freshly built instance; an existing entry is kept and returned
    fn memoize(&self, name: &str, instance: Instance) -> Result<Instance, CoreError> {
        let mut instances = self
            .instances
            .write()
            .map_err(|_| CoreError::lock("instances"))?;
        Ok(instances.entry(name.to_string()).or_insert(instance).clone())
    }

    /// Drop cached instances, aliases and registration bookkeeping
    ///
    /// Membership is kept: a class registered before `dispose` still counts as
    /// registered here. Registering it again fails with `AlreadyRegistered`,
    /// and resolving it builds a fresh instance.
    pub fn dispose(&mut self) {
        let cached = match self.instances.get_mut() {
            Ok(instances) => {
                let count = instances.len();
                instances.clear();
                count
            }
            Err(poisoned) => {
                let instances = poisoned.into_inner();
                let count = instances.len();
                instances.clear();
                count
            }
        };
        self.registered.clear();
        self.aliases.clear();

        tracing::debug!(container = %self.token, dropped_instances = cached, "container disposed");
    }

    /// Snapshot of the instance cache, keyed by class name
    pub fn instances(&self) -> Result<HashMap<String, Instance>, CoreError> {
        let instances = self
            .instances
            .read()
            .map_err(|_| CoreError::lock("instances"))?;
        Ok(instances.clone())
    }

    /// Get a cached instance without resolving it
    pub fn instance<T>(&self, name: &str) -> Result<Option<Arc<T>>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        self.cached(name)?
            .map(|instance| downcast_instance(instance, name))
            .transpose()
    }

    /// Check whether an instance is cached under a class name
    pub fn has_instance(&self, name: &str) -> bool {
        matches!(self.cached(name), Ok(Some(_)))
    }

    /// Number of cached instances
    pub fn instance_count(&self) -> usize {
        self.instances.read().map(|instances| instances.len()).unwrap_or(0)
    }

    /// Classes registered since creation or the last `dispose`, in order
    pub fn registered_classes(&self) -> &[ClassRef] {
        &self.registered
    }

    /// Alias table of this container
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Check whether a class is a member of this container
    pub fn contains(&self, class: ClassRef) -> bool {
        self.memberships.contains_key(&class)
    }

    /// Member classes in registration order
    pub fn members(&self) -> impl Iterator<Item = ClassRef> + '_ {
        self.member_order.iter().copied()
    }

    /// Descriptor of a member class
    pub fn descriptor(&self, class: ClassRef) -> Option<&InjectableDescriptor> {
        self.memberships.get(&class).map(Declaration::descriptor)
    }

    /// Build the dependency graph of the member classes
    ///
    /// Alias edges follow the configured alias policy. Fails on the first
    /// unset slot or dependency that is not a member.
    pub fn dependency_graph(&self) -> Result<DependencyGraph, CoreError> {
        let mut graph = DependencyGraph::new();

        for class in &self.member_order {
            let descriptor = self.member(*class)?.descriptor();
            let mut edges = Vec::with_capacity(descriptor.arity());

            for (slot, dependency) in descriptor.dependencies().iter().enumerate() {
                let target = match dependency {
                    None => {
                        return Err(CoreError::MissingDependency {
                            class: descriptor.name().to_string(),
                            slot,
                        })
                    }
                    Some(DependencySpec::Direct(target)) => {
                        self.member(*target)?;
                        *target
                    }
                    Some(DependencySpec::Aliased(alias)) => self.lookup_name(alias)?,
                };
                edges.push(target);
            }

            graph.add_class(*class, descriptor.name(), &edges);
        }

        graph.build_reverse_dependencies();
        Ok(graph)
    }

    /// Check that every member class could be resolved, without building anything
    pub fn validate(&self) -> Result<(), CoreError> {
        self.dependency_graph()?.detect_cycles()
    }

    /// Resolve every member class, dependencies first; returns the number resolved
    pub fn warm_up(&self) -> Result<usize, CoreError> {
        let order = self.dependency_graph()?.topological_sort()?;
        for class in &order {
            self.resolve_erased(*class)?;
        }

        tracing::debug!(container = %self.token, classes = order.len(), "container warmed up");
        Ok(order.len())
    }

    /// Counts describing the container state
    pub fn statistics(&self) -> ContainerStatistics {
        ContainerStatistics {
            members: self.memberships.len(),
            registered: self.registered.len(),
            aliases: self.aliases.len(),
            cached_instances: self.instance_count(),
        }
    }

    /// Serializable view of the container state
    pub fn snapshot(&self) -> Result<ContainerSnapshot, CoreError> {
        ContainerSnapshot::capture(self)
    }
}

impl Default for IocContainer {
    fn default() -> Self {
        Self::new()
    }
}

/// Container statistics for monitoring and debugging
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContainerStatistics {
    pub members: usize,
    pub registered: usize,
    pub aliases: usize,
    pub cached_instances: usize,
}

fn downcast_instance<T>(instance: Instance, name: &str) -> Result<Arc<T>, CoreError>
where
    T: Send + Sync + 'static,
{
    instance.downcast::<T>().map_err(|_| CoreError::TypeMismatch {
        name: name.to_string(),
        expected: std::any::type_name::<T>(),
    })
}
