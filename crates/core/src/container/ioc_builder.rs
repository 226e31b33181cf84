use std::sync::Arc;

use crate::config::ContainerConfig;
use crate::container::binding::Upcast;
use crate::container::descriptor::ClassRef;
use crate::container::ioc_container::IocContainer;
use crate::container::registry::DescriptorRegistry;
use crate::errors::CoreError;

#[derive(Debug)]
struct Registration {
    class: ClassRef,
    alias: Option<String>,
    upcast: Option<Upcast>,
}

/// Builder for IoC container with fluent API
///
/// Registrations are applied in the order they were added; `build` stops at
/// the first one that fails.
#[derive(Debug, Default)]
pub struct IocContainerBuilder {
    config: ContainerConfig,
    registry: Option<Arc<DescriptorRegistry>>,
    registrations: Vec<Registration>,
}

impl IocContainerBuilder {
    /// Create a new IoC container builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a configuration
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Read declarations from an explicit registry instead of the global one
    pub fn with_registry(mut self, registry: Arc<DescriptorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Register a class under its own name
    pub fn register(mut self, class: ClassRef) -> Self {
        self.registrations.push(Registration {
            class,
            alias: None,
            upcast: None,
        });
        self
    }

    /// Register a class under its own name and an alias
    pub fn register_aliased(mut self, class: ClassRef, alias: impl Into<String>) -> Self {
        self.registrations.push(Registration {
            class,
            alias: Some(alias.into()),
            upcast: None,
        });
        self
    }

    /// Register `T` under its own name and an alias standing for the interface `I`
    pub fn register_aliased_as<T, I>(
        mut self,
        alias: impl Into<String>,
        upcast: fn(Arc<T>) -> Arc<I>,
    ) -> Self
    where
        T: Send + Sync + 'static,
        I: ?Sized + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            class: ClassRef::of::<T>(),
            alias: Some(alias.into()),
            upcast: Some(Upcast::new(upcast)),
        });
        self
    }

    /// Register a class by type
    pub fn register_type<T: ?Sized + 'static>(self) -> Self {
        self.register(ClassRef::of::<T>())
    }

    /// Build the IoC container
    pub fn build(self) -> Result<IocContainer, CoreError> {
        self.config.validate()?;

        let registry = self.registry.unwrap_or_else(DescriptorRegistry::global);
        let mut container = IocContainer::from_parts(self.config, registry);

        for registration in self.registrations {
            container.register_inner(
                registration.class,
                registration.alias.as_deref(),
                registration.upcast,
            )?;
        }

        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::autowiring::{Dependencies, Injectable};
    use crate::container::descriptor::InjectableDescriptor;

    struct Repository;
    struct UserService {
        repository: Arc<Repository>,
    }

    trait Store: Send + Sync {
        fn kind(&self) -> &'static str;
    }

    impl Store for Repository {
        fn kind(&self) -> &'static str {
            "repository"
        }
    }

    impl Injectable for Repository {
        fn descriptor() -> InjectableDescriptor {
            InjectableDescriptor::leaf("Repository")
        }

        fn construct(_: Dependencies) -> Result<Self, CoreError> {
            Ok(Repository)
        }
    }

    impl Injectable for UserService {
        fn descriptor() -> InjectableDescriptor {
            InjectableDescriptor::builder("UserService")
                .depends_on_alias("repo")
                .build()
        }

        fn construct(mut dependencies: Dependencies) -> Result<Self, CoreError> {
            Ok(UserService {
                repository: dependencies.next()?,
            })
        }
    }

    fn registry() -> Arc<DescriptorRegistry> {
        let mut registry = DescriptorRegistry::new();
        registry.declare::<Repository>().declare::<UserService>();
        Arc::new(registry)
    }

    #[test]
    fn test_builder_registers_in_order() {
        let container = IocContainerBuilder::new()
            .with_registry(registry())
            .register_aliased(ClassRef::of::<Repository>(), "repo")
            .register_type::<UserService>()
            .build()
            .unwrap();

        assert_eq!(
            container.registered_classes(),
            &[ClassRef::of::<Repository>(), ClassRef::of::<UserService>()]
        );

        let service = container.resolve::<UserService>().unwrap();
        let repository = container.resolve_named::<Repository>("repo").unwrap();
        assert!(Arc::ptr_eq(&service.repository, &repository));
    }

    #[test]
    fn test_builder_registers_interface_alias() {
        let container = IocContainerBuilder::new()
            .with_registry(registry())
            .register_aliased_as::<Repository, dyn Store>("store", |repo| repo as Arc<dyn Store>)
            .build()
            .unwrap();

        let store = container.resolve_interface::<dyn Store>("store").unwrap();
        assert_eq!(store.kind(), "repository");
        assert!(container.resolve::<Repository>().is_ok());
    }

    #[test]
    fn test_builder_stops_at_first_failure() {
        let result = IocContainerBuilder::new()
            .with_registry(registry())
            .register_type::<Repository>()
            .register_type::<Repository>()
            .build();

        assert!(result.unwrap_err().is_already_registered());
    }

    #[test]
    fn test_builder_validates_config() {
        let result = IocContainerBuilder::new()
            .with_config(ContainerConfig::new().with_max_resolution_depth(0))
            .build();

        assert!(result.unwrap_err().is_configuration());
    }
}
