pub mod descriptor;
pub mod autowiring;
pub mod registry;
pub mod tokens;
pub mod binding;
pub mod resolver;
pub mod ioc_container;
pub mod ioc_builder;
pub mod debug;

pub use descriptor::{ClassRef, DependencySpec, DescriptorBuilder, InjectableDescriptor};
pub use autowiring::{construct_erased, ConstructFn, Dependencies, Injectable, Instance};
pub use registry::{Declaration, DescriptorRegistry, InjectableEntry, INJECTABLES};
pub use tokens::ContainerToken;
pub use binding::{AliasTable, Upcast};
pub use resolver::{DependencyGraph, DependencyNode, ResolutionPath};
pub use ioc_container::{ContainerStatistics, IocContainer, Lookup};
pub use ioc_builder::IocContainerBuilder;
pub use debug::{ContainerSnapshot, MemberInfo};
