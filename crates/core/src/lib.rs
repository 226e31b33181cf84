//! Runtime inversion-of-control container.
//!
//! Classes describe their constructor dependencies once, through the
//! [`Injectable`] trait, and are declared process-wide with
//! [`declare_injectable!`] or `#[injectable]`. Each [`IocContainer`] then
//! decides which declared classes it accepts, builds them on demand and
//! caches one instance per class.

pub mod errors;
pub mod container;
pub mod config;

pub use errors::CoreError;
pub use container::{
    ClassRef, ContainerSnapshot, ContainerStatistics, ContainerToken, Dependencies,
    DependencySpec, DescriptorRegistry, Injectable, InjectableDescriptor, Instance,
    IocContainer, IocContainerBuilder,
};
pub use config::{AliasPolicy, ContainerConfig};

#[cfg(feature = "derive")]
pub use ioc_core_derive::injectable;

#[doc(hidden)]
pub mod __private {
    pub use linkme;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
