//! Process-wide registry of injectable declarations
//!
//! Injectable classes submit an [`InjectableEntry`] into the [`INJECTABLES`]
//! distributed slice at compile time, either through `#[injectable]` or
//! [`declare_injectable!`](crate::declare_injectable). The global
//! [`DescriptorRegistry`] indexes that slice once, on first use, and never
//! changes afterwards. Containers only read from it.
//!
//! Explicit registries can be assembled with [`DescriptorRegistry::declare`]
//! when link-time collection is not wanted, e.g. to isolate a test.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::container::autowiring::{construct_erased, ConstructFn, Injectable};
use crate::container::descriptor::{ClassRef, InjectableDescriptor};

/// Registry entry submitted by an injectable class
pub struct InjectableEntry {
    /// Identity of the class
    pub class: fn() -> ClassRef,
    /// Declared name and dependencies
    pub descriptor: fn() -> InjectableDescriptor,
    /// Type-erased constructor
    pub construct: ConstructFn,
}

impl InjectableEntry {
    /// Build the entry of an injectable class
    pub const fn of<T: Injectable>() -> Self {
        Self {
            class: ClassRef::of::<T>,
            descriptor: T::descriptor,
            construct: construct_erased::<T>,
        }
    }
}

// Declarations are submitted at compile time via `declare_injectable!`
#[linkme::distributed_slice]
pub static INJECTABLES: [InjectableEntry] = [..];

/// Submit one or more `Injectable` types to the global descriptor registry
///
/// ```ignore
/// struct Engine;
///
/// impl Injectable for Engine {
///     fn descriptor() -> InjectableDescriptor {
///         InjectableDescriptor::leaf("Engine")
///     }
///
///     fn construct(_: Dependencies) -> Result<Self, CoreError> {
///         Ok(Engine)
///     }
/// }
///
/// ioc_core::declare_injectable!(Engine);
/// ```
#[macro_export]
macro_rules! declare_injectable {
    ($($ty:ty),+ $(,)?) => {
        $(
            const _: () = {
                #[$crate::__private::linkme::distributed_slice($crate::container::registry::INJECTABLES)]
                #[linkme(crate = $crate::__private::linkme)]
                static ENTRY: $crate::container::registry::InjectableEntry =
                    $crate::container::registry::InjectableEntry::of::<$ty>();
            };
        )+
    };
}

/// A class declaration as seen by containers
#[derive(Debug, Clone)]
pub struct Declaration {
    class: ClassRef,
    descriptor: Arc<InjectableDescriptor>,
    construct: ConstructFn,
}

impl Declaration {
    fn from_entry(entry: &InjectableEntry) -> Self {
        Self {
            class: (entry.class)(),
            descriptor: Arc::new((entry.descriptor)()),
            construct: entry.construct,
        }
    }

    /// Identity of the declared class
    pub fn class(&self) -> ClassRef {
        self.class
    }

    /// Descriptor of the declared class
    pub fn descriptor(&self) -> &InjectableDescriptor {
        &self.descriptor
    }

    /// Declared class name
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Type-erased constructor
    pub fn constructor(&self) -> ConstructFn {
        self.construct
    }
}

static GLOBAL: OnceLock<Arc<DescriptorRegistry>> = OnceLock::new();

/// Index of injectable declarations keyed by class identity
#[derive(Debug, Default, Clone)]
pub struct DescriptorRegistry {
    declarations: HashMap<ClassRef, Declaration>,
}

impl DescriptorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of every class submitted through [`INJECTABLES`]
    pub fn global() -> Arc<DescriptorRegistry> {
        GLOBAL
            .get_or_init(|| Arc::new(Self::from_entries(&INJECTABLES)))
            .clone()
    }

    /// Build a registry from a list of entries; the first entry of a class wins
    pub fn from_entries(entries: &[InjectableEntry]) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry.declare_entry(entry);
        }

        tracing::debug!(declarations = registry.len(), "descriptor registry built");
        registry
    }

    /// Declare an injectable class
    pub fn declare<T: Injectable>(&mut self) -> &mut Self {
        self.declare_entry(&InjectableEntry::of::<T>());
        self
    }

    /// Add an entry, returning false if the class was already declared
    pub fn declare_entry(&mut self, entry: &InjectableEntry) -> bool {
        let declaration = Declaration::from_entry(entry);
        let class = declaration.class();

        if let Some(existing) = self.declarations.get(&class) {
            tracing::warn!(
                class = %class,
                name = existing.name(),
                "class declared more than once, keeping the first declaration"
            );
            return false;
        }

        self.declarations.insert(class, declaration);
        true
    }

    /// Check whether a class is injectable
    pub fn is_injectable(&self, class: ClassRef) -> bool {
        self.declarations.contains_key(&class)
    }

    /// Get the descriptor of a class
    pub fn descriptor(&self, class: ClassRef) -> Option<&InjectableDescriptor> {
        self.declarations.get(&class).map(Declaration::descriptor)
    }

    /// Get the full declaration of a class
    pub fn declaration(&self, class: ClassRef) -> Option<&Declaration> {
        self.declarations.get(&class)
    }

    /// Iterate over the declared classes
    pub fn classes(&self) -> impl Iterator<Item = ClassRef> + '_ {
        self.declarations.keys().copied()
    }

    /// Number of declared classes
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether nothing has been declared
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
