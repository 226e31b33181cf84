use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::AliasPolicy;
use crate::container::descriptor::ClassRef;
use crate::container::ioc_container::IocContainer;
use crate::errors::CoreError;

/// Serializable view of one member class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberInfo {
    pub name: String,
    pub type_name: String,
    /// Rendered dependency slots; unset slots are `None`
    pub dependencies: Vec<Option<String>>,
    pub cached: bool,
}

/// Point-in-time view of a container, for debugging and logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSnapshot {
    pub token: String,
    pub label: Option<String>,
    pub alias_policy: AliasPolicy,
    pub members: Vec<MemberInfo>,
    pub registered: Vec<String>,
    pub aliases: BTreeMap<String, Vec<String>>,
    pub cached_instances: Vec<String>,
}

impl ContainerSnapshot {
    /// Capture the current state of a container
    pub fn capture(container: &IocContainer) -> Result<Self, CoreError> {
        let mut cached_instances: Vec<String> = container.instances()?.into_keys().collect();
        cached_instances.sort();

        let members = container
            .members()
            .filter_map(|class| container.descriptor(class).map(|d| (class, d)))
            .map(|(class, descriptor)| MemberInfo {
                name: descriptor.name().to_string(),
                type_name: class.type_name().to_string(),
                dependencies: descriptor
                    .dependencies()
                    .iter()
                    .map(|slot| slot.as_ref().map(ToString::to_string))
                    .collect(),
                cached: cached_instances.iter().any(|name| name == descriptor.name()),
            })
            .collect();

        let name_of = |class: ClassRef| {
            container
                .descriptor(class)
                .map(|d| d.name().to_string())
                .unwrap_or_else(|| class.type_name().to_string())
        };

        let registered = container
            .registered_classes()
            .iter()
            .map(|class| name_of(*class))
            .collect();

        let aliases = container
            .aliases()
            .iter()
            .map(|(alias, classes)| {
                (
                    alias.to_string(),
                    classes.iter().map(|class| name_of(*class)).collect(),
                )
            })
            .collect();

        Ok(Self {
            token: container.token().to_string(),
            label: container.config().label.clone(),
            alias_policy: container.config().alias_policy,
            members,
            registered,
            aliases,
            cached_instances,
        })
    }

    /// Render the snapshot as pretty JSON
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ContainerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Container {}", self.label.as_deref().unwrap_or(&self.token))?;
        writeln!(f, "Alias policy: {}", self.alias_policy)?;

        writeln!(f, "Members ({}):", self.members.len())?;
        for member in &self.members {
            let dependencies: Vec<&str> = member
                .dependencies
                .iter()
                .map(|slot| slot.as_deref().unwrap_or("<unset>"))
                .collect();
            writeln!(
                f,
                "  {}{} [{}]",
                member.name,
                if member.cached { " *" } else { "" },
                dependencies.join(", ")
            )?;
        }

        if !self.aliases.is_empty() {
            writeln!(f, "Aliases:")?;
            for (alias, classes) in &self.aliases {
                writeln!(f, "  {} -> {}", alias, classes.join(", "))?;
            }
        }

        write!(f, "Cached instances: {}", self.cached_instances.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerConfig;
    use crate::container::autowiring::{Dependencies, Injectable};
    use crate::container::descriptor::InjectableDescriptor;
    use crate::container::registry::DescriptorRegistry;
    use std::sync::Arc;

    struct Clock;
    struct Scheduler;

    impl Injectable for Clock {
        fn descriptor() -> InjectableDescriptor {
            InjectableDescriptor::leaf("Clock")
        }

        fn construct(_: Dependencies) -> Result<Self, CoreError> {
            Ok(Clock)
        }
    }

    impl Injectable for Scheduler {
        fn descriptor() -> InjectableDescriptor {
            InjectableDescriptor::builder("Scheduler")
                .depends_on_alias("time")
                .unset()
                .build()
        }

        fn construct(_: Dependencies) -> Result<Self, CoreError> {
            Ok(Scheduler)
        }
    }

    fn container() -> IocContainer {
        let mut registry = DescriptorRegistry::new();
        registry.declare::<Clock>().declare::<Scheduler>();

        let config = ContainerConfig::new().with_label("jobs");
        let mut container = IocContainer::from_parts(config, Arc::new(registry));
        container.register_aliased(ClassRef::of::<Clock>(), "time").unwrap();
        container.register(ClassRef::of::<Scheduler>()).unwrap();
        container.resolve::<Clock>().unwrap();
        container
    }

    #[test]
    fn test_capture() {
        let snapshot = ContainerSnapshot::capture(&container()).unwrap();

        assert_eq!(snapshot.label.as_deref(), Some("jobs"));
        assert_eq!(snapshot.registered, vec!["Clock", "Scheduler"]);
        assert_eq!(snapshot.aliases["time"], vec!["Clock"]);
        assert_eq!(snapshot.cached_instances, vec!["Clock"]);
        assert!(snapshot.members[0].cached);
        assert_eq!(
            snapshot.members[1].dependencies,
            vec![Some("alias:time".to_string()), None]
        );
    }

    #[test]
    fn test_to_json() {
        let json = ContainerSnapshot::capture(&container())
            .unwrap()
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["label"], "jobs");
        assert_eq!(value["alias_policy"], "first_registered");
        assert_eq!(value["members"][1]["name"], "Scheduler");
    }

    #[test]
    fn test_display() {
        let rendered = ContainerSnapshot::capture(&container()).unwrap().to_string();

        assert!(rendered.starts_with("Container jobs"));
        assert!(rendered.contains("Clock *"));
        assert!(rendered.contains("Scheduler [alias:time, <unset>]"));
        assert!(rendered.contains("time -> Clock"));
    }
}
