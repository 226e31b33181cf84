use std::collections::{HashMap, HashSet, VecDeque};

use crate::container::descriptor::ClassRef;
use crate::errors::CoreError;

/// Classes currently being resolved, outermost first
#[derive(Debug, Clone, Default)]
pub struct ResolutionPath {
    entries: Vec<(ClassRef, String)>,
}

impl ResolutionPath {
    /// Create a new resolution path
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class to the resolution path
    pub fn push(&mut self, class: ClassRef, name: impl Into<String>) {
        self.entries.push((class, name.into()));
    }

    /// Remove the last class from the resolution path
    pub fn pop(&mut self) -> Option<ClassRef> {
        self.entries.pop().map(|(class, _)| class)
    }

    /// Check if the path contains a class (for cycle detection)
    pub fn contains(&self, class: ClassRef) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == class)
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Get the path as a string for error messages
    pub fn path_string(&self) -> String {
        self.entries
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Error for meeting `name` again while it is still on the path
    pub fn cycle_error(&self, class: ClassRef, name: &str) -> CoreError {
        let mut path = self.clone();
        path.push(class, name);
        CoreError::CircularDependency {
            path: path.path_string(),
            cycle_service: name.to_string(),
        }
    }
}

/// Dependency graph node
#[derive(Debug)]
pub struct DependencyNode {
    pub class: ClassRef,
    pub name: String,
    pub dependencies: Vec<ClassRef>,
    pub dependents: Vec<ClassRef>,
}

/// Dependency graph for analyzing class relationships
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<ClassRef, DependencyNode>,
    order: Vec<ClassRef>,
}

impl DependencyGraph {
    /// Create a new dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class to the graph
    pub fn add_class(
        &mut self,
        class: ClassRef,
        name: impl Into<String>,
        dependencies: &[ClassRef],
    ) {
        let node = DependencyNode {
            class,
            name: name.into(),
            dependencies: dependencies.to_vec(),
            dependents: Vec::new(),
        };
        if self.nodes.insert(class, node).is_none() {
            self.order.push(class);
        }
    }

    /// Build reverse dependency relationships
    pub fn build_reverse_dependencies(&mut self) {
        for node in self.nodes.values_mut() {
            node.dependents.clear();
        }

        let edges: Vec<(ClassRef, Vec<ClassRef>)> = self
            .order
            .iter()
            .filter_map(|class| {
                self.nodes
                    .get(class)
                    .map(|node| (*class, node.dependencies.clone()))
            })
            .collect();

        for (class, deps) in edges {
            for dep in deps {
                if let Some(dep_node) = self.nodes.get_mut(&dep) {
                    if !dep_node.dependents.contains(&class) {
                        dep_node.dependents.push(class);
                    }
                }
            }
        }
    }

    fn name_of(&self, class: ClassRef) -> String {
        self.nodes
            .get(&class)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| class.type_name().to_string())
    }

    /// Detect circular dependencies
    pub fn detect_cycles(&self) -> Result<(), CoreError> {
        let mut visited = HashSet::new();
        let mut in_progress = HashSet::new();

        for class in &self.order {
            if !visited.contains(class) {
                let mut path = ResolutionPath::new();
                self.detect_cycle_dfs(*class, &mut visited, &mut in_progress, &mut path)?;
            }
        }

        Ok(())
    }

    /// DFS-based cycle detection
    fn detect_cycle_dfs(
        &self,
        class: ClassRef,
        visited: &mut HashSet<ClassRef>,
        in_progress: &mut HashSet<ClassRef>,
        path: &mut ResolutionPath,
    ) -> Result<(), CoreError> {
        if in_progress.contains(&class) {
            return Err(path.cycle_error(class, &self.name_of(class)));
        }

        if visited.contains(&class) {
            return Ok(());
        }

        in_progress.insert(class);
        path.push(class, self.name_of(class));

        if let Some(node) = self.nodes.get(&class) {
            for dep in &node.dependencies {
                self.detect_cycle_dfs(*dep, visited, in_progress, path)?;
            }
        }

        path.pop();
        in_progress.remove(&class);
        visited.insert(class);

        Ok(())
    }

    /// Get an order in which every class comes after its dependencies
    pub fn topological_sort(&self) -> Result<Vec<ClassRef>, CoreError> {
        self.detect_cycles()?;

        let mut in_degree: HashMap<ClassRef, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        let mut result = Vec::new();

        for class in &self.order {
            let node = &self.nodes[class];
            let degree = node
                .dependencies
                .iter()
                .filter(|dep| self.nodes.contains_key(dep))
                .collect::<HashSet<_>>()
                .len();
            in_degree.insert(*class, degree);
            if degree == 0 {
                queue.push_back(*class);
            }
        }

        while let Some(class) = queue.pop_front() {
            result.push(class);

            for dependent in &self.nodes[&class].dependents {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*dependent);
                    }
                }
            }
        }

        if result.len() != self.nodes.len() {
            return Err(CoreError::CircularDependency {
                path: "Complex circular dependency detected".to_string(),
                cycle_service: "Multiple classes".to_string(),
            });
        }

        Ok(result)
    }

    /// Get dependencies of a class
    pub fn get_dependencies(&self, class: ClassRef) -> Option<&[ClassRef]> {
        self.nodes.get(&class).map(|node| node.dependencies.as_slice())
    }

    /// Get dependents of a class
    pub fn get_dependents(&self, class: ClassRef) -> Option<&[ClassRef]> {
        self.nodes.get(&class).map(|node| node.dependents.as_slice())
    }

    /// Number of classes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
