//! Graph construction and validation

use crate::error::{ConfigError, ConfigResult};
use crate::graph::Graph;
use crate::task::{same_task, TaskDefinition};

impl Graph {
    /// Build and validate the dependency graph for a set of tasks
    ///
    /// Fails when a dependency or dependee is not one of `tasks`, when a task depends on
    /// itself, or when the declared edges contain a cycle.
    pub fn build(tasks: &[TaskDefinition]) -> ConfigResult<Graph> {
        let mut graph = Graph::default();
        for task in tasks {
            graph.add_node(task.name());
        }

        for (end, task) in tasks.iter().enumerate() {
            for dependency in task.dependencies() {
                if same_task(dependency, task.name()) {
                    return Err(ConfigError::SelfDependency(task.name().to_string()));
                }
                let start = graph
                    .position(dependency)
                    .ok_or_else(|| ConfigError::MissingDependency {
                        task: task.name().to_string(),
                        dependency: dependency.clone(),
                    })?;
                graph.add_edge(start, end);
            }
        }

        // Reverse declarations become ordinary edges before validation
        for (start, task) in tasks.iter().enumerate() {
            for dependee in task.dependees() {
                if same_task(dependee, task.name()) {
                    return Err(ConfigError::SelfDependency(task.name().to_string()));
                }
                let end = graph
                    .position(dependee)
                    .ok_or_else(|| ConfigError::MissingDependee {
                        task: task.name().to_string(),
                        dependee: dependee.clone(),
                    })?;
                graph.add_edge(start, end);
            }
        }

        detect_cycles(&graph)?;
        Ok(graph)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Depth-first search over "depends on" edges, reporting the first cycle found
///
/// Uses an explicit stack of `(node, next dependency)` frames rather than recursion.
fn detect_cycles(graph: &Graph) -> ConfigResult<()> {
    let mut marks = vec![Mark::Unvisited; graph.nodes.len()];

    for root in 0..graph.nodes.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        let mut path: Vec<(usize, usize)> = vec![(root, 0)];
        marks[root] = Mark::OnPath;

        while let Some(frame) = path.last_mut() {
            let (node, next) = *frame;
            let Some(&dependency) = graph.dependencies[node].get(next) else {
                marks[node] = Mark::Done;
                path.pop();
                continue;
            };
            frame.1 += 1;

            match marks[dependency] {
                Mark::Done => {}
                Mark::Unvisited => {
                    marks[dependency] = Mark::OnPath;
                    path.push((dependency, 0));
                }
                Mark::OnPath => {
                    let mut cycle: Vec<&str> = path
                        .iter()
                        .skip_while(|(n, _)| *n != dependency)
                        .map(|(n, _)| graph.nodes[*n].as_str())
                        .collect();
                    cycle.push(graph.nodes[dependency].as_str());
                    return Err(ConfigError::CircularDependency(cycle.join(" -> ")));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskRegistry;

    fn registry(tasks: &[(&str, &[&str])]) -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        for (name, dependencies) in tasks {
            let builder = registry.register_task(*name).unwrap();
            dependencies
                .iter()
                .fold(builder, |builder, dependency| builder.is_dependent_on(*dependency));
        }
        registry
    }

    #[test]
    fn test_build_edges() {
        let registry = registry(&[("A", &[]), ("B", &["A"]), ("C", &["a", "B"])]);
        let graph = Graph::build(registry.tasks()).unwrap();

        assert_eq!(graph.nodes(), &["A", "B", "C"]);
        let edges: Vec<(&str, &str)> = graph
            .edges()
            .iter()
            .map(|e| (e.start.as_str(), e.end.as_str()))
            .collect();
        assert_eq!(edges, vec![("A", "B"), ("A", "C"), ("B", "C")]);
        assert_eq!(graph.dependencies_of("C"), vec!["A", "B"]);
        assert_eq!(graph.dependents_of("A"), vec!["B", "C"]);
        assert_eq!(graph.top_level(), vec!["C"]);
    }

    #[test]
    fn test_missing_dependency() {
        let registry = registry(&[("Build", &["Restore"])]);
        let err = Graph::build(registry.tasks()).unwrap_err();

        match err {
            ConfigError::MissingDependency { task, dependency } => {
                assert_eq!(task, "Build");
                assert_eq!(dependency, "Restore");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_dependency() {
        let registry = registry(&[("Build", &["build"])]);
        let err = Graph::build(registry.tasks()).unwrap_err();

        assert!(matches!(err, ConfigError::SelfDependency(ref name) if name == "Build"));
        assert_eq!(err.to_string(), "Task dependency on self detected: 'Build'");
    }

    #[test]
    fn test_non_ascii_self_dependency() {
        let registry = registry(&[("Über", &["ÜBER"])]);
        let err = Graph::build(registry.tasks()).unwrap_err();

        assert!(matches!(err, ConfigError::SelfDependency(ref name) if name == "Über"));
    }

    #[test]
    fn test_non_ascii_dependency_resolves_ignoring_case() {
        let registry = registry(&[("Ärger", &[]), ("Build", &["äRGER"])]);
        let graph = Graph::build(registry.tasks()).unwrap();

        assert_eq!(graph.dependencies_of("BUILD"), vec!["Ärger"]);
        assert_eq!(graph.dependents_of("ärger"), vec!["Build"]);
    }

    #[test]
    fn test_long_chain() {
        let names: Vec<String> = (0..20_000).map(|i| format!("Step{}", i)).collect();
        let mut registry = TaskRegistry::new();
        registry.register_task(names[0].as_str()).unwrap();
        for pair in names.windows(2) {
            registry
                .register_task(pair[1].as_str())
                .unwrap()
                .is_dependent_on(pair[0].as_str());
        }

        let graph = Graph::build(registry.tasks()).unwrap();
        let order = graph.traverse("Step19999").unwrap();
        assert_eq!(order.len(), 20_000);
        assert_eq!(order[0], "Step0");
        assert_eq!(graph.top_level(), vec!["Step19999"]);
    }

    #[test]
    fn test_two_node_cycle() {
        let registry = registry(&[("A", &["B"]), ("B", &["A"])]);
        let err = Graph::build(registry.tasks()).unwrap_err();

        assert!(matches!(err, ConfigError::CircularDependency(ref path) if path == "A -> B -> A"));
    }

    #[test]
    fn test_long_cycle_reports_full_path() {
        let registry = registry(&[
            ("Start", &["A"]),
            ("A", &["B"]),
            ("B", &["C"]),
            ("C", &["A"]),
        ]);
        let err = Graph::build(registry.tasks()).unwrap_err();

        match err {
            ConfigError::CircularDependency(path) => assert_eq!(path, "A -> B -> C -> A"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dependee_merged_into_edges() {
        let mut registry = TaskRegistry::new();
        registry.register_task("Default").unwrap();
        registry.register_task("Lint").unwrap().is_dependee_of("default");

        let graph = Graph::build(registry.tasks()).unwrap();
        assert_eq!(graph.dependencies_of("Default"), vec!["Lint"]);
    }

    #[test]
    fn test_dependee_duplicate_of_dependency_is_one_edge() {
        let mut registry = TaskRegistry::new();
        registry.register_task("Lint").unwrap().is_dependee_of("Default");
        registry.register_task("Default").unwrap().is_dependent_on("Lint");

        let graph = Graph::build(registry.tasks()).unwrap();
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_missing_dependee() {
        let mut registry = TaskRegistry::new();
        registry.register_task("Lint").unwrap().is_dependee_of("Ship");

        let err = Graph::build(registry.tasks()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingDependee { ref task, ref dependee } if task == "Lint" && dependee == "Ship"
        ));
    }

    #[test]
    fn test_cycle_through_dependee() {
        let mut registry = TaskRegistry::new();
        registry.register_task("A").unwrap().is_dependent_on("B");
        registry.register_task("B").unwrap().is_dependee_of("A").is_dependent_on("A");

        let err = Graph::build(registry.tasks()).unwrap_err();
        assert!(matches!(err, ConfigError::CircularDependency(_)));
    }
}
