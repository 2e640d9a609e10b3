//! Description and tree views of the registered tasks
//!
//! Both build and validate the graph, then only print. No criteria is evaluated and no
//! action is invoked.

use crate::error::Result;
use crate::graph::Graph;
use crate::task::{same_task, task_key, TaskRegistry, DEFAULT_TASK_NAME};
use crate::ui::Log;

const NAME_COLUMN_WIDTH: usize = 30;

/// Render the task list with descriptions, in registration order
pub fn describe_tasks(registry: &TaskRegistry) -> Result<String> {
    Graph::build(registry.tasks())?;

    let width = registry
        .tasks()
        .iter()
        .map(|task| task.name().len() + 2)
        .max()
        .unwrap_or(0)
        .max(NAME_COLUMN_WIDTH);

    let mut output = format!("{:<width$}{}\n", "Task", "Description", width = width);
    output.push_str(&"=".repeat(width + 20));
    output.push('\n');
    for task in registry.tasks() {
        let description = task.description().unwrap_or_default();
        let line = format!("{:<width$}{}", task.name(), description, width = width);
        output.push_str(line.trim_end());
        output.push('\n');
    }
    Ok(output)
}

/// Render every top-level task with its dependencies below it
///
/// Top-level tasks are the ones nothing depends on; the default task comes first, the
/// rest alphabetically. Tasks without actions of their own are marked `(aggregate)`.
pub fn render_tree(registry: &TaskRegistry) -> Result<String> {
    let graph = Graph::build(registry.tasks())?;

    let mut roots = graph.top_level();
    roots.sort_by_key(|name| {
        (
            !same_task(name, DEFAULT_TASK_NAME),
            task_key(name),
        )
    });

    let mut output = String::new();
    for root in roots {
        output.push_str(&label(registry, root));
        output.push('\n');
        render_children(registry, &graph, root, "", &mut output);
        output.push('\n');
    }
    Ok(output)
}

fn render_children(registry: &TaskRegistry, graph: &Graph, name: &str, prefix: &str, output: &mut String) {
    let children = graph.dependencies_of(name);
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let last = i + 1 == count;
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&label(registry, child));
        output.push('\n');
        render_children(registry, graph, child, &format!("{}{}", prefix, indent), output);
    }
}

fn label(registry: &TaskRegistry, name: &str) -> String {
    match registry.find_task(name) {
        Some(task) if task.has_actions() => name.to_string(),
        _ => format!("{} (aggregate)", name),
    }
}

/// Write the description view to the log
pub fn print_descriptions(registry: &TaskRegistry, log: &dyn Log) -> Result<()> {
    for line in describe_tasks(registry)?.lines() {
        log.information(line);
    }
    Ok(())
}

/// Write the tree view to the log
pub fn print_tree(registry: &TaskRegistry, log: &dyn Log) -> Result<()> {
    for line in render_tree(registry)?.lines() {
        log.information(line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, KilnError};
    use crate::ui::{MemoryLog, Verbosity};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn registry() -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        registry
            .register_task("Clean")
            .unwrap()
            .description("Remove build output")
            .does(|_| Ok(()));
        registry
            .register_task("Build")
            .unwrap()
            .description("Compile the solution")
            .is_dependent_on("Clean")
            .does(|_| Ok(()));
        registry
            .register_task("Test")
            .unwrap()
            .is_dependent_on("Build")
            .does(|_| Ok(()));
        registry
            .register_task("Lint")
            .unwrap()
            .description("Static analysis")
            .does(|_| Ok(()));
        registry
            .register_task("Default")
            .unwrap()
            .is_dependent_on("Test")
            .is_dependent_on("Lint");
        registry.register_task("Archive").unwrap().does(|_| Ok(()));
        registry
    }

    #[test]
    fn test_describe_tasks() {
        let output = describe_tasks(&registry()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("Task"));
        assert!(lines[0].ends_with("Description"));
        assert!(lines[2].starts_with("Clean"));
        assert!(lines[2].ends_with("Remove build output"));
        assert_eq!(lines[4], "Test");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_render_tree() {
        let output = render_tree(&registry()).unwrap();
        let expected = "\
Default (aggregate)
├── Test
│   └── Build
│       └── Clean
└── Lint

Archive

";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_introspection_never_evaluates_criteria() {
        let evaluated = Arc::new(AtomicBool::new(false));
        let flag = evaluated.clone();
        let mut registry = TaskRegistry::new();
        registry
            .register_task("Publish")
            .unwrap()
            .with_criteria(move |_| {
                flag.store(true, Ordering::SeqCst);
                Ok(true)
            })
            .does(|_| Ok(()));

        let log = MemoryLog::new(Verbosity::Normal);
        print_descriptions(&registry, &log).unwrap();
        print_tree(&registry, &log).unwrap();

        assert!(!evaluated.load(Ordering::SeqCst));
        assert!(log.contains("Publish"));
    }

    #[test]
    fn test_introspection_validates_graph() {
        let mut registry = TaskRegistry::new();
        registry.register_task("A").unwrap().is_dependent_on("A");

        assert!(matches!(
            render_tree(&registry),
            Err(KilnError::Config(ConfigError::SelfDependency(_)))
        ));
        assert!(describe_tasks(&registry).is_err());
    }
}
