//! Task dependency graph
//!
//! Nodes are registered task names; an edge `start -> end` means `end` depends on `start`.
//! The graph is rebuilt from the registry for every run or introspection request.

mod build;
mod traverse;

use crate::error::{ConfigError, ConfigResult};
use crate::task::task_key;
use std::collections::HashMap;

/// A directed edge: `end` depends on `start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub start: String,
    pub end: String,
}

/// Validated, acyclic dependency graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    /// Per node, the nodes it depends on in declaration order
    dependencies: Vec<Vec<usize>>,
    /// Per node, the nodes depending on it
    dependents: Vec<Vec<usize>>,
}

impl Graph {
    /// Node names in registration order
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Registered spelling of a node name looked up without regard to case
    pub fn resolve(&self, name: &str) -> ConfigResult<&str> {
        self.position(name)
            .map(|position| self.nodes[position].as_str())
            .ok_or_else(|| ConfigError::TargetNotFound(name.to_string()))
    }

    /// Tasks `name` depends on, in declaration order
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.names(name, &self.dependencies)
    }

    /// Tasks that depend on `name`
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.names(name, &self.dependents)
    }

    /// Nodes nothing depends on, in registration order
    pub fn top_level(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .zip(&self.dependents)
            .filter(|(_, dependents)| dependents.is_empty())
            .map(|(node, _)| node.as_str())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&task_key(name)).copied()
    }

    fn names<'g>(&'g self, name: &str, adjacency: &'g [Vec<usize>]) -> Vec<&'g str> {
        match self.position(name) {
            Some(position) => adjacency[position]
                .iter()
                .map(|&other| self.nodes[other].as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    fn add_node(&mut self, name: &str) {
        self.index.insert(task_key(name), self.nodes.len());
        self.nodes.push(name.to_string());
        self.dependencies.push(Vec::new());
        self.dependents.push(Vec::new());
    }

    /// Record that node `end` depends on node `start`
    fn add_edge(&mut self, start: usize, end: usize) {
        if self.dependencies[end].contains(&start) {
            return;
        }
        self.dependencies[end].push(start);
        self.dependents[start].push(end);
        self.edges.push(Edge {
            start: self.nodes[start].clone(),
            end: self.nodes[end].clone(),
        });
    }
}
