//! Run order computation

use crate::error::{ConfigError, ConfigResult};
use crate::graph::Graph;

impl Graph {
    /// Tasks needed to run `target`, dependencies first
    ///
    /// The result holds the target and its transitive dependencies, each once. Dependencies
    /// are visited in declaration order before the task itself, so independent branches keep
    /// the order in which they were declared.
    pub fn traverse(&self, target: &str) -> ConfigResult<Vec<String>> {
        let target = self
            .position(target)
            .ok_or_else(|| ConfigError::TargetNotFound(target.to_string()))?;

        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack: Vec<(usize, usize)> = vec![(target, 0)];
        visited[target] = true;

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            match self.dependencies[node].get(next) {
                Some(&dependency) => {
                    frame.1 += 1;
                    if !visited[dependency] {
                        visited[dependency] = true;
                        stack.push((dependency, 0));
                    }
                }
                None => {
                    order.push(self.nodes[node].clone());
                    stack.pop();
                }
            }
        }
        Ok(order)
    }
}
