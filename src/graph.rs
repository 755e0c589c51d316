use crate::task::Task;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Task dependency graph with an edge `dependency -> task`.
///
/// Dependencies naming unknown tasks are left out; the scheduler reports them.
pub struct DependencyGraph {
    graph: DiGraph<usize, ()>,
    names: Vec<String>,
}

impl DependencyGraph {
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut name_to_index: HashMap<String, NodeIndex> = HashMap::with_capacity(tasks.len());
        let mut names = Vec::with_capacity(tasks.len());

        // Add nodes first
        for (position, task) in tasks.iter().enumerate() {
            let node_ix = graph.add_node(position);
            name_to_index.insert(task.name.clone(), node_ix);
            names.push(task.name.clone());
        }

        // Add edges: dependency -> task
        for task in tasks {
            if let Some(dependency) = task.dependency.as_deref() {
                if let (Some(&u), Some(&v)) =
                    (name_to_index.get(dependency), name_to_index.get(&task.name))
                {
                    graph.add_edge(u, v, ());
                }
            }
        }

        Self { graph, names }
    }

    /// Dependency cycles, each listed in task insertion order.
    ///
    /// A task depending on itself is a cycle of one.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<usize>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || self
                        .graph
                        .find_edge(component[0], component[0])
                        .is_some()
            })
            .map(|component| {
                let mut positions: Vec<usize> =
                    component.into_iter().map(|ix| self.graph[ix]).collect();
                positions.sort_unstable();
                positions
            })
            .collect();
        cycles.sort_by_key(|positions| positions[0]);
        cycles
            .into_iter()
            .map(|positions| {
                positions
                    .into_iter()
                    .map(|position| self.names[position].clone())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, dependency: Option<&str>) -> Task {
        let task = Task::new(name, 1, "Alice");
        match dependency {
            Some(dep) => task.with_dependency(dep),
            None => task,
        }
    }

    #[test]
    fn builds_edges_from_dependencies() {
        // A -> {B, C}
        let tasks = vec![task("A", None), task("B", Some("A")), task("C", Some("A"))];
        let dag = DependencyGraph::build(&tasks);
        assert_eq!(dag.graph.node_count(), 3);
        assert_eq!(dag.graph.edge_count(), 2);
        assert!(dag.cycles().is_empty());
    }

    #[test]
    fn finds_two_node_cycle_and_self_loop() {
        let tasks = vec![
            task("Solo", Some("Solo")),
            task("Free", None),
            task("A", Some("B")),
            task("B", Some("A")),
            task("Tail", Some("B")),
        ];
        let dag = DependencyGraph::build(&tasks);
        assert_eq!(
            dag.cycles(),
            vec![
                vec!["Solo".to_string()],
                vec!["A".to_string(), "B".to_string()]
            ]
        );
    }

    #[test]
    fn unknown_dependency_adds_no_edge() {
        let tasks = vec![task("A", Some("Ghost"))];
        let dag = DependencyGraph::build(&tasks);
        assert_eq!(dag.graph.edge_count(), 0);
    }
}
