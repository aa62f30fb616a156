//! Dependency graph resolution for lazily activated units.
//!
//! This crate owns the structural questions about unit dependencies: which
//! units require which, whether every requirement names a registered unit,
//! whether the requirement edges form a cycle, and in what order a set of
//! units should activate. The registry feeds it one node per registered
//! spec and consults it at finalisation time and on every dispatch.
//!
//! # Core Types
//!
//! - [`DependencyGraph`] - Units with priorities and requirement edges,
//!   indexed in both directions
//! - [`GraphError`] - Unknown-dependency and cycle-detection failures
//!
//! # Ordering
//!
//! [`DependencyGraph::activation_order`] resolves the full graph into a
//! deterministic sequence: units sorted by priority descending, each
//! preceded by its requirements. [`DependencyGraph::order_subset`] applies
//! the same rule to a subset, which is how a dispatch orders the units
//! matched by one trigger.
//!
//! # Example
//!
//! ```
//! use rouse_graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_unit("statusline", 50);
//! graph.add_unit("gruvbox", 1000);
//! graph.add_dependency("statusline", "gruvbox");
//!
//! let order = graph.activation_order()?;
//! assert_eq!(order, ["gruvbox", "statusline"]);
//! # Ok::<(), rouse_graph::GraphError>(())
//! ```

mod error;
mod graph;
mod order;

pub use error::GraphError;
pub use graph::DependencyGraph;

#[cfg(test)]
mod tests;
