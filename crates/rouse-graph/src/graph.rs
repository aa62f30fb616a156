//! Dependency graph structure with bidirectional indexing.

use std::collections::{HashMap, HashSet};

use rouse_units::UnitName;

use crate::error::GraphError;

/// A unit dependency graph with bidirectional indexing.
///
/// The graph maintains indices for both directions of a requirement edge:
/// the units a given unit requires, and the units that depend on it. Units
/// are remembered in insertion order so that validation and ordering are
/// deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Priority of each unit, keyed by name.
    priorities: HashMap<UnitName, i32>,
    /// Units in the order they were added.
    insertion: Vec<UnitName>,
    /// Requirements of each unit (outgoing edges).
    requirements: HashMap<UnitName, Vec<UnitName>>,
    /// Dependents of each unit (incoming edges).
    dependents: HashMap<UnitName, Vec<UnitName>>,
}

impl DependencyGraph {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit to the graph.
    ///
    /// If a unit with the same name already exists, its priority is
    /// replaced and its position in the insertion order is kept.
    pub fn add_unit(&mut self, name: impl Into<UnitName>, priority: i32) {
        let unit = name.into();
        if self.priorities.insert(unit.clone(), priority).is_none() {
            self.insertion.push(unit.clone());
        }
        self.requirements.entry(unit.clone()).or_default();
        self.dependents.entry(unit).or_default();
    }

    /// Adds a requirement edge: `unit` needs `requirement` active first.
    ///
    /// Both units should already be present in the graph; [`Self::validate`]
    /// reports requirements that name unknown units.
    pub fn add_dependency(&mut self, unit: impl Into<UnitName>, requirement: impl Into<UnitName>) {
        let dependent = unit.into();
        let required = requirement.into();
        self.requirements
            .entry(dependent.clone())
            .or_default()
            .push(required.clone());
        self.dependents.entry(required).or_default().push(dependent);
    }

    /// Returns the priority of the given unit.
    #[must_use]
    pub fn priority_of(&self, name: &UnitName) -> Option<i32> {
        self.priorities.get(name).copied()
    }

    /// Returns the units the given unit directly requires.
    pub fn requirements_of(&self, name: &UnitName) -> impl Iterator<Item = &UnitName> {
        self.requirements.get(name).into_iter().flatten()
    }

    /// Returns the units that directly depend on the given unit.
    pub fn dependents_of(&self, name: &UnitName) -> impl Iterator<Item = &UnitName> {
        self.dependents.get(name).into_iter().flatten()
    }

    /// Returns all units in insertion order.
    pub fn units(&self) -> impl Iterator<Item = &UnitName> {
        self.insertion.iter()
    }

    /// Returns whether the graph contains the given unit.
    #[must_use]
    pub fn contains(&self, name: &UnitName) -> bool {
        self.priorities.contains_key(name)
    }

    /// Returns the number of units in the graph.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.insertion.len()
    }

    /// Returns the number of requirement edges in the graph.
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.requirements.values().map(Vec::len).sum()
    }

    /// Returns whether the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insertion.is_empty()
    }

    /// Checks that every requirement names a known unit and that the edges
    /// are acyclic.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownDependency`] for the first dangling
    /// requirement in insertion order, or [`GraphError::CycleDetected`]
    /// naming the members of the first cycle found.
    pub fn validate(&self) -> Result<(), GraphError> {
        for unit in &self.insertion {
            for requirement in self.requirements_of(unit) {
                if !self.priorities.contains_key(requirement) {
                    return Err(GraphError::unknown_dependency(
                        unit.clone(),
                        requirement.clone(),
                    ));
                }
            }
        }
        if let Some(members) = self.find_cycle() {
            return Err(GraphError::cycle_detected(members));
        }
        Ok(())
    }

    /// Finds a cycle in the requirement edges, if any.
    ///
    /// The returned path repeats the entry unit at the end, so `a -> b -> a`
    /// comes back as `[a, b, a]`.
    fn find_cycle(&self) -> Option<Vec<UnitName>> {
        let mut visited = HashSet::new();
        for start in &self.insertion {
            let mut path = Vec::new();
            if let Some(cycle) = self.walk_cycle(start, &mut visited, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn walk_cycle(
        &self,
        current: &UnitName,
        visited: &mut HashSet<UnitName>,
        path: &mut Vec<UnitName>,
    ) -> Option<Vec<UnitName>> {
        if let Some(position) = path.iter().position(|name| name == current) {
            let mut cycle = path.split_off(position);
            cycle.push(current.clone());
            return Some(cycle);
        }
        if visited.contains(current) {
            return None;
        }
        path.push(current.clone());
        for requirement in self.requirements_of(current) {
            if let Some(cycle) = self.walk_cycle(requirement, visited, path) {
                return Some(cycle);
            }
        }
        path.pop();
        visited.insert(current.clone());
        None
    }
}
