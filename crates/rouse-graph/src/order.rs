//! Priority-aware activation ordering.
//!
//! Ordering follows one rule applied twice: visit units by priority
//! descending (insertion order breaks ties), and emit each unit's
//! requirements before the unit itself. [`DependencyGraph::activation_order`]
//! applies it to the whole graph; [`DependencyGraph::order_subset`] applies
//! it to the units matched by a single dispatch.

use std::cmp::Reverse;
use std::collections::HashSet;

use rouse_units::UnitName;

use crate::error::GraphError;
use crate::graph::DependencyGraph;

impl DependencyGraph {
    /// Resolves the full activation order.
    ///
    /// Units are sorted by priority descending, each preceded by its
    /// transitive requirements. A requirement with lower priority still
    /// activates early when a high-priority unit needs it.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if a requirement names an unknown unit or
    /// the edges form a cycle.
    pub fn activation_order(&self) -> Result<Vec<UnitName>, GraphError> {
        self.validate()?;
        let mut roots: Vec<&UnitName> = self.units().collect();
        roots.sort_by_key(|name| Reverse(self.priority_of(name).unwrap_or_default()));

        let mut order = Vec::with_capacity(self.unit_count());
        let mut emitted = HashSet::with_capacity(self.unit_count());
        for root in roots {
            self.emit_requirements_first(root, &mut emitted, &mut order);
        }
        Ok(order)
    }

    /// Orders a subset of units the way a dispatch activates them.
    ///
    /// Members are sorted by priority descending (the given order breaks
    /// ties); a member whose transitive requirements include another member
    /// comes after it. Requirements outside the subset are traversed but not
    /// emitted, and names unknown to the graph are kept as requirement-free
    /// members.
    #[must_use]
    pub fn order_subset(&self, members: &[UnitName]) -> Vec<UnitName> {
        let member_set: HashSet<&UnitName> = members.iter().collect();
        let mut sorted: Vec<&UnitName> = members.iter().collect();
        sorted.sort_by_key(|name| Reverse(self.priority_of(name).unwrap_or_default()));

        let mut order = Vec::with_capacity(members.len());
        let mut visited = HashSet::new();
        for member in sorted {
            self.collect_members(member, &member_set, &mut visited, &mut order);
        }
        order
    }

    fn emit_requirements_first(
        &self,
        name: &UnitName,
        emitted: &mut HashSet<UnitName>,
        order: &mut Vec<UnitName>,
    ) {
        if emitted.contains(name) {
            return;
        }
        emitted.insert(name.clone());
        for requirement in self.requirements_of(name) {
            self.emit_requirements_first(requirement, emitted, order);
        }
        order.push(name.clone());
    }

    fn collect_members(
        &self,
        name: &UnitName,
        members: &HashSet<&UnitName>,
        visited: &mut HashSet<UnitName>,
        order: &mut Vec<UnitName>,
    ) {
        if visited.contains(name) {
            return;
        }
        visited.insert(name.clone());
        for requirement in self.requirements_of(name) {
            self.collect_members(requirement, members, visited, order);
        }
        if members.contains(name) {
            order.push(name.clone());
        }
    }
}
