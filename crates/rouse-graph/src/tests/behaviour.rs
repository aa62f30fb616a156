//! Behaviour-driven tests for dependency ordering.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::{DependencyGraph, GraphError};
use rouse_units::UnitName;

#[derive(Default)]
struct TestWorld {
    graph: DependencyGraph,
    result: Option<Result<Vec<UnitName>, GraphError>>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}

#[given("an empty dependency graph")]
fn given_empty_graph(world: &RefCell<TestWorld>) {
    world.borrow_mut().graph = DependencyGraph::new();
}

#[given("unit {name} with priority {priority}")]
fn given_unit(world: &RefCell<TestWorld>, name: String, priority: i32) {
    world
        .borrow_mut()
        .graph
        .add_unit(strip_quotes(&name), priority);
}

#[given("unit {unit} requires {requirement}")]
fn given_requirement(world: &RefCell<TestWorld>, unit: String, requirement: String) {
    world
        .borrow_mut()
        .graph
        .add_dependency(strip_quotes(&unit), strip_quotes(&requirement));
}

#[when("the activation order is resolved")]
fn when_order_resolved(world: &RefCell<TestWorld>) {
    let mut world_state = world.borrow_mut();
    let result = world_state.graph.activation_order();
    world_state.result = Some(result);
}

#[then("the order is {order}")]
fn then_order_is(world: &RefCell<TestWorld>, order: String) {
    let world_state = world.borrow();
    let resolved = world_state
        .result
        .as_ref()
        .expect("result missing")
        .as_ref()
        .expect("ordering failed");
    let actual: Vec<&str> = resolved.iter().map(UnitName::as_str).collect();
    let expected: Vec<&str> = strip_quotes(&order).split(", ").collect();
    assert_eq!(actual, expected);
}

#[then("resolution fails with a cycle naming {cycle}")]
fn then_cycle_detected(world: &RefCell<TestWorld>, cycle: String) {
    let world_state = world.borrow();
    let error = world_state
        .result
        .as_ref()
        .expect("result missing")
        .as_ref()
        .expect_err("expected ordering to fail");
    assert!(matches!(error, GraphError::CycleDetected { .. }));
    assert_eq!(
        error.to_string(),
        format!("dependency cycle detected: {}", strip_quotes(&cycle))
    );
}

#[scenario(path = "tests/features/dependency_graph.feature")]
fn dependency_graph_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
