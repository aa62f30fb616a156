//! Behaviour-driven tests for the registry and dispatcher surface.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use rouse_units::{
    ActivationSpec, KeyMode, KeySequence, Trigger, TriggerEvent, UnitName, UnitState,
};

use crate::{
    CompletionOutcome, DispatchOutcome, Dispatcher, KeyReplay, Registry, ReplayAdvice,
    SetupError, SetupOutcome, StructuredReporter,
};

// ---------------------------------------------------------------------------
// Typed wrappers for Gherkin step parameters
// ---------------------------------------------------------------------------

/// A quoted string value from a Gherkin feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum SetupBehaviour {
    Ready,
    Deferred,
    Failing,
}

#[derive(Default)]
struct TestWorld {
    registry: Registry,
    dispatcher: Option<Dispatcher<StructuredReporter>>,
    counters: HashMap<UnitName, Rc<Cell<usize>>>,
    record: Vec<UnitName>,
    last_outcome: Option<DispatchOutcome>,
    last_completion: Option<CompletionOutcome>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn register_unit(world: &mut TestWorld, spec: ActivationSpec, behaviour: SetupBehaviour) {
    let runs = Rc::new(Cell::new(0_usize));
    world.counters.insert(spec.name().clone(), Rc::clone(&runs));
    world
        .registry
        .register(spec, move || {
            runs.set(runs.get() + 1);
            match behaviour {
                SetupBehaviour::Ready => Ok(SetupOutcome::Ready),
                SetupBehaviour::Deferred => Ok(SetupOutcome::Deferred),
                SetupBehaviour::Failing => Err(SetupError::new("setup refused")),
            }
        })
        .expect("registration should succeed");
}

/// Finalises the registry on first use so that Given steps can keep
/// registering units.
fn dispatcher(world: &mut TestWorld) -> &mut Dispatcher<StructuredReporter> {
    if world.dispatcher.is_none() {
        let registry = std::mem::take(&mut world.registry);
        let finalised = registry
            .finalise(StructuredReporter::new())
            .expect("registry should finalise");
        world.dispatcher = Some(finalised);
    }
    world.dispatcher.as_mut().expect("dispatcher initialised")
}

fn parse_keys(notation: &str) -> KeySequence {
    notation.parse().expect("valid key notation")
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("an empty registry")]
fn given_empty_registry(world: &mut TestWorld) {
    world.registry = Registry::new();
}

#[given("unit {name} activated by command {command}")]
fn given_command_unit(world: &mut TestWorld, name: QuotedString, command: QuotedString) {
    register_unit(
        world,
        ActivationSpec::new(name.as_str()).with_trigger(Trigger::command(command.as_str())),
        SetupBehaviour::Ready,
    );
}

#[given("unit {name} activated by keys {keys}")]
fn given_key_unit(world: &mut TestWorld, name: QuotedString, keys: QuotedString) {
    register_unit(
        world,
        ActivationSpec::new(name.as_str())
            .with_trigger(Trigger::keys(parse_keys(keys.as_str()), KeyMode::Normal)),
        SetupBehaviour::Ready,
    );
}

#[given("a deferred unit {name} activated by command {command}")]
fn given_deferred_command_unit(world: &mut TestWorld, name: QuotedString, command: QuotedString) {
    register_unit(
        world,
        ActivationSpec::new(name.as_str()).with_trigger(Trigger::command(command.as_str())),
        SetupBehaviour::Deferred,
    );
}

#[given("a deferred unit {name} activated by keys {keys}")]
fn given_deferred_key_unit(world: &mut TestWorld, name: QuotedString, keys: QuotedString) {
    register_unit(
        world,
        ActivationSpec::new(name.as_str())
            .with_trigger(Trigger::keys(parse_keys(keys.as_str()), KeyMode::Normal)),
        SetupBehaviour::Deferred,
    );
}

#[given("a failing unit {name} activated by command {command}")]
fn given_failing_command_unit(world: &mut TestWorld, name: QuotedString, command: QuotedString) {
    register_unit(
        world,
        ActivationSpec::new(name.as_str()).with_trigger(Trigger::command(command.as_str())),
        SetupBehaviour::Failing,
    );
}

#[given("unit {name} with no triggers")]
fn given_plain_unit(world: &mut TestWorld, name: QuotedString) {
    register_unit(
        world,
        ActivationSpec::new(name.as_str()),
        SetupBehaviour::Ready,
    );
}

#[given("unit {name} with priority {priority} and no triggers")]
fn given_prioritised_unit(world: &mut TestWorld, name: QuotedString, priority: i32) {
    register_unit(
        world,
        ActivationSpec::new(name.as_str()).with_priority(priority),
        SetupBehaviour::Ready,
    );
}

#[given("unit {name} activated by command {command} requiring {dependency}")]
fn given_dependent_unit(
    world: &mut TestWorld,
    name: QuotedString,
    command: QuotedString,
    dependency: QuotedString,
) {
    register_unit(
        world,
        ActivationSpec::new(name.as_str())
            .with_trigger(Trigger::command(command.as_str()))
            .with_dependencies(vec![dependency.as_str().into()]),
        SetupBehaviour::Ready,
    );
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the command {name} is invoked")]
fn when_command_invoked(world: &mut TestWorld, name: QuotedString) {
    let outcome = dispatcher(world).dispatch(&TriggerEvent::command(name.as_str()));
    world.record.extend(outcome.activated.iter().cloned());
    world.last_outcome = Some(outcome);
}

#[when("the keys {keys} are pressed")]
fn when_keys_pressed(world: &mut TestWorld, keys: QuotedString) {
    let event = TriggerEvent::keys(parse_keys(keys.as_str()), KeyMode::Normal);
    let outcome = dispatcher(world).dispatch(&event);
    world.record.extend(outcome.activated.iter().cloned());
    world.last_outcome = Some(outcome);
}

#[when("the activation of {name} completes successfully")]
fn when_activation_completes(world: &mut TestWorld, name: QuotedString) {
    let completion = dispatcher(world)
        .complete_activation(name.as_str(), Ok(()))
        .expect("completion should be accepted");
    world.record.extend(completion.activated.iter().cloned());
    world.last_completion = Some(completion);
}

#[when("startup runs")]
fn when_startup_runs(world: &mut TestWorld) {
    let outcome = dispatcher(world).startup();
    world.record.extend(outcome.activated.iter().cloned());
    world.last_outcome = Some(outcome);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("unit {name} is {state}")]
fn then_unit_state(world: &mut TestWorld, name: QuotedString, state: String) {
    let expected = match state.as_str() {
        "pending" => UnitState::Pending,
        "activating" => UnitState::Activating,
        "active" => UnitState::Active,
        "failed" => UnitState::Failed,
        other => panic!("unknown state: {other}"),
    };
    assert_eq!(dispatcher(world).state_of(name.as_str()), Some(expected));
}

#[then("the setup run count for {name} is {count}")]
fn then_setup_run_count(world: &mut TestWorld, name: QuotedString, count: usize) {
    let runs = world
        .counters
        .get(name.as_str())
        .expect("unit should have a counter");
    assert_eq!(runs.get(), count);
}

#[then("the activation record is {order}")]
fn then_activation_record(world: &mut TestWorld, order: QuotedString) {
    let actual: Vec<&str> = world.record.iter().map(UnitName::as_str).collect();
    let expected: Vec<&str> = order.as_str().split(", ").collect();
    assert_eq!(actual, expected);
}

#[then("the swallowed keys are replayed")]
fn then_keys_replayed(world: &mut TestWorld) {
    let outcome = world
        .last_outcome
        .as_ref()
        .expect("dispatch outcome should be set");
    assert!(matches!(outcome.replay, ReplayAdvice::Now(_)));
}

#[then("the replay is withheld")]
fn then_replay_withheld(world: &mut TestWorld) {
    let outcome = world
        .last_outcome
        .as_ref()
        .expect("dispatch outcome should be set");
    assert_eq!(outcome.replay, ReplayAdvice::Withheld);
}

#[then("the completion replays {keys}")]
fn then_completion_replays(world: &mut TestWorld, keys: QuotedString) {
    let completion = world
        .last_completion
        .as_ref()
        .expect("completion outcome should be set");
    assert_eq!(
        completion.replays,
        [KeyReplay {
            sequence: parse_keys(keys.as_str()),
            mode: KeyMode::Normal,
        }]
    );
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/rouse_registry.feature")]
fn rouse_registry_behaviour(world: TestWorld) {
    let _ = world;
}
