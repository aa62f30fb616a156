//! Trigger dispatch and the unit activation engine.
//!
//! The [`Dispatcher`] is produced by [`crate::Registry::finalise`] and owns
//! every unit's runtime state. The host drives it from a single event loop:
//! [`Dispatcher::startup`] runs the eager sweep, [`Dispatcher::dispatch`]
//! serves observed triggers, and [`Dispatcher::complete_activation`] lands
//! deferred setups. All activation follows one rule: a unit's dependencies
//! become active before its own setup runs, and a setup runs at most once.
//!
//! Dependents of a unit whose setup deferred are parked rather than
//! activated out of order; the completion that settles the unit resumes
//! them. Key replays swallowed by a dispatch follow the same discipline:
//! they are released by the completion that settles the last unit the key
//! press started, and are dropped when any of those units failed.

use std::collections::{HashMap, HashSet};

use rouse_graph::DependencyGraph;
use rouse_units::{
    ActivationSpec, KeyMode, KeySequence, TriggerEvent, UnitName, UnitState,
};

use crate::error::ActivationError;
use crate::registry::RegisteredUnit;
use crate::reporter::ActivationReporter;
use crate::setup::{Setup, SetupError, SetupOutcome};

mod outcome;

pub use outcome::{
    ActivationProgress, CompletionOutcome, DispatchOutcome, KeyReplay, ReplayAdvice,
};

const ACTIVATION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::activation");

/// Runtime state of a unit, with the failure cause attached to the terminal
/// failed state.
enum RuntimeState {
    Pending,
    Activating,
    Active,
    Failed(ActivationError),
}

impl RuntimeState {
    const fn as_unit_state(&self) -> UnitState {
        match self {
            Self::Pending => UnitState::Pending,
            Self::Activating => UnitState::Activating,
            Self::Active => UnitState::Active,
            Self::Failed(_) => UnitState::Failed,
        }
    }
}

/// A registered unit plus its mutable runtime state. The setup is taken out
/// of the option when it runs, which is what makes reruns impossible.
struct UnitRuntime {
    spec: ActivationSpec,
    setup: Option<Box<dyn Setup>>,
    state: RuntimeState,
}

/// A key replay waiting for in-flight activations to settle.
struct PendingReplay {
    replay: KeyReplay,
    blocking: HashSet<UnitName>,
    failed: bool,
}

/// Transitions accumulated over one dispatcher entry point call.
#[derive(Default)]
struct ActivationLog {
    activated: Vec<UnitName>,
    deferred: Vec<UnitName>,
    waiting: Vec<UnitName>,
    failures: Vec<ActivationError>,
}

/// Serves triggers against a finalised unit set.
///
/// # Example
///
/// ```
/// use rouse_registry::{ActivationProgress, Registry, SetupOutcome, StructuredReporter};
/// use rouse_units::{ActivationSpec, Trigger, TriggerEvent};
///
/// let mut registry = Registry::new();
/// registry.register(
///     ActivationSpec::new("finder").with_trigger(Trigger::command("Finder")),
///     || Ok(SetupOutcome::Ready),
/// )?;
///
/// let mut dispatcher = registry.finalise(StructuredReporter::new())?;
/// let outcome = dispatcher.dispatch(&TriggerEvent::command("Finder"));
/// assert_eq!(outcome.activated, ["finder"]);
///
/// // Repeating the trigger is a no-op; the unit is already active.
/// assert_eq!(
///     dispatcher.activate("finder")?,
///     ActivationProgress::AlreadyActive,
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Dispatcher<R> {
    units: Vec<UnitRuntime>,
    index: HashMap<UnitName, usize>,
    graph: DependencyGraph,
    eager_floor: i32,
    reporter: R,
    parked: HashSet<UnitName>,
    waiters: HashMap<UnitName, Vec<UnitName>>,
    replays: Vec<PendingReplay>,
}

impl<R> std::fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("eager_floor", &self.eager_floor)
            .finish_non_exhaustive()
    }
}

impl<R> Dispatcher<R> {
    pub(crate) fn new(
        registered: Vec<RegisteredUnit>,
        graph: DependencyGraph,
        eager_floor: i32,
        reporter: R,
    ) -> Self {
        let mut units = Vec::with_capacity(registered.len());
        let mut index = HashMap::with_capacity(registered.len());
        for unit in registered {
            index.insert(unit.spec.name().clone(), units.len());
            units.push(UnitRuntime {
                spec: unit.spec,
                setup: Some(unit.setup),
                state: RuntimeState::Pending,
            });
        }
        Self {
            units,
            index,
            graph,
            eager_floor,
            reporter,
            parked: HashSet::new(),
            waiters: HashMap::new(),
            replays: Vec::new(),
        }
    }

    /// Returns the current state of the named unit.
    #[must_use]
    pub fn state_of(&self, name: &str) -> Option<UnitState> {
        self.index
            .get(name)
            .and_then(|slot| self.units.get(*slot))
            .map(|unit| unit.state.as_unit_state())
    }

    /// Returns the recorded failure of the named unit, if it failed.
    #[must_use]
    pub fn fault(&self, name: &str) -> Option<&ActivationError> {
        let slot = self.index.get(name)?;
        match self.units.get(*slot).map(|unit| &unit.state) {
            Some(RuntimeState::Failed(error)) => Some(error),
            _ => None,
        }
    }

    /// Returns the units the given event would demand, in activation order,
    /// without activating anything.
    ///
    /// Matched units are sorted by priority descending; a matched unit whose
    /// transitive requirements include another matched unit comes after it.
    #[must_use]
    pub fn candidates(&self, event: &TriggerEvent) -> Vec<UnitName> {
        let matched: Vec<UnitName> = self
            .units
            .iter()
            .filter(|unit| {
                unit.spec
                    .triggers()
                    .iter()
                    .any(|trigger| trigger.matches(event))
            })
            .map(|unit| unit.spec.name().clone())
            .collect();
        self.graph.order_subset(&matched)
    }

    /// Returns the units the startup sweep would visit, in activation
    /// order: trigger-less units at or above the eager floor, requirements
    /// first.
    #[must_use]
    pub fn startup_order(&self) -> Vec<UnitName> {
        let eager: Vec<UnitName> = self
            .units
            .iter()
            .filter(|unit| unit.spec.is_eager() && unit.spec.priority() >= self.eager_floor)
            .map(|unit| unit.spec.name().clone())
            .collect();
        self.graph.order_subset(&eager)
    }

    /// Returns the full activation order over every registered unit.
    ///
    /// The dependency graph was validated when the registry was finalised,
    /// so ordering cannot fail here.
    #[must_use]
    pub fn activation_order(&self) -> Vec<UnitName> {
        self.graph.activation_order().unwrap_or_default()
    }

    /// Returns the spec of the named unit.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ActivationSpec> {
        self.index
            .get(name)
            .and_then(|slot| self.units.get(*slot))
            .map(|unit| &unit.spec)
    }

    /// Returns every registered spec, in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &ActivationSpec> {
        self.units.iter().map(|unit| &unit.spec)
    }

    /// Returns the number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` when no units are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the number of key replays still waiting on completions.
    #[must_use]
    pub fn pending_replays(&self) -> usize {
        self.replays.len()
    }

    /// Returns the configured startup priority floor.
    #[must_use]
    pub const fn eager_floor(&self) -> i32 {
        self.eager_floor
    }

    fn runtime(&self, name: &UnitName) -> Option<&UnitRuntime> {
        self.index
            .get(name)
            .and_then(|slot| self.units.get(*slot))
    }

    fn runtime_mut(&mut self, name: &UnitName) -> Option<&mut UnitRuntime> {
        let slot = *self.index.get(name)?;
        self.units.get_mut(slot)
    }

    fn unit_state(&self, name: &UnitName) -> Option<UnitState> {
        self.runtime(name).map(|unit| unit.state.as_unit_state())
    }
}

impl<R> Dispatcher<R>
where
    R: ActivationReporter,
{
    /// Runs the eager startup sweep.
    ///
    /// Activates every trigger-less unit whose priority is at or above the
    /// eager floor, highest priority first, requirements before dependents.
    /// Failures are confined to the failing unit and its dependents; the
    /// sweep continues past them.
    pub fn startup(&mut self) -> DispatchOutcome {
        let matched = self.startup_order();
        let mut log = ActivationLog::default();
        for name in &matched {
            self.advance(name, &mut log);
        }
        self.reporter
            .startup_finished(log.activated.len(), log.failures.len());
        DispatchOutcome {
            matched,
            activated: log.activated,
            deferred: log.deferred,
            waiting: log.waiting,
            failures: log.failures,
            replay: ReplayAdvice::None,
        }
    }

    /// Serves one observed trigger event.
    ///
    /// Matched units are activated in priority order with requirements
    /// first. Units that are already active or failed are left untouched,
    /// so repeated triggers are no-ops. For key events the outcome also
    /// says whether to replay the swallowed sequence.
    pub fn dispatch(&mut self, event: &TriggerEvent) -> DispatchOutcome {
        let matched = self.candidates(event);
        let engaged: Vec<UnitName> = matched
            .iter()
            .filter(|name| {
                self.unit_state(name)
                    .is_some_and(|state| !state.is_settled())
            })
            .cloned()
            .collect();
        let mut log = ActivationLog::default();
        for name in &matched {
            self.advance(name, &mut log);
        }
        let replay = match event {
            TriggerEvent::Keys { sequence, mode } => {
                self.replay_advice(sequence, *mode, &engaged)
            }
            _ => ReplayAdvice::None,
        };
        DispatchOutcome {
            matched,
            activated: log.activated,
            deferred: log.deferred,
            waiting: log.waiting,
            failures: log.failures,
            replay,
        }
    }

    /// Activates one unit directly, dependencies first.
    ///
    /// Idempotent: an active unit reports
    /// [`ActivationProgress::AlreadyActive`], a deferred activation still in
    /// flight reports [`ActivationProgress::InFlight`], and a previously
    /// failed unit reports [`ActivationProgress::Inert`] without running
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::UnknownUnit`] for an unregistered name,
    /// or the failure that marked the unit failed during this call.
    pub fn activate(&mut self, name: &str) -> Result<ActivationProgress, ActivationError> {
        let Some((key, _)) = self.index.get_key_value(name) else {
            return Err(ActivationError::unknown_unit(name));
        };
        let unit = key.clone();
        match self.runtime(&unit).map(|runtime| &runtime.state) {
            None => return Err(ActivationError::unknown_unit(unit)),
            Some(RuntimeState::Active) => return Ok(ActivationProgress::AlreadyActive),
            Some(RuntimeState::Activating) => return Ok(ActivationProgress::InFlight),
            Some(RuntimeState::Failed(_)) => return Ok(ActivationProgress::Inert),
            Some(RuntimeState::Pending) => {}
        }
        if self.parked.contains(&unit) {
            return Ok(ActivationProgress::Waiting);
        }
        let mut log = ActivationLog::default();
        self.begin_activation(&unit, &mut log);
        match self.runtime(&unit).map(|runtime| &runtime.state) {
            Some(RuntimeState::Active) => Ok(ActivationProgress::Activated),
            Some(RuntimeState::Activating) => Ok(ActivationProgress::Deferred),
            Some(RuntimeState::Pending) | None => Ok(ActivationProgress::Waiting),
            Some(RuntimeState::Failed(error)) => Err(error.clone()),
        }
    }

    /// Lands the result of a deferred setup.
    ///
    /// On success the unit becomes active, parked dependents resume, and
    /// any key replay this completion unblocked is released in the outcome.
    /// On failure the unit and its parked dependents become failed and the
    /// replays they were blocking are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::UnknownUnit`] for an unregistered name,
    /// or [`ActivationError::UnexpectedCompletion`] when the unit has no
    /// deferred activation in flight.
    pub fn complete_activation(
        &mut self,
        name: &str,
        result: Result<(), SetupError>,
    ) -> Result<CompletionOutcome, ActivationError> {
        let Some((key, _)) = self.index.get_key_value(name) else {
            return Err(ActivationError::unknown_unit(name));
        };
        let unit = key.clone();
        match self.unit_state(&unit) {
            Some(UnitState::Activating) => {}
            Some(state) => return Err(ActivationError::unexpected_completion(unit, state)),
            None => return Err(ActivationError::unknown_unit(unit)),
        }
        let state = match &result {
            Ok(()) => UnitState::Active,
            Err(_) => UnitState::Failed,
        };
        let mut log = ActivationLog::default();
        match result {
            Ok(()) => self.mark_active(&unit, &mut log),
            Err(error) => {
                self.fail_unit(&unit, ActivationError::setup(unit.clone(), error), &mut log);
            }
        }
        let replays = self.settle_replays(&log);
        Ok(CompletionOutcome {
            unit,
            state,
            activated: log.activated,
            deferred: log.deferred,
            waiting: log.waiting,
            failures: log.failures,
            replays,
        })
    }

    /// Moves one unit as far along the activation lifecycle as it can go
    /// right now. Settled and in-flight units are left alone.
    fn advance(&mut self, name: &UnitName, log: &mut ActivationLog) {
        if self.unit_state(name) == Some(UnitState::Pending) && !self.parked.contains(name) {
            self.begin_activation(name, log);
        }
    }

    /// Activates the unit's dependencies in declared order, then runs its
    /// setup. Parks the unit behind the first dependency that is still
    /// activating; fails it on the first dependency that failed.
    fn begin_activation(&mut self, name: &UnitName, log: &mut ActivationLog) {
        let Some(runtime) = self.runtime(name) else {
            return;
        };
        let dependencies = runtime.spec.dependencies().to_vec();
        for dependency in &dependencies {
            self.advance(dependency, log);
            match self.unit_state(dependency) {
                Some(UnitState::Active) => {}
                Some(UnitState::Failed) | None => {
                    self.fail_unit(
                        name,
                        ActivationError::dependency_failed(name.clone(), dependency.clone()),
                        log,
                    );
                    return;
                }
                Some(UnitState::Pending | UnitState::Activating) => {
                    self.park(name, dependency, log);
                    return;
                }
            }
        }
        self.run_setup(name, log);
    }

    /// Runs the unit's setup procedure. Taking the setup out of its slot is
    /// what guarantees it can never run twice.
    fn run_setup(&mut self, name: &UnitName, log: &mut ActivationLog) {
        let Some(runtime) = self.runtime_mut(name) else {
            return;
        };
        let Some(mut setup) = runtime.setup.take() else {
            return;
        };
        runtime.state = RuntimeState::Activating;
        self.reporter.unit_activating(name);
        match setup.run() {
            Ok(SetupOutcome::Ready) => self.mark_active(name, log),
            Ok(SetupOutcome::Deferred) => {
                self.reporter.unit_deferred(name);
                log.deferred.push(name.clone());
            }
            Err(error) => {
                self.fail_unit(name, ActivationError::setup(name.clone(), error), log);
            }
        }
    }

    /// Marks the unit active and resumes every dependent parked on it.
    fn mark_active(&mut self, name: &UnitName, log: &mut ActivationLog) {
        let Some(runtime) = self.runtime_mut(name) else {
            return;
        };
        runtime.state = RuntimeState::Active;
        self.reporter.unit_active(name);
        log.activated.push(name.clone());
        if let Some(waiters) = self.waiters.remove(name) {
            for waiter in waiters {
                self.parked.remove(&waiter);
                self.advance(&waiter, log);
            }
        }
    }

    /// Parks the unit behind a dependency whose activation is in flight.
    /// The completion that settles the dependency resumes it.
    fn park(&mut self, unit: &UnitName, blocking: &UnitName, log: &mut ActivationLog) {
        self.parked.insert(unit.clone());
        self.waiters
            .entry(blocking.clone())
            .or_default()
            .push(unit.clone());
        self.reporter.unit_blocked(unit, blocking);
        log.waiting.push(unit.clone());
    }

    /// Marks the unit failed and cascades the failure to every dependent
    /// parked on it. The reporter sees each unit fail exactly once; a unit
    /// that is already failed is left untouched.
    fn fail_unit(&mut self, name: &UnitName, error: ActivationError, log: &mut ActivationLog) {
        let Some(runtime) = self.runtime_mut(name) else {
            return;
        };
        if matches!(runtime.state, RuntimeState::Failed(_)) {
            return;
        }
        runtime.state = RuntimeState::Failed(error.clone());
        self.parked.remove(name);
        self.reporter.unit_failed(&error);
        log.failures.push(error);
        let dependents = self.graph.dependents_of(name).count();
        if dependents > 0 {
            tracing::debug!(
                target: ACTIVATION_TARGET,
                unit = %name,
                dependents,
                "failure blocks declared dependents"
            );
        }
        if let Some(waiters) = self.waiters.remove(name) {
            for waiter in waiters {
                let cascade = ActivationError::dependency_failed(waiter.clone(), name.clone());
                self.fail_unit(&waiter, cascade, log);
            }
        }
    }

    /// Decides what to do with a swallowed key sequence after its dispatch,
    /// based on where the engaged units (those not yet settled when the
    /// keys arrived) ended up.
    fn replay_advice(
        &mut self,
        sequence: &KeySequence,
        mode: KeyMode,
        engaged: &[UnitName],
    ) -> ReplayAdvice {
        if engaged.is_empty() {
            return ReplayAdvice::None;
        }
        let mut blocking = HashSet::new();
        let mut failed = false;
        for name in engaged {
            match self.unit_state(name) {
                Some(UnitState::Active) => {}
                Some(UnitState::Failed) | None => failed = true,
                Some(UnitState::Pending | UnitState::Activating) => {
                    blocking.insert(name.clone());
                }
            }
        }
        let replay = KeyReplay {
            sequence: sequence.clone(),
            mode,
        };
        if blocking.is_empty() {
            if failed {
                tracing::debug!(
                    target: ACTIVATION_TARGET,
                    keys = %replay.sequence,
                    "replay suppressed after activation failure"
                );
                return ReplayAdvice::None;
            }
            return ReplayAdvice::Now(replay);
        }
        self.replays.push(PendingReplay {
            replay,
            blocking,
            failed,
        });
        ReplayAdvice::Withheld
    }

    /// Removes freshly settled units from the blocking sets of withheld
    /// replays. A replay whose last blocker went active is released; one
    /// that saw any blocker fail is dropped.
    fn settle_replays(&mut self, log: &ActivationLog) -> Vec<KeyReplay> {
        if self.replays.is_empty() {
            return Vec::new();
        }
        let failed: HashSet<&UnitName> = log.failures.iter().map(ActivationError::unit).collect();
        let mut released = Vec::new();
        let mut kept = Vec::new();
        for mut pending in std::mem::take(&mut self.replays) {
            for name in &log.activated {
                pending.blocking.remove(name);
            }
            for name in &failed {
                if pending.blocking.remove(*name) {
                    pending.failed = true;
                }
            }
            if pending.blocking.is_empty() {
                if pending.failed {
                    tracing::debug!(
                        target: ACTIVATION_TARGET,
                        keys = %pending.replay.sequence,
                        "replay suppressed after activation failure"
                    );
                } else {
                    released.push(pending.replay);
                }
            } else {
                kept.push(pending);
            }
        }
        self.replays = kept;
        released
    }
}
