//! Result types returned by dispatch and completion operations.

use rouse_units::{KeyMode, KeySequence, UnitName, UnitState};

use crate::error::ActivationError;

/// A swallowed key sequence the host should feed back into its input queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReplay {
    /// The key sequence that triggered the dispatch.
    pub sequence: KeySequence,
    /// Mode the sequence was observed in.
    pub mode: KeyMode,
}

/// What the host should do with the key sequence that caused a dispatch.
///
/// Key triggers swallow the pressed sequence; once the demanded units are
/// active the host replays it so the freshly installed mapping can handle
/// it. Each swallowed sequence is replayed at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayAdvice {
    /// Nothing to replay. Either the dispatch was not key-driven, no unit
    /// still needed activating, or an activation failure suppressed the
    /// replay.
    None,
    /// Every demanded unit is active; replay the sequence immediately.
    Now(KeyReplay),
    /// At least one demanded unit deferred its activation. The replay is
    /// held back and released through
    /// [`crate::Dispatcher::complete_activation`] once the stragglers
    /// settle.
    Withheld,
}

/// Per-unit result of a direct [`crate::Dispatcher::activate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationProgress {
    /// The unit and its dependencies became active synchronously.
    Activated,
    /// The unit was active before the call; nothing ran.
    AlreadyActive,
    /// The unit's setup started and deferred its completion.
    Deferred,
    /// The unit's setup deferred during an earlier call and has not
    /// completed yet.
    InFlight,
    /// The unit is parked behind a dependency that is still activating.
    Waiting,
    /// The unit failed during an earlier attempt and stays failed;
    /// nothing ran.
    Inert,
}

/// Everything a single dispatch did.
///
/// Vectors list units in the order the dispatcher visited them, with
/// requirements ahead of their dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Units whose triggers matched the observed event, in activation
    /// order.
    pub matched: Vec<UnitName>,
    /// Units that became active during this call, dependencies included.
    pub activated: Vec<UnitName>,
    /// Units whose setup deferred completion during this call.
    pub deferred: Vec<UnitName>,
    /// Units parked behind an activation still in flight.
    pub waiting: Vec<UnitName>,
    /// Per-unit failures recorded during this call.
    pub failures: Vec<ActivationError>,
    /// What to do with the key sequence that caused the dispatch.
    pub replay: ReplayAdvice,
}

/// Everything a single [`crate::Dispatcher::complete_activation`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// The unit whose deferred setup completed.
    pub unit: UnitName,
    /// State the unit settled into.
    pub state: UnitState,
    /// Units that became active during this call, the completed unit
    /// included on success.
    pub activated: Vec<UnitName>,
    /// Resumed units whose setup deferred completion in turn.
    pub deferred: Vec<UnitName>,
    /// Resumed units that parked behind another in-flight activation.
    pub waiting: Vec<UnitName>,
    /// Per-unit failures recorded during this call.
    pub failures: Vec<ActivationError>,
    /// Withheld key replays released by this completion.
    pub replays: Vec<KeyReplay>,
}
