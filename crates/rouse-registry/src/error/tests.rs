use rouse_graph::GraphError;
use rouse_units::{ActivationSpec, UnitName, UnitState};
use rstest::rstest;

use super::{ActivationError, RegistryError};
use crate::setup::SetupError;

#[rstest]
#[case::duplicate(
    RegistryError::duplicate_unit("finder"),
    "unit finder is already registered"
)]
#[case::unknown_dependency(
    RegistryError::unknown_dependency("finder", "plenary"),
    "unit finder depends on unknown unit plenary"
)]
#[case::cycle(
    RegistryError::DependencyCycle {
        members: vec!["a".into(), "b".into(), "a".into()],
    },
    "dependency cycle detected: a -> b -> a"
)]
fn registry_error_display(#[case] error: RegistryError, #[case] rendered: &str) {
    assert_eq!(error.to_string(), rendered);
}

#[test]
fn invalid_spec_wraps_validation_failure() {
    let spec = ActivationSpec::new("  ");
    let failure = spec.validate().expect_err("blank name should be rejected");
    let error = RegistryError::from(failure);
    assert_eq!(
        error.to_string(),
        "invalid activation spec: unit name must not be empty"
    );
}

#[rstest]
#[case::unknown_dependency(
    GraphError::UnknownDependency {
        unit: "finder".into(),
        dependency: "plenary".into(),
    },
    RegistryError::unknown_dependency("finder", "plenary")
)]
#[case::cycle(
    GraphError::CycleDetected {
        members: vec!["a".into(), "b".into(), "a".into()],
    },
    RegistryError::DependencyCycle {
        members: vec!["a".into(), "b".into(), "a".into()],
    }
)]
fn graph_errors_map_to_registry_errors(
    #[case] graph_error: GraphError,
    #[case] expected: RegistryError,
) {
    assert_eq!(RegistryError::from(graph_error), expected);
}

#[rstest]
#[case::dependency_failed(
    ActivationError::dependency_failed("finder", "plenary"),
    "unit finder blocked by failed dependency plenary"
)]
#[case::setup(
    ActivationError::setup("finder", SetupError::new("socket refused")),
    "unit finder failed during setup: socket refused"
)]
#[case::unknown_unit(ActivationError::unknown_unit("ghost"), "unknown unit ghost")]
#[case::unexpected_completion(
    ActivationError::unexpected_completion("finder", UnitState::Active),
    "unit finder is active, not awaiting completion"
)]
fn activation_error_display(#[case] error: ActivationError, #[case] rendered: &str) {
    assert_eq!(error.to_string(), rendered);
}

#[rstest]
#[case::dependency_failed(ActivationError::dependency_failed("finder", "plenary"))]
#[case::setup(ActivationError::setup("finder", SetupError::new("boom")))]
#[case::unexpected_completion(ActivationError::unexpected_completion(
    "finder",
    UnitState::Pending
))]
fn activation_errors_name_the_affected_unit(#[case] error: ActivationError) {
    assert_eq!(error.unit(), &UnitName::from("finder"));
}

#[test]
fn unknown_unit_reports_the_requested_name() {
    let error = ActivationError::unknown_unit("ghost");
    assert_eq!(error.unit().as_str(), "ghost");
}

#[test]
fn setup_error_preserves_host_message() {
    let source = SetupError::new("could not open database");
    assert_eq!(source.message(), "could not open database");
    assert_eq!(source.to_string(), "could not open database");
}
