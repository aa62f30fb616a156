//! Unit tests for the rouse-graph crate.

mod graph_tests {
    use crate::graph::DependencyGraph;
    use rouse_units::UnitName;

    #[test]
    fn empty_graph_has_no_units() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.unit_count(), 0);
        assert_eq!(graph.dependency_count(), 0);
    }

    #[test]
    fn can_add_and_query_units() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("finder", 50);
        graph.add_unit("plenary", 50);
        graph.add_dependency("finder", "plenary");

        let finder = UnitName::from("finder");
        let plenary = UnitName::from("plenary");

        assert!(!graph.is_empty());
        assert_eq!(graph.unit_count(), 2);
        assert_eq!(graph.dependency_count(), 1);
        assert!(graph.contains(&finder));
        assert_eq!(graph.priority_of(&finder), Some(50));

        let requirements: Vec<_> = graph.requirements_of(&finder).collect();
        assert_eq!(requirements, [&plenary]);

        let dependents: Vec<_> = graph.dependents_of(&plenary).collect();
        assert_eq!(dependents, [&finder]);
    }

    #[test]
    fn re_adding_a_unit_replaces_its_priority() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("finder", 50);
        graph.add_unit("finder", 75);

        assert_eq!(graph.unit_count(), 1);
        assert_eq!(graph.priority_of(&UnitName::from("finder")), Some(75));
    }

    #[test]
    fn units_iterate_in_insertion_order() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("c", 10);
        graph.add_unit("a", 30);
        graph.add_unit("b", 20);

        let names: Vec<_> = graph.units().map(UnitName::as_str).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }
}

mod validation_tests {
    use crate::error::GraphError;
    use crate::graph::DependencyGraph;

    #[test]
    fn accepts_acyclic_graph() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("finder", 50);
        graph.add_unit("plenary", 50);
        graph.add_dependency("finder", "plenary");

        assert!(graph.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_requirement() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("finder", 50);
        graph.add_dependency("finder", "ghost");

        assert_eq!(
            graph.validate(),
            Err(GraphError::unknown_dependency("finder", "ghost"))
        );
    }

    #[test]
    fn rejects_two_unit_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("a", 50);
        graph.add_unit("b", 50);
        graph.add_dependency("a", "b");
        graph.add_dependency("b", "a");

        let error = graph.validate().expect_err("cycle should be rejected");
        assert_eq!(
            error.to_string(),
            "dependency cycle detected: a -> b -> a"
        );
    }

    #[test]
    fn rejects_self_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("a", 50);
        graph.add_dependency("a", "a");

        let error = graph.validate().expect_err("cycle should be rejected");
        assert!(matches!(error, GraphError::CycleDetected { .. }));
        assert_eq!(error.to_string(), "dependency cycle detected: a -> a");
    }

    #[test]
    fn cycle_report_names_only_the_loop() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("entry", 50);
        graph.add_unit("a", 50);
        graph.add_unit("b", 50);
        graph.add_dependency("entry", "a");
        graph.add_dependency("a", "b");
        graph.add_dependency("b", "a");

        let error = graph.validate().expect_err("cycle should be rejected");
        assert_eq!(
            error.to_string(),
            "dependency cycle detected: a -> b -> a"
        );
    }
}

mod order_tests {
    use crate::graph::DependencyGraph;
    use rouse_units::UnitName;

    fn names(order: &[UnitName]) -> Vec<&str> {
        order.iter().map(UnitName::as_str).collect()
    }

    #[test]
    fn orders_by_priority_descending() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("low", 10);
        graph.add_unit("high", 90);
        graph.add_unit("mid", 50);

        let order = graph.activation_order().expect("acyclic");
        assert_eq!(names(&order), ["high", "mid", "low"]);
    }

    #[test]
    fn insertion_order_breaks_priority_ties() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("first", 50);
        graph.add_unit("second", 50);

        let order = graph.activation_order().expect("acyclic");
        assert_eq!(names(&order), ["first", "second"]);
    }

    #[test]
    fn requirements_come_before_dependents() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("finder", 90);
        graph.add_unit("plenary", 10);
        graph.add_dependency("finder", "plenary");

        let order = graph.activation_order().expect("acyclic");
        assert_eq!(names(&order), ["plenary", "finder"]);
    }

    #[test]
    fn theme_outranks_everything_it_serves() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("statusline", 50);
        graph.add_unit("gruvbox", 1000);
        graph.add_unit("finder", 50);

        let order = graph.activation_order().expect("acyclic");
        assert_eq!(names(&order), ["gruvbox", "statusline", "finder"]);
    }

    #[test]
    fn shared_requirement_is_emitted_once() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("a", 60);
        graph.add_unit("b", 40);
        graph.add_unit("shared", 10);
        graph.add_dependency("a", "shared");
        graph.add_dependency("b", "shared");

        let order = graph.activation_order().expect("acyclic");
        assert_eq!(names(&order), ["shared", "a", "b"]);
    }

    #[test]
    fn ordering_surfaces_validation_errors() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("a", 50);
        graph.add_dependency("a", "ghost");

        assert!(graph.activation_order().is_err());
    }
}

mod subset_tests {
    use crate::graph::DependencyGraph;
    use rouse_units::UnitName;

    fn names(order: &[UnitName]) -> Vec<&str> {
        order.iter().map(UnitName::as_str).collect()
    }

    #[test]
    fn subset_sorts_by_priority() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("low", 10);
        graph.add_unit("high", 90);
        graph.add_unit("other", 50);

        let order = graph.order_subset(&["low".into(), "high".into()]);
        assert_eq!(names(&order), ["high", "low"]);
    }

    #[test]
    fn subset_puts_member_requirements_first() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("finder", 90);
        graph.add_unit("plenary", 10);
        graph.add_dependency("finder", "plenary");

        let order = graph.order_subset(&["finder".into(), "plenary".into()]);
        assert_eq!(names(&order), ["plenary", "finder"]);
    }

    #[test]
    fn subset_skips_non_members_on_the_way() {
        let mut graph = DependencyGraph::new();
        graph.add_unit("a", 90);
        graph.add_unit("between", 50);
        graph.add_unit("c", 10);
        graph.add_dependency("a", "between");
        graph.add_dependency("between", "c");

        let order = graph.order_subset(&["a".into(), "c".into()]);
        assert_eq!(names(&order), ["c", "a"]);
    }

    #[test]
    fn subset_keeps_unknown_members() {
        let graph = DependencyGraph::new();
        let order = graph.order_subset(&["ghost".into()]);
        assert_eq!(names(&order), ["ghost"]);
    }

    #[test]
    fn empty_subset_orders_to_nothing() {
        let graph = DependencyGraph::new();
        assert!(graph.order_subset(&[]).is_empty());
    }
}

mod behaviour;
