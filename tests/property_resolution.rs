/// Property-based tests for call-site resolution
///
/// These tests verify that constructor selection and collection ordering
/// follow the documented rules regardless of the concrete registrations.

use ferrous_callsite::{
    CallSiteKind, Constructor, DiError, ImplementationType, Parameter, ServiceCollection, ServiceType,
};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

const SERVICES: [&str; 6] = ["S0", "S1", "S2", "S3", "S4", "S5"];

fn constructor_of(indices: &BTreeSet<usize>) -> Constructor {
    Constructor::new(indices.iter().map(|&i| Parameter::new(SERVICES[i])))
}

fn parameter_names(site: &ferrous_callsite::CallSite) -> Vec<String> {
    match site.kind() {
        CallSiteKind::Constructor { constructor, .. } => constructor
            .parameters()
            .iter()
            .map(|p| p.service_type().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

// Property: the constructor over every registered service wins against any
// strict subset of it, wherever it is declared
proptest! {
    #[test]
    fn superset_constructor_always_wins(
        registered in prop::collection::btree_set(0..SERVICES.len(), 1..=SERVICES.len()),
        others in prop::collection::vec(prop::collection::btree_set(0..SERVICES.len(), 0..SERVICES.len()), 0..5),
        position in 0usize..6,
    ) {
        let mut sc = ServiceCollection::new();
        for &i in &registered {
            sc.add_singleton(ServiceType::named(SERVICES[i]), ImplementationType::named(SERVICES[i]));
        }

        // Keep constructors that are strict subsets or need an unregistered service
        let mut constructors: Vec<BTreeSet<usize>> = others
            .into_iter()
            .filter(|set| set != &registered)
            .collect();
        constructors.insert(position.min(constructors.len()), registered.clone());

        let widget = constructors
            .iter()
            .fold(ImplementationType::named("Widget"), |w, set| w.constructor(constructor_of(set)));
        sc.add_transient(ServiceType::named("Widget"), widget);

        let site = sc.build().resolve_call_site(&ServiceType::named("Widget"), None).unwrap();
        let expected: Vec<String> = registered.iter().map(|&i| SERVICES[i].to_string()).collect();
        prop_assert_eq!(parameter_names(&site), expected);
    }
}

// Property: resolution is a pure function of the registry
proptest! {
    #[test]
    fn resolution_is_deterministic(
        registered in prop::collection::btree_set(0..SERVICES.len(), 0..=SERVICES.len()),
        constructors in prop::collection::vec(prop::collection::btree_set(0..SERVICES.len(), 0..4), 1..5),
    ) {
        let build = || {
            let mut sc = ServiceCollection::new();
            for &i in &registered {
                sc.add_singleton(ServiceType::named(SERVICES[i]), ImplementationType::named(SERVICES[i]));
            }
            let widget = constructors
                .iter()
                .fold(ImplementationType::named("Widget"), |w, set| w.constructor(constructor_of(set)));
            sc.add_transient(ServiceType::named("Widget"), widget);
            sc.build()
        };

        let first = build().resolve_call_site(&ServiceType::named("Widget"), None);
        let second = build().resolve_call_site(&ServiceType::named("Widget"), None);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a.describe(), b.describe()),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a.is_ok(), b.is_ok()),
        }
    }
}

// Property: any failure is one of the selection errors, never NotFound for a
// registered root
proptest! {
    #[test]
    fn registered_root_fails_only_with_selection_errors(
        registered in prop::collection::btree_set(0..SERVICES.len(), 0..=SERVICES.len()),
        constructors in prop::collection::vec(prop::collection::btree_set(0..SERVICES.len(), 0..4), 1..5),
    ) {
        let mut sc = ServiceCollection::new();
        for &i in &registered {
            sc.add_singleton(ServiceType::named(SERVICES[i]), ImplementationType::named(SERVICES[i]));
        }
        let widget = constructors
            .iter()
            .fold(ImplementationType::named("Widget"), |w, set| w.constructor(constructor_of(set)));
        sc.add_transient(ServiceType::named("Widget"), widget);

        match sc.build().resolve_call_site(&ServiceType::named("Widget"), None) {
            Ok(_) => {}
            Err(DiError::UnresolvableParameter { .. })
            | Err(DiError::NoConstructorResolvable { .. })
            | Err(DiError::AmbiguousConstructors { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}

// Property: collections list every registration in registration order
proptest! {
    #[test]
    fn collection_preserves_registration_order(count in 0usize..12) {
        let names: Vec<String> = (0..count).map(|i| format!("Plugin{}", i)).collect();
        let mut sc = ServiceCollection::new();
        for name in &names {
            sc.add_transient(ServiceType::named("IPlugin"), ImplementationType::named(name.as_str()));
        }
        let factory = sc.build();

        let site = factory
            .resolve_call_site(&ServiceType::collection(ServiceType::named("IPlugin")), None)
            .unwrap();
        let order: Vec<String> = site
            .children()
            .iter()
            .map(|item| item.implementation_type().unwrap().to_string())
            .collect();
        prop_assert_eq!(&order, &names);

        if count > 0 {
            let direct = factory.resolve_call_site(&ServiceType::named("IPlugin"), None).unwrap();
            prop_assert!(Arc::ptr_eq(site.children()[count - 1], &direct));
        }
    }
}
