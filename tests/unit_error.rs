use ferrous_callsite::{
    ConstructorSignature, DiError, GenericType, ServiceType, ValidationFailure,
};
use std::error::Error;
use std::sync::Arc;

fn ty(name: &'static str) -> ServiceType {
    ServiceType::named(name)
}

#[test]
fn test_unresolvable_parameter_display() {
    let err = DiError::UnresolvableParameter {
        parameter: ty("IBar"),
        implementation: ty("Widget"),
    };
    assert_eq!(
        err.to_string(),
        "Unable to resolve service for type 'IBar' while attempting to activate 'Widget'"
    );
}

#[test]
fn test_no_constructor_resolvable_display() {
    let err = DiError::NoConstructorResolvable {
        implementation: ty("Widget"),
    };
    assert_eq!(
        err.to_string(),
        "No constructor for type 'Widget' can be instantiated using services from the service container and default values"
    );
}

#[test]
fn test_ambiguous_constructors_display() {
    let err = DiError::AmbiguousConstructors {
        implementation: ty("Widget"),
        candidates: vec![
            ConstructorSignature {
                implementation: ty("Widget"),
                parameters: vec![ty("IFoo")],
            },
            ConstructorSignature {
                implementation: ty("Widget"),
                parameters: vec![ty("IBar")],
            },
        ],
    };
    assert_eq!(
        err.to_string(),
        "Unable to activate type 'Widget'. The following constructors are ambiguous: Widget(IFoo), Widget(IBar)"
    );
}

#[test]
fn test_circular_dependency_display() {
    let err = DiError::CircularDependency(vec![ty("A"), ty("B"), ty("C"), ty("A")]);
    assert_eq!(err.to_string(), "Circular dependency: A -> B -> C -> A");
}

#[test]
fn test_not_found_display() {
    let unnamed = DiError::NotFound {
        service: ty("ILogger"),
        name: None,
    };
    assert_eq!(unnamed.to_string(), "Service not found: ILogger");

    let named = DiError::NotFound {
        service: ty("ICache"),
        name: Some(Arc::from("redis")),
    };
    assert_eq!(named.to_string(), "Service not found: ICache (named 'redis')");
}

#[test]
fn test_generic_display() {
    let closed = GenericType::new("IMap", 2).close([ty("String"), ty("User")]).unwrap();
    let err = DiError::NotFound {
        service: closed,
        name: None,
    };
    assert_eq!(err.to_string(), "Service not found: IMap<String, User>");

    let arity = DiError::GenericArity {
        definition: GenericType::new("IMap", 2),
        expected: 2,
        actual: 1,
    };
    assert_eq!(arity.to_string(), "Generic definition 'IMap<,>' expects 2 type argument(s), got 1");
}

#[test]
fn test_depth_and_option_display() {
    assert_eq!(DiError::DepthExceeded(1024).to_string(), "Max depth 1024 exceeded");
    assert_eq!(
        DiError::InvalidOption {
            key: "FERROUS_DI_CACHE",
            value: "maybe".to_string()
        }
        .to_string(),
        "Invalid value 'maybe' for option FERROUS_DI_CACHE"
    );
}

#[test]
fn test_validation_display() {
    let failures = vec![
        ValidationFailure {
            service_type: ty("A"),
            name: None,
            error: DiError::DepthExceeded(4),
        },
        ValidationFailure {
            service_type: ty("B"),
            name: Some(Arc::from("blue")),
            error: DiError::NoConstructorResolvable { implementation: ty("B") },
        },
    ];
    assert_eq!(failures[0].to_string(), "A: Max depth 4 exceeded");
    assert!(failures[1].to_string().starts_with("B (named 'blue'): No constructor for type 'B'"));

    let err = DiError::Validation(failures);
    assert_eq!(err.to_string(), "2 service registration(s) failed validation");
}

#[test]
fn test_error_trait_and_clone() {
    let err = DiError::CircularDependency(vec![ty("A"), ty("A")]);
    let cloned = err.clone();
    assert_eq!(err.to_string(), cloned.to_string());

    let boxed: Box<dyn Error + Send + Sync> = Box::new(err);
    assert!(boxed.source().is_none());
    assert!(format!("{:?}", boxed).contains("CircularDependency"));
}
