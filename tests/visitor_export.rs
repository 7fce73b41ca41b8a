use ferrous_callsite::{
    AnyArc, CallSite, CallSiteGraph, CallSiteVisitor, Constructor, Factory, ImplementationType, Lifetime, NodeKind,
    Parameter, ParameterCallSite, ServiceCollection, ServiceType, Value,
};
use std::sync::Arc;

fn ty(name: &'static str) -> ServiceType {
    ServiceType::named(name)
}

struct Greeter {
    greeting: String,
    punctuation: char,
}

/// Minimal activation layer: builds instances straight from the plan.
struct Activate;

impl CallSiteVisitor for Activate {
    type Output = AnyArc;

    fn visit_constructor(
        &mut self,
        _site: &CallSite,
        implementation: &ImplementationType,
        constructor: &Constructor,
        parameters: &[ParameterCallSite],
    ) -> AnyArc {
        let args: Vec<AnyArc> = parameters
            .iter()
            .map(|p| match p {
                ParameterCallSite::Service(child) => self.visit(child),
                ParameterCallSite::Default(value) => value.as_any().clone(),
            })
            .collect();
        match constructor.activator() {
            Some(activator) => activator(&args),
            None => Arc::new(implementation.service_type().to_string()),
        }
    }

    fn visit_create_instance(&mut self, _site: &CallSite, implementation: &ImplementationType) -> AnyArc {
        Arc::new(implementation.service_type().to_string())
    }

    fn visit_enumerable(&mut self, _site: &CallSite, _item_type: &ServiceType, items: &[Arc<CallSite>]) -> AnyArc {
        let built: Vec<AnyArc> = items.iter().map(|item| self.visit(item)).collect();
        Arc::new(built)
    }

    fn visit_constant(&mut self, _site: &CallSite, value: &Value) -> AnyArc {
        value.as_any().clone()
    }

    fn visit_factory(&mut self, _site: &CallSite, factory: &Factory) -> AnyArc {
        let make = factory.downcast_ref::<fn() -> String>().expect("string factory");
        Arc::new(make())
    }
}

fn greeter_services() -> ServiceCollection {
    let mut sc = ServiceCollection::new();
    sc.add_instance(ty("Greeting"), String::from("Hello"));
    sc.add_transient(
        ty("Greeter"),
        ImplementationType::named("Greeter").constructor(
            Constructor::new([
                Parameter::new("Greeting"),
                Parameter::new("char").named("punctuation").with_default('!'),
            ])
            .with_activator(|args| {
                let greeting = args[0].downcast_ref::<String>().unwrap().clone();
                let punctuation = *args[1].downcast_ref::<char>().unwrap();
                Arc::new(Greeter { greeting, punctuation })
            }),
        ),
    );
    sc
}

#[test]
fn test_visitor_activates_from_plan() {
    let site = greeter_services().build().resolve_call_site(&ty("Greeter"), None).unwrap();
    let built = Activate.visit(&site);
    let greeter = built.downcast_ref::<Greeter>().unwrap();
    assert_eq!(format!("{}{}", greeter.greeting, greeter.punctuation), "Hello!");
}

#[test]
fn test_visitor_walks_collections_and_factories() {
    fn make_label() -> String {
        "from-factory".to_string()
    }

    let mut sc = ServiceCollection::new();
    sc.add_transient(ty("ILabel"), ImplementationType::named("StaticLabel"));
    sc.add_factory(ty("ILabel"), Lifetime::Transient, make_label as fn() -> String);

    let site = sc
        .build()
        .resolve_call_site(&ServiceType::collection(ty("ILabel")), None)
        .unwrap();
    let built = Activate.visit(&site);
    let labels: Vec<String> = built
        .downcast_ref::<Vec<AnyArc>>()
        .unwrap()
        .iter()
        .map(|item| item.downcast_ref::<String>().unwrap().clone())
        .collect();
    assert_eq!(labels, ["StaticLabel", "from-factory"]);
}

#[test]
fn test_describe_renders_tree() {
    let site = greeter_services().build().resolve_call_site(&ty("Greeter"), None).unwrap();
    assert_eq!(
        site.describe(),
        "Greeter [transient] => Greeter(Greeting, char)\n  \
         Greeting [singleton] => instance of alloc::string::String\n  \
         char = default(char)\n"
    );
}

#[test]
fn test_describe_collection() {
    let mut sc = ServiceCollection::new();
    sc.add_transient(ty("IPlugin"), ImplementationType::named("P1"));
    sc.add_scoped(ty("IPlugin"), ImplementationType::named("P2"));

    let site = sc
        .build()
        .resolve_call_site(&ServiceType::collection(ty("IPlugin")), None)
        .unwrap();
    assert_eq!(
        site.describe(),
        "IEnumerable<IPlugin> (2 item(s))\n  IPlugin [transient] => new P1\n  IPlugin [scoped] => new P2\n"
    );
}

fn diamond() -> Arc<CallSite> {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(ty("Shared"), ImplementationType::named("Shared"));
    sc.add_transient(
        ty("Left"),
        ImplementationType::named("Left").constructor(Constructor::new([Parameter::new("Shared")])),
    );
    sc.add_transient(
        ty("Right"),
        ImplementationType::named("Right").constructor(Constructor::new([Parameter::new("Shared")])),
    );
    sc.add_transient(
        ty("App"),
        ImplementationType::named("App").constructor(Constructor::new([Parameter::new("Left"), Parameter::new("Right")])),
    );
    sc.build().resolve_call_site(&ty("App"), None).unwrap()
}

#[test]
fn test_graph_deduplicates_shared_call_sites() {
    let graph = CallSiteGraph::from_call_site(&diamond());

    assert_eq!(graph.root().unwrap().service_type, "App");
    let names: Vec<&str> = graph.nodes.iter().map(|n| n.service_type.as_str()).collect();
    assert_eq!(names, ["App", "Left", "Shared", "Right"]);
    assert_eq!(graph.edges.len(), 4);

    // Both Left and Right point at the single Shared node
    let shared = graph.nodes.iter().find(|n| n.service_type == "Shared").unwrap();
    assert_eq!(graph.edges.iter().filter(|e| e.to == shared.id).count(), 2);
    assert_eq!(shared.kind, NodeKind::CreateInstance);
    assert_eq!(shared.lifetime.as_deref(), Some("singleton"));
}

#[test]
fn test_graph_skips_default_arguments() {
    let site = greeter_services().build().resolve_call_site(&ty("Greeter"), None).unwrap();
    let graph = CallSiteGraph::from_call_site(&site);

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.nodes[1].kind, NodeKind::Constant);
    assert_eq!(graph.edges[0].position, 0);
}

#[cfg(feature = "graph-export")]
#[test]
fn test_graph_json_export() {
    let graph = CallSiteGraph::from_call_site(&diamond());
    let json = graph.to_json().unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["nodes"][0]["service_type"], "App");
    assert_eq!(parsed["nodes"][2]["kind"], "create_instance");
    assert_eq!(parsed["edges"].as_array().unwrap().len(), 4);

    let back: CallSiteGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(back, graph);
}
