//! Walking call-site trees.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::activation::{Constructor, ImplementationType, Value};
use crate::call_site::{CallSite, CallSiteKind, ParameterCallSite};
use crate::descriptors::Factory;
use crate::service_type::ServiceType;

/// Visitor over a [`CallSite`] tree.
///
/// This is the seam the activation layer uses: implement one method per
/// call-site kind and let [`visit`](CallSiteVisitor::visit) dispatch.
/// Recursing into children is up to the implementation.
pub trait CallSiteVisitor {
    type Output;

    fn visit(&mut self, site: &CallSite) -> Self::Output {
        match site.kind() {
            CallSiteKind::Constructor {
                implementation,
                constructor,
                parameters,
            } => self.visit_constructor(site, implementation, constructor, parameters),
            CallSiteKind::CreateInstance { implementation } => self.visit_create_instance(site, implementation),
            CallSiteKind::Enumerable { item_type, items } => self.visit_enumerable(site, item_type, items),
            CallSiteKind::Constant { value } => self.visit_constant(site, value),
            CallSiteKind::Factory { factory } => self.visit_factory(site, factory),
        }
    }

    fn visit_constructor(
        &mut self,
        site: &CallSite,
        implementation: &ImplementationType,
        constructor: &Constructor,
        parameters: &[ParameterCallSite],
    ) -> Self::Output;

    fn visit_create_instance(&mut self, site: &CallSite, implementation: &ImplementationType) -> Self::Output;

    fn visit_enumerable(&mut self, site: &CallSite, item_type: &ServiceType, items: &[Arc<CallSite>]) -> Self::Output;

    fn visit_constant(&mut self, site: &CallSite, value: &Value) -> Self::Output;

    fn visit_factory(&mut self, site: &CallSite, factory: &Factory) -> Self::Output;
}

/// Renders a call site as an indented tree.
struct Describe {
    out: String,
    indent: usize,
}

impl Describe {
    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{:width$}{}", "", text, width = self.indent * 2);
    }

    fn lifetime(site: &CallSite) -> &'static str {
        site.lifetime().map(|l| l.as_str()).unwrap_or("collection")
    }

    fn nested(&mut self, site: &CallSite) {
        self.indent += 1;
        self.visit(site);
        self.indent -= 1;
    }
}

impl CallSiteVisitor for Describe {
    type Output = ();

    fn visit_constructor(
        &mut self,
        site: &CallSite,
        implementation: &ImplementationType,
        constructor: &Constructor,
        parameters: &[ParameterCallSite],
    ) {
        self.line(format_args!(
            "{} [{}] => {}",
            site.service_type(),
            Self::lifetime(site),
            constructor.signature(implementation.service_type())
        ));
        for (declared, parameter) in constructor.parameters().iter().zip(parameters) {
            match parameter {
                ParameterCallSite::Service(child) => self.nested(child),
                ParameterCallSite::Default(value) => {
                    self.indent += 1;
                    self.line(format_args!("{} = default({})", declared.service_type(), value.type_name()));
                    self.indent -= 1;
                }
            }
        }
    }

    fn visit_create_instance(&mut self, site: &CallSite, implementation: &ImplementationType) {
        self.line(format_args!(
            "{} [{}] => new {}",
            site.service_type(),
            Self::lifetime(site),
            implementation.service_type()
        ));
    }

    fn visit_enumerable(&mut self, site: &CallSite, _item_type: &ServiceType, items: &[Arc<CallSite>]) {
        self.line(format_args!("{} ({} item(s))", site.service_type(), items.len()));
        for item in items {
            self.nested(item);
        }
    }

    fn visit_constant(&mut self, site: &CallSite, value: &Value) {
        self.line(format_args!("{} [singleton] => instance of {}", site.service_type(), value.type_name()));
    }

    fn visit_factory(&mut self, site: &CallSite, factory: &Factory) {
        self.line(format_args!(
            "{} [{}] => factory {}",
            site.service_type(),
            Self::lifetime(site),
            factory.type_name()
        ));
    }
}

impl CallSite {
    /// Indented text rendering of the whole plan, for diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_callsite::{ServiceCollection, ServiceType, ImplementationType, Constructor, Parameter};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(ServiceType::named("IFoo"), ImplementationType::named("Foo"));
    /// services.add_transient(
    ///     ServiceType::named("Widget"),
    ///     ImplementationType::named("Widget").constructor(Constructor::new([Parameter::new("IFoo")])),
    /// );
    ///
    /// let site = services.build().resolve_call_site(&ServiceType::named("Widget"), None).unwrap();
    /// assert_eq!(
    ///     site.describe(),
    ///     "Widget [transient] => Widget(IFoo)\n  IFoo [singleton] => new Foo\n",
    /// );
    /// ```
    pub fn describe(&self) -> String {
        let mut describe = Describe {
            out: String::new(),
            indent: 0,
        };
        describe.visit(self);
        describe.out
    }
}
