//! Conversion of descriptor trees into framework elements.
//!
//! Hydration never fails. A node whose type cannot be resolved logs a warning
//! and hydrates to the null result, and its siblings are unaffected.
//!
//! # Fragments
//!
//! Without an [`on_fragment`](Hydrator::on_fragment) combiner, a fragment
//! hydrates to its **first** non-null child and the remaining children are
//! dropped. Install a combiner whenever fragments may carry several children.

mod native;

use std::collections::HashMap;

use tracing::warn;
use waterui_descriptor::{Descriptor, Kind, Props};

pub use native::{NativeFactory, NativeHydrator};

/// Builds framework elements.
pub trait ElementFactory {
    /// Resolved component a type name maps to.
    type Component;
    /// Element produced by [`create`](Self::create).
    type Element;

    /// Creates an element of `component` with `props` and hydrated `children`.
    fn create(
        &self,
        component: &Self::Component,
        props: Option<Props>,
        children: Vec<Self::Element>,
    ) -> Self::Element;
}

type NullHandler<E> = Box<dyn Fn() -> Option<E> + Send + Sync>;
type FragmentHandler<E> = Box<dyn Fn(Vec<E>) -> Option<E> + Send + Sync>;

/// Generic hydrator with configurable null and fragment handling.
pub struct Hydrator<F: ElementFactory> {
    factory: F,
    components: HashMap<String, F::Component>,
    default_component: Option<F::Component>,
    on_null: Option<NullHandler<F::Element>>,
    on_fragment: Option<FragmentHandler<F::Element>>,
}

impl<F: ElementFactory> Hydrator<F> {
    /// Creates a hydrator with no components mapped.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            components: HashMap::new(),
            default_component: None,
            on_null: None,
            on_fragment: None,
        }
    }

    /// Maps type `name` to `component`.
    #[must_use]
    pub fn component(mut self, name: impl Into<String>, component: F::Component) -> Self {
        self.components.insert(name.into(), component);
        self
    }

    /// Component used for types without a mapping.
    #[must_use]
    pub fn default_component(mut self, component: F::Component) -> Self {
        self.default_component = Some(component);
        self
    }

    /// Result for a null root, an empty node or an unresolved type.
    #[must_use]
    pub fn on_null(mut self, handler: impl Fn() -> Option<F::Element> + Send + Sync + 'static) -> Self {
        self.on_null = Some(Box::new(handler));
        self
    }

    /// Combines the non-null hydrated children of a fragment.
    #[must_use]
    pub fn on_fragment(
        mut self,
        handler: impl Fn(Vec<F::Element>) -> Option<F::Element> + Send + Sync + 'static,
    ) -> Self {
        self.on_fragment = Some(Box::new(handler));
        self
    }

    /// The element factory.
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Hydrates `descriptor`.
    pub fn hydrate(&self, descriptor: Option<&Descriptor>) -> Option<F::Element> {
        let Some(node) = descriptor else {
            return self.null();
        };

        match node.kind() {
            Kind::Empty => self.null(),
            Kind::Fragment => {
                let children = self.hydrate_children(node);
                match &self.on_fragment {
                    Some(combine) => combine(children),
                    None => children.into_iter().next(),
                }
            }
            Kind::Named(ty) => {
                let Some(component) = self
                    .components
                    .get(ty)
                    .or(self.default_component.as_ref())
                else {
                    warn!(ty, "no component for descriptor type");
                    return self.null();
                };
                let children = self.hydrate_children(node);
                Some(
                    self.factory
                        .create(component, Some(node.props_with_key()), children),
                )
            }
        }
    }

    fn hydrate_children(&self, node: &Descriptor) -> Vec<F::Element> {
        node.child_nodes()
            .iter()
            .filter_map(|child| self.hydrate(Some(child)))
            .collect()
    }

    fn null(&self) -> Option<F::Element> {
        self.on_null.as_ref().and_then(|handler| handler())
    }
}

impl<F: ElementFactory + core::fmt::Debug> core::fmt::Debug for Hydrator<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hydrator")
            .field("factory", &self.factory)
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("has_default", &self.default_component.is_some())
            .field("has_on_null", &self.on_null.is_some())
            .field("has_on_fragment", &self.on_fragment.is_some())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::{Element, TreeFactory};
    use super::*;

    fn hydrator() -> Hydrator<TreeFactory> {
        Hydrator::new(TreeFactory)
            .component("a", "A".to_owned())
            .component("b", "B".to_owned())
            .component("list", "List".to_owned())
    }

    fn props(value: serde_json::Value) -> Option<Props> {
        value.as_object().cloned()
    }

    #[test]
    fn null_and_empty_use_on_null() {
        let plain = hydrator();
        assert_eq!(plain.hydrate(None), None);
        assert_eq!(plain.hydrate(Some(&Descriptor::empty())), None);

        let placeholder = hydrator().on_null(|| Some(Element::leaf("Placeholder", None)));
        assert_eq!(
            placeholder.hydrate(None),
            Some(Element::leaf("Placeholder", None))
        );
        assert_eq!(
            placeholder.hydrate(Some(&Descriptor::empty())),
            Some(Element::leaf("Placeholder", None))
        );
    }

    #[test]
    fn named_nodes_get_props_with_key_and_children() {
        let tree = Descriptor::new("list").key("main").children([
            Descriptor::new("a").prop("n", 1),
            Descriptor::empty(),
            Descriptor::new("b"),
        ]);
        let element = hydrator().hydrate(Some(&tree)).unwrap();

        assert_eq!(element.component, "List");
        assert_eq!(element.props, props(json!({ "key": "main" })));
        assert_eq!(
            element.children,
            [
                Element::leaf("A", props(json!({ "n": 1 }))),
                Element::leaf("B", props(json!({}))),
            ]
        );
    }

    // A fragment without a combiner keeps only its first child.
    #[test]
    fn fragment_without_combiner_keeps_first_child() {
        let fragment = Descriptor::fragment([Descriptor::new("a"), Descriptor::new("b")]);
        let hydrator = hydrator();
        assert_eq!(
            hydrator.hydrate(Some(&fragment)),
            hydrator.hydrate(Some(&Descriptor::new("a")))
        );
        assert_eq!(hydrator.hydrate(Some(&Descriptor::fragment(Vec::new()))), None);
    }

    // Null children are skipped before the first one is picked.
    #[test]
    fn fragment_without_combiner_skips_leading_null_children() {
        let fragment = Descriptor::fragment([Descriptor::empty(), Descriptor::new("a")]);
        let hydrator = hydrator();
        assert_eq!(
            hydrator.hydrate(Some(&fragment)),
            Some(Element::leaf("A", props(json!({}))))
        );
        assert_eq!(
            hydrator.hydrate(Some(&Descriptor::fragment([Descriptor::empty()]))),
            None
        );
    }

    #[test]
    fn fragment_combiner_sees_every_non_null_child() {
        let fragment = Descriptor::fragment([
            Descriptor::new("a"),
            Descriptor::empty(),
            Descriptor::new("b"),
        ]);
        let hydrator = hydrator().on_fragment(|children| {
            Some(Element {
                component: "Group".to_owned(),
                props: None,
                children,
            })
        });
        let group = hydrator.hydrate(Some(&fragment)).unwrap();
        let names: Vec<_> = group.children.iter().map(|c| c.component.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn unknown_types_use_default_or_hydrate_to_null() {
        let tree = Descriptor::new("list").children([Descriptor::new("mystery"), Descriptor::new("a")]);

        let strict = hydrator().hydrate(Some(&tree)).unwrap();
        assert_eq!(strict.children.len(), 1);
        assert_eq!(strict.children[0].component, "A");

        let lenient = hydrator()
            .default_component("Unknown".to_owned())
            .hydrate(Some(&tree))
            .unwrap();
        assert_eq!(lenient.children[0].component, "Unknown");
        assert_eq!(lenient.children.len(), 2);
    }
}
