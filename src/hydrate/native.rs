use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::warn;
use waterui_descriptor::{Descriptor, Kind, Props};

use super::ElementFactory;

/// Element factory of a framework with a native fragment component.
pub trait NativeFactory: ElementFactory {
    /// The framework's fragment marker.
    fn fragment(&self) -> Self::Component;
}

/// Hydrator for frameworks with native fragments.
///
/// Fragments hydrate to the framework fragment holding every non-null child.
/// Null roots, empty nodes and unmapped types hydrate to `None`, except that
/// an unmapped type is handed to the fallback component when one is set. The
/// fallback receives `{ "type", "props" }` of the original node as its props.
pub struct NativeHydrator<F: NativeFactory> {
    factory: F,
    components: HashMap<String, F::Component>,
    fallback: Option<F::Component>,
}

impl<F: NativeFactory> NativeHydrator<F> {
    /// Creates a hydrator with no components mapped.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            components: HashMap::new(),
            fallback: None,
        }
    }

    /// Maps type `name` to `component`.
    #[must_use]
    pub fn component(mut self, name: impl Into<String>, component: F::Component) -> Self {
        self.components.insert(name.into(), component);
        self
    }

    /// Component rendering types without a mapping.
    #[must_use]
    pub fn fallback(mut self, component: F::Component) -> Self {
        self.fallback = Some(component);
        self
    }

    /// Hydrates `descriptor`.
    pub fn hydrate(&self, descriptor: Option<&Descriptor>) -> Option<F::Element> {
        let node = descriptor?;
        match node.kind() {
            Kind::Empty => None,
            Kind::Fragment => {
                let children = self.hydrate_children(node);
                Some(self.factory.create(&self.factory.fragment(), None, children))
            }
            Kind::Named(ty) => {
                if let Some(component) = self.components.get(ty) {
                    let children = self.hydrate_children(node);
                    return Some(
                        self.factory
                            .create(component, Some(node.props_with_key()), children),
                    );
                }
                let Some(fallback) = &self.fallback else {
                    warn!(ty, "no component for descriptor type");
                    return None;
                };
                let props = fallback_props(ty, &node.props);
                let children = self.hydrate_children(node);
                Some(self.factory.create(fallback, Some(props), children))
            }
        }
    }

    fn hydrate_children(&self, node: &Descriptor) -> Vec<F::Element> {
        node.child_nodes()
            .iter()
            .filter_map(|child| self.hydrate(Some(child)))
            .collect()
    }
}

fn fallback_props(ty: &str, props: &Props) -> Props {
    match json!({ "type": ty, "props": props }) {
        Value::Object(map) => map,
        _ => Props::new(),
    }
}

impl<F: NativeFactory + core::fmt::Debug> core::fmt::Debug for NativeHydrator<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeHydrator")
            .field("factory", &self.factory)
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}
