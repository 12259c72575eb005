//! The descriptor data model.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Type name of a node that renders nothing.
pub const EMPTY_TYPE: &str = "__empty__";

/// Type name of a node that groups its children without adding a wrapper.
pub const FRAGMENT_TYPE: &str = "__fragment__";

/// Property bag attached to every descriptor.
pub type Props = serde_json::Map<String, Value>;

/// Stable identity of a node among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// String key.
    Text(String),
    /// Numeric key.
    Number(Number),
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Text(text) => Self::String(text),
            Key::Number(number) => Self::Number(number),
        }
    }
}

/// What a node means to the hydrator, decided once from its type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind<'a> {
    /// Renders nothing.
    Empty,
    /// Transparent grouping of its children.
    Fragment,
    /// A concrete component type.
    Named(&'a str),
}

impl<'a> Kind<'a> {
    /// Classifies a raw type string.
    #[must_use]
    pub fn of(ty: &'a str) -> Self {
        match ty {
            EMPTY_TYPE => Self::Empty,
            FRAGMENT_TYPE => Self::Fragment,
            other => Self::Named(other),
        }
    }

    /// Returns `true` for the two reserved kinds.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Empty | Self::Fragment)
    }
}

/// A serializable description of one UI node and its subtree.
///
/// Children are stored in render order. A missing `children` field and an
/// empty list are distinct values; [`compact`](crate::compact) folds the latter
/// into the former.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Component type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Component properties.
    #[serde(default)]
    pub props: Props,
    /// Child nodes, in render order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Descriptor>>,
    /// Sibling identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
}

impl Descriptor {
    /// Creates a node of the given type with no props, children or key.
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            props: Props::new(),
            children: None,
            key: None,
        }
    }

    /// Creates a node that renders nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(EMPTY_TYPE)
    }

    /// Creates a fragment grouping `children`.
    pub fn fragment(children: impl IntoIterator<Item = Self>) -> Self {
        Self::new(FRAGMENT_TYPE).children(children)
    }

    /// Sets a single property.
    #[must_use]
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Replaces all properties.
    #[must_use]
    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Appends a child, creating the children list if needed.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Replaces the children list.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children = Some(children.into_iter().collect());
        self
    }

    /// Sets the sibling key.
    #[must_use]
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Classifies this node.
    #[must_use]
    pub fn kind(&self) -> Kind<'_> {
        Kind::of(&self.ty)
    }

    /// Returns the children as a slice, empty when the field is absent.
    #[must_use]
    pub fn child_nodes(&self) -> &[Self] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Returns the props merged with the key under `"key"`, the shape element
    /// constructors expect.
    #[must_use]
    pub fn props_with_key(&self) -> Props {
        let mut props = self.props.clone();
        if let Some(key) = &self.key {
            props.insert("key".to_owned(), key.clone().into());
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_reserved_strings() {
        assert_eq!(Descriptor::empty().kind(), Kind::Empty);
        assert_eq!(Descriptor::fragment([]).kind(), Kind::Fragment);
        assert_eq!(Descriptor::new("button").kind(), Kind::Named("button"));
        assert!(Kind::Empty.is_reserved());
        assert!(!Kind::Named("x").is_reserved());
    }

    #[test]
    fn builder_appends_children_in_order() {
        let node = Descriptor::new("list")
            .child(Descriptor::new("a"))
            .child(Descriptor::new("b"));
        let types: Vec<_> = node.child_nodes().iter().map(|c| c.ty.as_str()).collect();
        assert_eq!(types, ["a", "b"]);
    }

    #[test]
    fn props_with_key_merges_key() {
        let node = Descriptor::new("row").prop("label", "x").key(7_i64);
        let props = node.props_with_key();
        assert_eq!(props["label"], "x");
        assert_eq!(props["key"], 7);
        assert!(!node.props.contains_key("key"));
    }

    #[test]
    fn key_displays_plainly() {
        assert_eq!(Key::from("row-1").to_string(), "row-1");
        assert_eq!(Key::from(3_u64).to_string(), "3");
    }
}
