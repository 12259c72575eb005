//! Canonical wire form of descriptor trees.
//!
//! Trees travel as JSON text. [`compact`] strips fields that carry no
//! information so the encoded form stays minimal, and [`parse`] undoes
//! [`serialize`] exactly, floats and arbitrarily deep trees included.

use serde::Deserialize;
use serde_json::Value;

use crate::{DescriptorError, Result, node::Descriptor};

/// Rebuilds the tree in minimal form.
///
/// Empty children lists are dropped and every remaining node keeps only its
/// type, props, non-empty children and a key when one is set. Compacting an
/// already compact tree returns an equal tree.
#[must_use]
pub fn compact(descriptor: &Descriptor) -> Descriptor {
    let children = descriptor
        .children
        .as_ref()
        .filter(|children| !children.is_empty())
        .map(|children| children.iter().map(compact).collect());

    Descriptor {
        ty: descriptor.ty.clone(),
        props: descriptor.props.clone(),
        children,
        key: descriptor.key.clone(),
    }
}

/// Encodes a tree as JSON text.
///
/// # Errors
///
/// Returns [`DescriptorError::Malformed`] if a prop value cannot be encoded.
pub fn serialize(descriptor: &Descriptor) -> Result<String> {
    Ok(serde_json::to_string(descriptor)?)
}

/// Decodes a tree produced by [`serialize`].
///
/// # Errors
///
/// Returns [`DescriptorError::Malformed`] for text that is not a descriptor and
/// [`DescriptorError::EmptyType`] for a node whose type is empty.
pub fn parse(text: &str) -> Result<Descriptor> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    // Every tree level nests an object and a `children` array.
    deserializer.disable_recursion_limit();
    let descriptor = Descriptor::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    check_types(&descriptor)?;
    Ok(descriptor)
}

/// Converts a tree into a JSON value.
///
/// # Errors
///
/// Returns [`DescriptorError::Malformed`] if a prop value cannot be encoded.
pub fn to_value(descriptor: &Descriptor) -> Result<Value> {
    Ok(serde_json::to_value(descriptor)?)
}

/// Decodes a JSON value returned by a remote renderer.
///
/// `null` means "render nothing" and decodes to `None`.
///
/// # Errors
///
/// Same as [`parse`].
pub fn from_value(value: Value) -> Result<Option<Descriptor>> {
    if value.is_null() {
        return Ok(None);
    }
    let descriptor = Descriptor::deserialize(serde_stacker::Deserializer::new(value))?;
    check_types(&descriptor)?;
    Ok(Some(descriptor))
}

fn check_types(descriptor: &Descriptor) -> Result<()> {
    let mut offending = None;
    crate::walk(descriptor, |node, path| {
        if offending.is_none() && node.ty.is_empty() {
            offending = Some(path.to_vec());
        }
    });
    match offending {
        Some(path) => Err(DescriptorError::EmptyType { path }),
        None => Ok(()),
    }
}
