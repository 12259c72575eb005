//! Serializable UI descriptor trees.
//!
//! A [`Descriptor`] is the unit exchanged between a remote renderer and the
//! hydrator that turns it into framework elements. It is a plain value: every
//! algorithm in this crate borrows its input and returns a fresh tree, so the
//! same subtree can be shared freely between concurrent pipelines.
//!
//! - [`node`] holds the data model and the [`Kind`] discriminator for the two
//!   reserved node types.
//! - [`tree`] provides traversal and inspection: [`walk`], [`transform`],
//!   [`find`], [`used_types`] and [`validate`].
//! - [`wire`] provides the canonical wire form: [`compact`], [`serialize`] and
//!   [`parse`].
//!
//! # Example
//!
//! ```rust
//! use waterui_descriptor::{Descriptor, parse, serialize, validate};
//!
//! let tree = Descriptor::new("stack")
//!     .child(Descriptor::new("text").prop("content", "Hello"))
//!     .child(Descriptor::empty());
//!
//! let text = serialize(&tree).unwrap();
//! assert_eq!(parse(&text).unwrap(), tree);
//!
//! let report = validate(&tree, ["stack"]);
//! assert_eq!(report.unknown_types, vec!["text".to_string()]);
//! ```

mod error;
pub mod node;
pub mod tree;
pub mod wire;

pub use error::DescriptorError;
pub use node::{Descriptor, EMPTY_TYPE, FRAGMENT_TYPE, Key, Kind, Props};
pub use tree::{Validation, count, depth, find, transform, used_types, validate, walk};
pub use wire::{compact, from_value, parse, serialize, to_value};

/// Result alias used throughout this crate.
pub type Result<T, E = DescriptorError> = core::result::Result<T, E>;
