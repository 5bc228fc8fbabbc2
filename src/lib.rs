//! # tplkit
//!
//! Support library for a template compiler: an arena-based document
//! tree for parsed templates, and value serialization for the code
//! generator emitting markup attributes.
//!
//! The two pieces are independent:
//!
//! - [`DocumentTree`] holds parsed document nodes in a generational
//!   arena. An external parser assembles the tree through the attach
//!   operations; parent and child links always agree.
//! - The builders in [`attr`] reduce an already-resolved [`Value`] to a
//!   quoted attribute fragment (generic, data/JSON, style list, class
//!   list), and [`scope::create_scope`] filters variable bindings before
//!   they cross into a nested rendering scope.
//!
//! ## Quick start
//!
//! ```rust
//! use tplkit::{AstData, DocumentTree};
//!
//! let mut tree = DocumentTree::new();
//! let doc = tree.insert(AstData::Document);
//! let div = tree.insert_node(AstData::element("div"), Some(doc)).unwrap();
//! tree.insert_node(AstData::text("hi"), Some(div)).unwrap();
//!
//! assert_eq!(
//!     tree.dump(doc).unwrap(),
//!     "[Document]\n    [Element name=div]\n        [Text hi]\n"
//! );
//! ```

pub mod arena;
pub mod attr;
pub mod errors;
pub mod node;
pub mod scope;
pub mod util;
pub mod value;

pub use arena::{DocumentTree, ExportEntry, Node, NodeData, PostOrderIter, TreeIter};
pub use attr::{
    build_class_value, build_data_value, build_style_value, build_value, escape_html, flatten,
};
pub use errors::{TreeError, TreeResult};
pub use node::AstData;
pub use scope::{create_scope, ignored_scope_variables, IGNORED_SCOPE_VARIABLES};
pub use value::{all_null_or_false, Value};
