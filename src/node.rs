//! Concrete node kinds for parsed template documents.
//!
//! The parser assembles a [`DocumentTree`](crate::DocumentTree) of these
//! payloads; the code generator walks it. Each kind carries an explicit
//! label instead of deriving a tag from its runtime type.

use crate::arena::{ExportEntry, NodeData};

/// Payload of one document node.
#[derive(Debug, Clone, PartialEq)]
pub enum AstData {
    /// Root of a parsed document.
    Document,
    /// `doctype` declaration, e.g. `html`.
    Doctype { value: String },
    /// An element with a tag name; attributes hang off the generator side.
    Element { name: String },
    /// Literal text content.
    Text { content: String },
    /// An embedded expression; `escaped` controls output escaping.
    Expression { code: String, escaped: bool },
    /// A comment; `rendered` comments survive into the output.
    Comment { text: String, rendered: bool },
    /// A named or anonymous block.
    Block { name: Option<String> },
    /// A mixin definition.
    Mixin { name: String },
    /// A mixin invocation.
    MixinCall { name: String },
}

impl AstData {
    pub fn doctype(value: impl Into<String>) -> Self {
        Self::Doctype {
            value: value.into(),
        }
    }

    pub fn element(name: impl Into<String>) -> Self {
        Self::Element { name: name.into() }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn expression(code: impl Into<String>, escaped: bool) -> Self {
        Self::Expression {
            code: code.into(),
            escaped,
        }
    }

    pub fn comment(text: impl Into<String>, rendered: bool) -> Self {
        Self::Comment {
            text: text.into(),
            rendered,
        }
    }

    pub fn block(name: Option<String>) -> Self {
        Self::Block { name }
    }

    pub fn mixin(name: impl Into<String>) -> Self {
        Self::Mixin { name: name.into() }
    }

    pub fn mixin_call(name: impl Into<String>) -> Self {
        Self::MixinCall { name: name.into() }
    }
}

impl NodeData for AstData {
    fn label(&self) -> &'static str {
        match self {
            AstData::Document => "Document",
            AstData::Doctype { .. } => "Doctype",
            AstData::Element { .. } => "Element",
            AstData::Text { .. } => "Text",
            AstData::Expression { .. } => "Expression",
            AstData::Comment { .. } => "Comment",
            AstData::Block { .. } => "Block",
            AstData::Mixin { .. } => "Mixin",
            AstData::MixinCall { .. } => "MixinCall",
        }
    }

    fn export(&self) -> Vec<ExportEntry> {
        match self {
            AstData::Document => Vec::new(),
            AstData::Doctype { value } => vec![ExportEntry::positional(value.clone())],
            AstData::Element { name } => vec![ExportEntry::named("name", name.clone())],
            AstData::Text { content } => vec![ExportEntry::positional(content.clone())],
            AstData::Expression { code, escaped } => vec![
                ExportEntry::positional(code.clone()),
                ExportEntry::named("escaped", escaped.to_string()),
            ],
            AstData::Comment { text, rendered } => vec![
                ExportEntry::positional(text.clone()),
                ExportEntry::named("rendered", rendered.to_string()),
            ],
            // An anonymous block exports an empty-valued name, rendered
            // by dump as a bare `name=`.
            AstData::Block { name } => vec![ExportEntry::named(
                "name",
                name.clone().unwrap_or_default(),
            )],
            AstData::Mixin { name } => vec![ExportEntry::named("name", name.clone())],
            AstData::MixinCall { name } => vec![ExportEntry::named("name", name.clone())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_exports_its_tag_name() {
        let export = AstData::element("div").export();
        assert_eq!(export, vec![ExportEntry::named("name", "div")]);
    }

    #[test]
    fn document_exports_nothing() {
        assert!(AstData::Document.export().is_empty());
    }

    #[test]
    fn anonymous_block_exports_empty_name() {
        let export = AstData::block(None).export();
        assert_eq!(export, vec![ExportEntry::named("name", "")]);
    }
}
