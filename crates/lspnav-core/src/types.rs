use crate::constants;
use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `go-to-definition` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolQuery {
    symbol: String,
    uri: String,
    start_line: Option<i64>,
    end_line: Option<i64>,
}

impl SymbolQuery {
    /// Validate required fields. Line bounds are clamped later against the document.
    pub fn new(
        symbol: impl Into<String>,
        uri: impl Into<String>,
        start_line: Option<i64>,
        end_line: Option<i64>,
    ) -> Result<Self, QueryError> {
        let symbol = symbol.into();
        let uri = uri.into();
        if symbol.is_empty() || uri.trim().is_empty() {
            return Err(QueryError::invalid_parameters(
                "Symbol and URI are required.",
            ));
        }
        Ok(Self {
            symbol,
            uri,
            start_line,
            end_line,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn start_line(&self) -> Option<i64> {
        self.start_line
    }

    pub fn end_line(&self) -> Option<i64> {
        self.end_line
    }
}

/// A `get-document-symbols` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineQuery {
    uri: String,
    max_depth: Option<u32>,
}

impl OutlineQuery {
    pub fn new(uri: impl Into<String>, max_depth: Option<u32>) -> Result<Self, QueryError> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(QueryError::invalid_parameters("URI is required."));
        }
        Ok(Self { uri, max_depth })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.max_depth
    }
}

/// One resolved definition target, with 1-based line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionReference {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl fmt::Display for DefinitionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_line == self.end_line {
            write!(f, "{}:{}", self.path, self.start_line)
        } else {
            write!(f, "{}:{}-{}", self.path, self.start_line, self.end_line)
        }
    }
}

/// Display vocabulary for symbol kinds. `Unknown` absorbs anything the provider
/// reports outside the known enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolKindLabel {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    String,
    Number,
    Boolean,
    Array,
    Object,
    Key,
    Null,
    EnumMember,
    Struct,
    Event,
    Operator,
    TypeParameter,
    Unknown,
}

impl SymbolKindLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Module => "Module",
            Self::Namespace => "Namespace",
            Self::Package => "Package",
            Self::Class => "Class",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Field => "Field",
            Self::Constructor => "Constructor",
            Self::Enum => "Enum",
            Self::Interface => "Interface",
            Self::Function => "Function",
            Self::Variable => "Variable",
            Self::Constant => "Constant",
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Array => "Array",
            Self::Object => "Object",
            Self::Key => "Key",
            Self::Null => "Null",
            Self::EnumMember => "EnumMember",
            Self::Struct => "Struct",
            Self::Event => "Event",
            Self::Operator => "Operator",
            Self::TypeParameter => "TypeParameter",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SymbolKindLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a document outline.
///
/// Field names match the JSON contract consumed by agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub kind: SymbolKindLabel,
    pub hover_information: String,
    pub location_line_number: u32,
    pub definition_start_line_number: u32,
    pub definition_end_line_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SymbolNode>>,
}

/// How hover lookups are scheduled while building an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverStrategy {
    /// One request at a time, in pre-order.
    #[default]
    Sequential,
    /// Up to `limit` requests in flight; results reassembled in pre-order.
    Concurrent { limit: usize },
}

impl HoverStrategy {
    /// Build from config values. Unknown names fall back to sequential.
    pub fn from_config(name: &str, concurrency: usize) -> Self {
        match name {
            "concurrent" => Self::Concurrent {
                limit: if concurrency == 0 {
                    constants::DEFAULT_HOVER_CONCURRENCY
                } else {
                    concurrency
                },
            },
            _ => Self::Sequential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_query_requires_symbol_and_uri() {
        assert!(SymbolQuery::new("", "file:///a.rs", None, None).is_err());
        assert!(SymbolQuery::new("foo", "  ", None, None).is_err());
        let q = SymbolQuery::new("foo", "file:///a.rs", Some(3), None).unwrap();
        assert_eq!(q.symbol(), "foo");
        assert_eq!(q.start_line(), Some(3));
        assert_eq!(q.end_line(), None);
    }

    #[test]
    fn outline_query_requires_uri() {
        let err = OutlineQuery::new("", Some(1)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameters. URI is required.");
        assert_eq!(
            OutlineQuery::new("file:///a.rs", Some(2)).unwrap().max_depth(),
            Some(2)
        );
    }

    #[test]
    fn definition_reference_collapses_single_line_spans() {
        let single = DefinitionReference {
            path: "/src/a.ts".into(),
            start_line: 4,
            end_line: 4,
        };
        let span = DefinitionReference {
            path: "/src/a.ts".into(),
            start_line: 4,
            end_line: 9,
        };
        assert_eq!(single.to_string(), "/src/a.ts:4");
        assert_eq!(span.to_string(), "/src/a.ts:4-9");
    }

    #[test]
    fn symbol_node_serializes_contract_field_names() {
        let node = SymbolNode {
            name: "foo".into(),
            detail: None,
            kind: SymbolKindLabel::EnumMember,
            hover_information: "docs".into(),
            location_line_number: 1,
            definition_start_line_number: 1,
            definition_end_line_number: 3,
            children: None,
        };
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["kind"], "EnumMember");
        assert_eq!(value["hoverInformation"], "docs");
        assert_eq!(value["locationLineNumber"], 1);
        assert_eq!(value["definitionEndLineNumber"], 3);
        assert!(value.get("detail").is_none());
        assert!(value.get("children").is_none());
    }

    #[test]
    fn hover_strategy_from_config() {
        assert_eq!(
            HoverStrategy::from_config("sequential", 4),
            HoverStrategy::Sequential
        );
        assert_eq!(
            HoverStrategy::from_config("concurrent", 4),
            HoverStrategy::Concurrent { limit: 4 }
        );
        assert_eq!(
            HoverStrategy::from_config("concurrent", 0),
            HoverStrategy::Concurrent {
                limit: constants::DEFAULT_HOVER_CONCURRENCY
            }
        );
        assert_eq!(HoverStrategy::from_config("bogus", 4), HoverStrategy::Sequential);
    }
}
