use lsp_types::SymbolKind;
use lspnav_core::types::SymbolKindLabel;

/// Map a provider symbol kind to the display vocabulary.
pub fn symbol_kind_label(kind: SymbolKind) -> SymbolKindLabel {
    match kind {
        SymbolKind::FILE => SymbolKindLabel::File,
        SymbolKind::MODULE => SymbolKindLabel::Module,
        SymbolKind::NAMESPACE => SymbolKindLabel::Namespace,
        SymbolKind::PACKAGE => SymbolKindLabel::Package,
        SymbolKind::CLASS => SymbolKindLabel::Class,
        SymbolKind::METHOD => SymbolKindLabel::Method,
        SymbolKind::PROPERTY => SymbolKindLabel::Property,
        SymbolKind::FIELD => SymbolKindLabel::Field,
        SymbolKind::CONSTRUCTOR => SymbolKindLabel::Constructor,
        SymbolKind::ENUM => SymbolKindLabel::Enum,
        SymbolKind::INTERFACE => SymbolKindLabel::Interface,
        SymbolKind::FUNCTION => SymbolKindLabel::Function,
        SymbolKind::VARIABLE => SymbolKindLabel::Variable,
        SymbolKind::CONSTANT => SymbolKindLabel::Constant,
        SymbolKind::STRING => SymbolKindLabel::String,
        SymbolKind::NUMBER => SymbolKindLabel::Number,
        SymbolKind::BOOLEAN => SymbolKindLabel::Boolean,
        SymbolKind::ARRAY => SymbolKindLabel::Array,
        SymbolKind::OBJECT => SymbolKindLabel::Object,
        SymbolKind::KEY => SymbolKindLabel::Key,
        SymbolKind::NULL => SymbolKindLabel::Null,
        SymbolKind::ENUM_MEMBER => SymbolKindLabel::EnumMember,
        SymbolKind::STRUCT => SymbolKindLabel::Struct,
        SymbolKind::EVENT => SymbolKindLabel::Event,
        SymbolKind::OPERATOR => SymbolKindLabel::Operator,
        SymbolKind::TYPE_PARAMETER => SymbolKindLabel::TypeParameter,
        _ => SymbolKindLabel::Unknown,
    }
}
