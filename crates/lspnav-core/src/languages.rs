use std::path::Path;

/// Language id used when the extension is not recognized.
pub const PLAINTEXT_LANGUAGE_ID: &str = "plaintext";

/// Detect the LSP language identifier from a file extension.
///
/// Identifiers follow the values listed for `TextDocumentItem.languageId` in the
/// LSP specification, so they can be passed straight to `textDocument/didOpen`.
pub fn language_id_from_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "rs" => Some("rust"),
        "ts" | "mts" | "cts" => Some("typescript"),
        "tsx" => Some("typescriptreact"),
        "js" | "mjs" | "cjs" => Some("javascript"),
        "jsx" => Some("javascriptreact"),
        "py" | "pyi" => Some("python"),
        "go" => Some("go"),
        "java" => Some("java"),
        "c" | "h" => Some("c"),
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => Some("cpp"),
        "cs" => Some("csharp"),
        "rb" => Some("ruby"),
        "php" => Some("php"),
        "swift" => Some("swift"),
        "kt" | "kts" => Some("kotlin"),
        "lua" => Some("lua"),
        "toml" => Some("toml"),
        "json" => Some("json"),
        "yaml" | "yml" => Some("yaml"),
        "md" => Some("markdown"),
        _ => None,
    }
}

/// Resolve the language id for a path, falling back to `plaintext`.
pub fn language_id_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(language_id_from_extension)
        .unwrap_or(PLAINTEXT_LANGUAGE_ID)
}
