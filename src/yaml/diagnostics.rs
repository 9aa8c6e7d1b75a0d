//! YAML error diagnostics with source-located messages

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax or shape error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("invalid YAML in {filename}: {message}")]
#[diagnostic(code(partcost::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    filename: String,

    /// The underlying error message
    message: String,
}

impl YamlSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            filename: filename.to_string(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convert line/column to byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;

    for (i, ch) in source.char_indices() {
        if current_line == line {
            line_start = i;
            break;
        }
        if ch == '\n' {
            current_line += 1;
            line_start = i + 1;
        }
    }

    if current_line < line {
        return source.len().saturating_sub(1);
    }

    let line_len = source[line_start..]
        .find('\n')
        .unwrap_or(source.len() - line_start);
    line_start + column.saturating_sub(1).min(line_len)
}

/// Suggest a fix for common mistakes in reference-data files
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("unknown unit") {
        return Some(
            "Use a unit symbol such as mm, cm³, g/cm³, kg, or min. Run 'partcost units list' to see configured options."
                .to_string(),
        );
    }

    if msg_lower.contains("unknown variant") && msg_lower.contains("block") {
        return Some("pricing_type must be either 'block' or 'sheet'".to_string());
    }

    if msg_lower.contains("missing field") {
        return Some("Add the missing field; prices need both 'value' and 'unit'".to_string());
    }

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("unknown unit 'parsec'").is_some());
        assert!(generate_help("unknown variant `slab`, expected `block` or `sheet`").is_some());
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_from_serde_error_points_at_line() {
        let source = "name: steel\ndensity: [\n";
        let err = serde_yml::from_str::<serde_yml::Value>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "materials.yaml");
        assert!(diag.to_string().contains("materials.yaml"));
        assert!(!diag.message().is_empty());
    }
}
