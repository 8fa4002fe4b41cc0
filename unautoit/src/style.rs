use std::collections::HashMap;

/// How identifiers are cased when tidying.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum IdentCase {
    /// Keep the casing found in the script.
    #[default]
    AutoDetect,

    /// Upper case every identifier.
    AllUpper,

    /// Lower case every identifier.
    AllLower,
}

/// Settings for the tidy pass.
///
/// One instance is resolved per invocation and shared by every resource in it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    /// Spaces per indent level (`spaces`).
    pub indent_width: usize,

    /// Indent with tabs instead of spaces (`use-tabs`).
    pub use_tabs: bool,

    /// Identifier casing (`case-map`).
    pub identifier_case: IdentCase,

    /// Emit a comment naming the function after each `EndFunc` (`auto-cmt`).
    pub emit_function_end_comments: bool,

    /// Longest string literal before it is split (`max-strsz`).
    pub max_string_literal_length: usize,

    /// Insert blank lines between blocks (`extra-nl`).
    pub insert_extra_blank_lines: bool,
}

impl StyleOptions {
    /// Resolve a whitespace-separated list of `key=value` directives.
    ///
    /// This never fails.
    /// Unknown keys, tokens without a value and malformed numbers are ignored,
    /// leaving the default for that setting.
    /// If a key repeats, the last value wins.
    pub fn parse(directives: &str) -> Self {
        let values: HashMap<&str, &str> = directives
            .split_whitespace()
            .filter_map(|token| token.split_once('='))
            .collect();

        let mut options = Self::default();
        if let Some(value) = values.get("spaces").and_then(|value| value.parse().ok()) {
            options.indent_width = value;
        }
        if let Some(value) = values.get("use-tabs") {
            options.use_tabs = is_on(value);
        }
        if let Some(value) = values.get("case-map") {
            options.identifier_case = match value.to_ascii_lowercase().as_str() {
                "upper" => IdentCase::AllUpper,
                "lower" => IdentCase::AllLower,
                _ => IdentCase::AutoDetect,
            };
        }
        if let Some(value) = values.get("auto-cmt") {
            options.emit_function_end_comments = is_on(value);
        }
        if let Some(value) = values.get("max-strsz").and_then(|value| value.parse().ok()) {
            options.max_string_literal_length = value;
        }
        if let Some(value) = values.get("extra-nl") {
            options.insert_extra_blank_lines = is_on(value);
        }

        options
    }
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            use_tabs: false,
            identifier_case: IdentCase::AutoDetect,
            emit_function_end_comments: true,
            max_string_literal_length: 160,
            insert_extra_blank_lines: true,
        }
    }
}

fn is_on(value: &str) -> bool {
    value.eq_ignore_ascii_case("on")
}
