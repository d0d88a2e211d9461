//! The ERB subset Rails configs use for credentials.
//!
//! Supported tags:
//!
//! - `<%= ENV['NAME'] %>` / `<%= ENV["NAME"] %>`: the variable, or empty when unset
//! - `<%= ENV.fetch("NAME") %>`: the variable, an error when unset
//! - `<%= ENV.fetch("NAME", "default") %>` / `<%= ENV.fetch("NAME") { "default" } %>`
//! - `<%# comment %>`: removed
//!
//! Any other tag is rejected rather than passed through as literal text.

use super::DatabaseConfigError;
use regex::{Captures, Regex};
use std::sync::OnceLock;

struct TemplatePatterns {
    tag: Regex,
    env_index: Regex,
    env_fetch: Regex,
}

impl TemplatePatterns {
    fn instance() -> &'static Self {
        static PATTERNS: OnceLock<TemplatePatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::compile)
    }

    fn compile() -> Self {
        Self {
            tag: Regex::new(r"(?s)<%(=|#)?-?(.*?)-?%>").expect("Invalid tag pattern"),
            env_index: Regex::new(r#"^ENV\[\s*(?:'([^']*)'|"([^"]*)")\s*\]$"#)
                .expect("Invalid ENV[] pattern"),
            env_fetch: Regex::new(
                r#"^ENV\.fetch\(\s*(?:'([^']*)'|"([^"]*)")\s*(?:,\s*(?:'([^']*)'|"([^"]*)"|(\d+))\s*)?\)\s*(?:\{\s*(?:'([^']*)'|"([^"]*)"|(\d+))\s*\})?$"#,
            )
            .expect("Invalid ENV.fetch pattern"),
        }
    }
}

/// Render `input`, resolving variables through `lookup`.
pub fn render<F>(input: &str, lookup: F) -> Result<String, DatabaseConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let patterns = TemplatePatterns::instance();
    let mut output = String::with_capacity(input.len());
    let mut last = 0;

    for tag in patterns.tag.captures_iter(input) {
        let Some(whole) = tag.get(0) else { continue };
        output.push_str(&input[last..whole.start()]);
        last = whole.end();

        let expression = tag.get(2).map_or("", |m| m.as_str()).trim();
        match tag.get(1).map(|m| m.as_str()) {
            Some("#") => {}
            Some("=") => output.push_str(&evaluate(patterns, expression, &lookup)?),
            _ => return Err(DatabaseConfigError::UnsupportedTemplate(whole.as_str().to_string())),
        }
    }

    output.push_str(&input[last..]);
    Ok(output)
}

fn evaluate<F>(
    patterns: &TemplatePatterns,
    expression: &str,
    lookup: &F,
) -> Result<String, DatabaseConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(caps) = patterns.env_index.captures(expression) {
        let name = first_group(&caps, 1..=2).unwrap_or_default();
        return Ok(lookup(name).unwrap_or_default());
    }

    if let Some(caps) = patterns.env_fetch.captures(expression) {
        let name = first_group(&caps, 1..=2).unwrap_or_default();
        if let Some(value) = lookup(name) {
            return Ok(value);
        }
        return first_group(&caps, 3..=8)
            .map(str::to_string)
            .ok_or_else(|| DatabaseConfigError::MissingEnv(name.to_string()));
    }

    Err(DatabaseConfigError::UnsupportedTemplate(format!(
        "<%= {expression} %>"
    )))
}

fn first_group<'h>(caps: &Captures<'h>, groups: std::ops::RangeInclusive<usize>) -> Option<&'h str> {
    groups
        .filter_map(|i| caps.get(i))
        .map(|m| m.as_str())
        .next()
}
