//! Final message assembly.

use serde::Deserialize;

/// How failures are returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMode {
    /// The message body alone.
    #[default]
    Body,
    /// A complete sentence naming the argument.
    Full,
    /// Each failure message separately.
    Parts,
}

/// Drop repeated messages, keeping the first occurrence of each.
pub fn dedup(messages: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    messages.retain(|m| seen.insert(m.clone()));
}

/// Prefix the first line with `first` and the others with `rest`.
pub fn bullet(text: &str, first: &str, rest: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| format!("{}{}", if i == 0 { first } else { rest }, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Assemble failure messages for argument `name`.
pub fn render(messages: &[String], name: &str, mode: ReturnMode) -> Vec<String> {
    match (mode, messages) {
        (ReturnMode::Parts, _) => messages.to_vec(),
        (_, []) => Vec::new(),
        (ReturnMode::Body, [only]) => vec![lower_first(only)],
        (ReturnMode::Full, [only]) => {
            vec![format!("For argument `{}`, {}", name, lower_first(only))]
        }
        (ReturnMode::Body | ReturnMode::Full, many) => {
            let head = if mode == ReturnMode::Full {
                format!("For argument `{}` at least one of these should pass:", name)
            } else {
                "At least one of these should pass:".to_string()
            };
            let bullets: Vec<String> = many.iter().map(|m| bullet(m, "  - ", "    ")).collect();
            vec![format!("{}\n{}", head, bullets.join("\n"))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dedup_keeps_order() {
        let mut m = msgs(&["a", "b", "a", "c", "b"]);
        dedup(&mut m);
        assert_eq!(m, msgs(&["a", "b", "c"]));
    }

    #[test]
    fn test_single_message() {
        let m = msgs(&["`x` should be length 2 (is 3)"]);
        assert_eq!(render(&m, "x", ReturnMode::Body), m);
        assert_eq!(
            render(&m, "x", ReturnMode::Full),
            vec!["For argument `x`, `x` should be length 2 (is 3)".to_string()]
        );
        assert_eq!(
            render(&msgs(&["Must be positive"]), "x", ReturnMode::Body),
            msgs(&["must be positive"])
        );
    }

    #[test]
    fn test_multiple_messages() {
        let m = msgs(&["first", "second\nwraps"]);
        assert_eq!(
            render(&m, "x", ReturnMode::Body),
            vec!["At least one of these should pass:\n  - first\n  - second\n    wraps".to_string()]
        );
        assert!(render(&m, "y", ReturnMode::Full)[0]
            .starts_with("For argument `y` at least one of these should pass:\n"));
        assert_eq!(render(&m, "x", ReturnMode::Parts), m);
    }
}
