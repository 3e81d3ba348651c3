//! CLI output formatting module
//!
//! Results go to stdout as human text or JSON. Progress goes to stderr.

pub mod progress;
pub mod table;

use serde::Serialize;

pub use progress::ConsoleHooks;
pub use table::TableFormatter;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// First `max_chars` characters of `s` on a single line.
pub fn preview(s: &str, max_chars: usize) -> String {
    s.chars()
        .take(max_chars)
        .collect::<String>()
        .replace('\n', " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("  line one\nline two  ", 80), "line one line two");
        assert_eq!(preview("abcdef", 3), "abc");
        assert_eq!(preview("日本語テキスト", 2), "日本");
        assert_eq!(preview("\n\n", 80), "");
    }
}
