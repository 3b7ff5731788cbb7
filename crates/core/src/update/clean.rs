use regex::Regex;
use std::sync::LazyLock;

/// Fence opened with an optional language tag and a newline, closed by a
/// newline and a fence.
static TAGGED_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?\n(.*?)\n```").expect("tagged fence regex"));

/// Any remaining triple-backtick span, newline or not.
static BARE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("bare fence regex"));

/// Strip markdown code fences from a model response.
///
/// Two passes run unconditionally: fenced blocks with a language tag line are
/// replaced by their body, then any leftover ```...``` span is replaced by its
/// inner text. The result is trimmed. This is a heuristic, not a markdown
/// parser: responses with several blocks come back with every block unwrapped
/// and the prose between them kept.
pub fn clean_response(response: &str) -> String {
    let cleaned = TAGGED_FENCE.replace_all(response, "$1");
    let cleaned = BARE_FENCE.replace_all(&cleaned, "$1");

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_only_trimmed() {
        assert_eq!(clean_response("x = 1"), "x = 1");
        assert_eq!(clean_response("  \n fn main() {}\n\n"), "fn main() {}");
        assert_eq!(
            clean_response("line one\n\n    indented\nline three"),
            "line one\n\n    indented\nline three"
        );
    }

    #[test]
    fn test_fence_with_language_tag() {
        let response = "```python\nx = 1\n```";
        assert_eq!(clean_response(response), "x = 1");
    }

    #[test]
    fn test_fence_without_language_tag() {
        let response = "```\nfn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n```";
        assert_eq!(
            clean_response(response),
            "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}"
        );
    }

    #[test]
    fn test_fence_with_surrounding_whitespace() {
        let response = "\n\n```rust\n  let x = 1;\n```\n  ";
        assert_eq!(clean_response(response), "let x = 1;");
    }

    #[test]
    fn test_inline_fence_without_newline() {
        assert_eq!(clean_response("```x = 1```"), "x = 1");
    }

    #[test]
    fn test_body_keeps_internal_blank_lines() {
        let response = "```js\nconst a = 1;\n\n\nconst b = 2;\n```";
        assert_eq!(clean_response(response), "const a = 1;\n\n\nconst b = 2;");
    }

    #[test]
    fn test_multiple_blocks_are_all_unwrapped() {
        let response = "```py\na = 1\n```\nand\n```py\nb = 2\n```";
        assert_eq!(clean_response(response), "a = 1\nand\nb = 2");
    }

    #[test]
    fn test_unclosed_fence_is_left_alone() {
        let response = "```python\nx = 1";
        assert_eq!(clean_response(response), "```python\nx = 1");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(clean_response(""), "");
        assert_eq!(clean_response("   \n\t"), "");
        assert_eq!(clean_response("```\n\n```"), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "x = 1",
            "```python\nx = 1\n```",
            "```x```",
            "  padded  ",
            "```py\na = 1\n```\nand\n```py\nb = 2\n```",
            "```python\nunclosed",
            "prefix ```inline``` suffix",
        ];

        for input in inputs {
            let once = clean_response(input);
            assert_eq!(clean_response(&once), once, "input: {input:?}");
        }
    }
}
