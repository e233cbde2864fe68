use std::sync::LazyLock;

use regex::Regex;

// Tagged opening fence, body, closing fence. Lazy so the first closing fence ends the block.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+#.\-]+[ \t]*\r?\n(.*?)```").expect("fence pattern is valid")
});

/// Body of the first language-tagged fenced block in `text`.
///
/// Only the first block counts. Replies carrying several blocks are reduced to
/// their first one, which matches how the review prompt asks for a single file.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_body_verbatim() {
        let reply = "Found a missing brace.\n```csharp\nclass B\n{\n}\n```\nDone.";
        assert_eq!(extract_fenced_block(reply), Some("class B\n{\n}\n"));
    }

    #[test]
    fn prose_only_reply_has_no_block() {
        assert_eq!(extract_fenced_block("No errors found."), None);
    }

    #[test]
    fn untagged_fence_is_ignored() {
        assert_eq!(extract_fenced_block("```\nlet x = 1;\n```"), None);
    }

    #[test]
    fn only_first_block_is_used() {
        let reply = "```rust\nfn a() {}\n```\nand\n```rust\nfn b() {}\n```";
        assert_eq!(extract_fenced_block(reply), Some("fn a() {}\n"));
    }

    #[test]
    fn crlf_after_tag_is_accepted() {
        let reply = "```c#\r\nint x;\r\n```";
        assert_eq!(extract_fenced_block(reply), Some("int x;\r\n"));
    }
}
