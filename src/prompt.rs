use std::path::Path;

pub const REVIEW_PROMPT: &str = r#"You are a meticulous code reviewer. Review the file named {file_name} below for compile errors, syntax errors and clear logic bugs.

If you find errors, reply with the complete corrected version of the whole file in a single fenced code block tagged `{tag}`. Do not return partial snippets.
If the file has no errors, reply with a short sentence saying so and do not include any code.

```{tag}
{content}
```"#;

/// The first `budget` characters of `text`. No marker is appended.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fence tag for the language of `path`, falling back to the raw extension.
pub fn language_tag(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let tag = match ext.as_str() {
        "cs" => "csharp",
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" => "typescript",
        "tsx" => "tsx",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "h" | "c" => "c",
        "kt" | "kts" => "kotlin",
        "rb" => "ruby",
        "sh" => "bash",
        "" => "text",
        other => other,
    };
    tag.to_string()
}

pub fn build_prompt(file_name: &str, tag: &str, content: &str) -> String {
    REVIEW_PROMPT
        .replace("{file_name}", file_name)
        .replace("{tag}", tag)
        .replace("{content}", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_sent_whole() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn long_text_is_cut_at_exact_budget() {
        assert_eq!(truncate_chars("abcdefghij", 4), "abcd");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "héllo wörld";
        let cut = truncate_chars(text, 5);
        assert_eq!(cut, "héllo");
        assert_eq!(cut.chars().count(), 5);
    }

    #[test]
    fn tag_follows_extension() {
        assert_eq!(language_tag(Path::new("src/B.cs")), "csharp");
        assert_eq!(language_tag(Path::new("lib.RS")), "rust");
        assert_eq!(language_tag(Path::new("query.sql")), "sql");
        assert_eq!(language_tag(Path::new("Makefile")), "text");
    }

    #[test]
    fn prompt_names_the_file_and_embeds_content() {
        let prompt = build_prompt("B.cs", "csharp", "class B {");
        assert!(prompt.contains("file named B.cs"));
        assert!(prompt.contains("```csharp\nclass B {\n```"));
        assert!(!prompt.contains("{content}"));
    }
}
