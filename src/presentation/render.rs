use crate::domain::model::TranslationResult;
use crate::presentation::theme::Theme;
use std::fmt::Write;

/// Format one translation for the terminal
pub fn format_result(source: &str, result: &TranslationResult, theme: &Theme) -> String {
    let mut output = String::new();

    writeln!(output, "{}", (theme.source)(source)).ok();
    writeln!(output, "  {}", (theme.translation)(&result.translation)).ok();

    if !result.keywords.is_empty() {
        let keywords: Vec<String> = result
            .keywords
            .iter()
            .map(|k| (theme.keyword)(k))
            .collect();
        writeln!(output, "  {} {}", (theme.label)("keywords:"), keywords.join(", ")).ok();
    }

    output
}

/// Format a batch, numbered and separated by a rule
pub fn format_batch(sources: &[String], results: &[TranslationResult], theme: &Theme) -> String {
    let mut output = String::new();
    let cutoff = "⸺".repeat(40);

    for (i, (source, result)) in sources.iter().zip(results).enumerate() {
        if i > 0 {
            writeln!(output, "  {}", (theme.line)(&cutoff)).ok();
        }
        write!(output, "{}. ", (theme.idx)(&(i + 1).to_string())).ok();
        output.push_str(&format_result(source, result, theme));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> TranslationResult {
        TranslationResult::new(
            "Hello World".to_string(),
            vec!["hello".to_string(), "world".to_string()],
        )
    }

    #[test]
    fn test_format_result_plain() {
        let output = format_result("你好世界", &sample(), &Theme::plain());
        assert_eq!(output, "你好世界\n  Hello World\n  keywords: hello, world\n");
    }

    #[test]
    fn test_format_result_without_keywords() {
        let result = TranslationResult::new("Hi".to_string(), vec![]);
        let output = format_result("嗨", &result, &Theme::plain());
        assert_eq!(output, "嗨\n  Hi\n");
    }

    #[test]
    fn test_format_batch_numbers_items() {
        let sources = vec!["你好".to_string(), "世界".to_string()];
        let results = vec![sample(), sample()];
        let output = format_batch(&sources, &results, &Theme::plain());
        assert!(output.starts_with("1. 你好\n"));
        assert!(output.contains("2. 世界\n"));
        assert!(output.contains("⸺"));
    }
}
