const FENCE_MARKERS: [&str; 3] = ["```json", "```JSON", "```"];

/// Remove code fences and surrounding prose from a model reply.
///
/// Returns the text from the first `{` to the last `}` inclusive when both are
/// present in that order, otherwise the trimmed text.
pub fn strip_wrapper(text: &str) -> String {
    let mut cleaned = text.to_string();
    for marker in FENCE_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned = cleaned.trim();

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => cleaned[start..=end].to_string(),
        _ => cleaned.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_untouched() {
        assert_eq!(strip_wrapper(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_fenced_json() {
        let text = "```json\n{\"ingredients\": []}\n```";
        assert_eq!(strip_wrapper(text), r#"{"ingredients": []}"#);
    }

    #[test]
    fn test_prose_around_json() {
        let text = "Sure! Here is the result:\n{\"recipes\": []}\nEnjoy your meal.";
        assert_eq!(strip_wrapper(text), r#"{"recipes": []}"#);
    }

    #[test]
    fn test_no_braces_returns_trimmed_text() {
        assert_eq!(strip_wrapper("  no json here \n"), "no json here");
    }

    #[test]
    fn test_reversed_braces_returns_trimmed_text() {
        assert_eq!(strip_wrapper(" } oops { "), "} oops {");
    }

    #[test]
    fn test_multibyte_text_around_braces() {
        let text = "Voilà 🍳 {\"ingredients\": [{\"name\": \"œuf\"}]} merci";
        assert_eq!(strip_wrapper(text), "{\"ingredients\": [{\"name\": \"œuf\"}]}");
    }
}
