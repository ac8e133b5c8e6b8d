/// Splits `text` into chunks of at most `limit` UTF-16 code units.
///
/// Telegram measures message length in UTF-16 units, so characters outside
/// the Basic Multilingual Plane (the report's emoji markers) count twice.
/// Chunks never break inside a character, and concatenating them gives back
/// `text`. A single character wider than `limit` gets a chunk of its own. A
/// limit of zero is treated as one.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut units = 0;

    for ch in text.chars() {
        let width = ch.len_utf16();
        if units > 0 && units + width > limit {
            chunks.push(std::mem::take(&mut current));
            units = 0;
        }
        current.push(ch);
        units += width;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nine_thousand_chars_make_three_chunks() {
        let text = "가".repeat(9000);
        let chunks = split_message(&text, 4000);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 4000);
        assert_eq!(chunks[1].chars().count(), 4000);
        assert_eq!(chunks[2].chars().count(), 1000);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_emoji_count_as_two_units() {
        let text = "📊".repeat(4000);
        let chunks = split_message(&text, 4000);

        assert_eq!(chunks.len(), 2);
        for chunk in &chunks {
            assert_eq!(chunk.encode_utf16().count(), 4000);
            assert_eq!(chunk.chars().count(), 2000);
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_surrogate_pair_is_never_split() {
        let chunks = split_message("a🔺b", 2);
        assert_eq!(
            chunks,
            vec!["a".to_string(), "🔺".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_character_wider_than_limit_stands_alone() {
        assert_eq!(
            split_message("📈📈", 1),
            vec!["📈".to_string(), "📈".to_string()]
        );
    }

    #[test]
    fn test_short_message_is_one_chunk() {
        assert_eq!(split_message("hello", 4000), vec!["hello".to_string()]);
    }

    #[test]
    fn test_exact_multiple() {
        let chunks = split_message("abcdef", 3);
        assert_eq!(chunks, vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn test_empty_message_has_no_chunks() {
        assert!(split_message("", 4000).is_empty());
    }

    #[test]
    fn test_zero_limit() {
        assert_eq!(split_message("ab", 0), vec!["a".to_string(), "b".to_string()]);
    }
}
