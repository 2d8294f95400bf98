//! Composition of the message text that is actually submitted.
//!
//! The form backend only has one free-text field, so attachments and the
//! chosen pattern are appended to the message as sentinel-delimited blocks.
//! Composing always strips a block left by an earlier attempt first, so a
//! resubmission never repeats it.

/// Starts the list of uploaded photo URLs.
pub const PHOTOS_SENTINEL: &str = "\n\n---\nPhotos:\n";

/// Starts the chosen free-pattern URL.
pub const PATTERN_SENTINEL: &str = "\n\n---\nChosen pattern:\n";

/// Cut `message` at the first occurrence of `sentinel`.
pub fn strip_block<'a>(message: &'a str, sentinel: &str) -> &'a str {
    match message.find(sentinel) {
        Some(at) => &message[..at],
        None => message,
    }
}

/// Trimmed message followed by the photo block, when there are URLs.
pub fn compose_with_uploads(message: &str, urls: &[String]) -> String {
    let base = strip_block(message, PHOTOS_SENTINEL).trim();
    if urls.is_empty() {
        return base.to_string();
    }
    format!("{base}{PHOTOS_SENTINEL}{}", urls.join("\n"))
}

/// Trimmed message followed by the chosen-pattern header.
pub fn compose_with_pattern(message: &str, pattern_url: &str) -> String {
    let base = strip_block(message, PATTERN_SENTINEL).trim();
    if pattern_url.is_empty() {
        return base.to_string();
    }
    format!("{base}{PATTERN_SENTINEL}{pattern_url}")
}

/// Pre-filled message for a free-pattern request.
pub fn pattern_request_template(alt: &str) -> String {
    let alt = alt.trim();
    let title = if alt.is_empty() {
        "I'd like this free pattern:".to_string()
    } else {
        format!("I'd like this free pattern: {alt}")
    };
    format!("{title}\n\n✧ Placement: \n✧ Size (cm): ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> Vec<String> {
        vec![
            "https://ucarecdn.com/a/".to_string(),
            "https://ucarecdn.com/b/".to_string(),
        ]
    }

    #[test]
    fn test_uploads_block_follows_trimmed_message() {
        let hidden = compose_with_uploads("  Small rose on the wrist \n", &urls());
        assert_eq!(
            hidden,
            "Small rose on the wrist\n\n---\nPhotos:\nhttps://ucarecdn.com/a/\nhttps://ucarecdn.com/b/"
        );
    }

    #[test]
    fn test_no_uploads_no_block() {
        assert_eq!(compose_with_uploads(" hello there ", &[]), "hello there");
    }

    #[test]
    fn test_resubmission_does_not_duplicate_block() {
        let first = compose_with_uploads("Small rose on the wrist", &urls());
        let second = compose_with_uploads(&first, &urls());
        assert_eq!(first, second);
        assert_eq!(second.matches(PHOTOS_SENTINEL).count(), 1);

        // Uploads removed since the last attempt drop the block entirely.
        assert_eq!(compose_with_uploads(&first, &[]), "Small rose on the wrist");
    }

    #[test]
    fn test_pattern_header_replaced_not_stacked() {
        let first = compose_with_pattern("I want it", "https://site/p1.jpg");
        assert_eq!(first, "I want it\n\n---\nChosen pattern:\nhttps://site/p1.jpg");

        let second = compose_with_pattern(&first, "https://site/p2.jpg");
        assert_eq!(second, "I want it\n\n---\nChosen pattern:\nhttps://site/p2.jpg");
    }

    #[test]
    fn test_pattern_without_url() {
        assert_eq!(compose_with_pattern(" plain ", ""), "plain");
    }

    #[test]
    fn test_template() {
        assert!(pattern_request_template("Snake").starts_with("I'd like this free pattern: Snake\n\n"));
        assert!(pattern_request_template(" ").starts_with("I'd like this free pattern:\n\n"));
    }
}
