/// Escape text for insertion into HTML element content or quoted attribute values.
///
/// Every server-supplied string goes through this before it reaches markup.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Avatar initials for a participant identifier.
///
/// First character of each whitespace-separated token, at most two of them,
/// uppercased. An identifier without inner whitespace yields one letter.
///
/// Truncation happens before uppercasing, so a letter whose uppercase form is
/// longer ("ß" → "SS") can yield more than two characters.
pub fn initials(identifier: &str) -> String {
    identifier
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn escape_html__should_replace_markup_characters() {
        // When
        let escaped = escape_html(r#"<a href="x">Tom & Jerry's</a>"#);

        // Then
        assert_eq!(
            escaped,
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
        for raw in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(raw), "unescaped {raw:?} in {escaped}");
        }
        assert_eq!(escaped.matches('&').count(), escaped.matches(';').count());
    }

    #[test]
    fn escape_html__should_leave_plain_text_unchanged() {
        // Given
        let plain = "Chess Club meets Fridays, 3:30 PM - 5:00 PM";

        // Then
        assert_eq!(escape_html(plain), plain);
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn escape_html__should_escape_ampersand_first() {
        // Then
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn initials__should_take_first_letter_of_each_word() {
        // Then
        assert_eq!(initials("Ada Lovelace"), "AL");
        assert_eq!(initials("Jane Doe"), "JD");
        assert_eq!(initials("  grace   brewster murray hopper "), "GB");
    }

    #[test]
    fn initials__should_use_single_letter_without_whitespace() {
        // Then
        assert_eq!(initials("ada@example.com"), "A");
        assert_eq!(initials("j@x.com"), "J");
    }

    #[test]
    fn initials__should_truncate_before_uppercasing() {
        // Then
        assert_eq!(initials("ßeta xi omega"), "SSX");
    }

    #[test]
    fn initials__should_be_empty_for_blank_identifier() {
        // Then
        assert_eq!(initials(""), "");
        assert_eq!(initials("   "), "");
    }
}
