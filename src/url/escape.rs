/// Characters that appear in feed URLs but are not legal in a request target
const INVALID_CHARACTERS: [char; 7] = ['{', '}', '|', '^', '[', ']', '`'];

/// Percent-escapes characters that make an otherwise usable URL unparseable
///
/// Only `{ } | ^ [ ] \`` are touched; everything else, including existing
/// percent escapes, is left as is.
///
/// # Examples
///
/// ```
/// use linkrot::url::escape_invalid_characters;
///
/// assert_eq!(
///     escape_invalid_characters("http://example.com/a{b}|c"),
///     "http://example.com/a%7Bb%7D%7Cc"
/// );
/// assert_eq!(escape_invalid_characters("http://example.com/ok"), "http://example.com/ok");
/// ```
pub fn escape_invalid_characters(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    let mut buf = [0u8; 4];

    for c in raw.chars() {
        if INVALID_CHARACTERS.contains(&c) {
            escaped.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        } else {
            escaped.push(c);
        }
    }

    escaped
}
