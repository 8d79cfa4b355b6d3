//! Word measurement shared by the request builder and the reporter

/// Count words as maximal runs of characters that are not separators
///
/// The same measure is applied to the original and the rewrite, so the
/// reported reduction stays comparable even where it differs from a
/// linguistic notion of "word".
pub fn count_words(text: &str) -> usize {
    words(text).count()
}

/// Whether `text` contains at least one word
pub fn has_words(text: &str) -> bool {
    words(text).next().is_some()
}

/// Unicode whitespace plus the ASCII information separators U+001C..=U+001F
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|word| !word.is_empty())
}
