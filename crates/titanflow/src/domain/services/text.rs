//! Text heuristics shared by the composer and the planner

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "you", "your", "this", "that", "with", "are", "was", "from", "have",
    "what", "here", "just", "into", "about", "they", "will", "how", "why", "its", "our",
];

/// Split text into sentences, keeping terminal punctuation
pub(crate) fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let at_boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().map(|n| n.is_whitespace()).unwrap_or(true);
        if at_boundary {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

pub(crate) fn first_sentence(text: &str) -> Option<String> {
    sentences(text).into_iter().next()
}

/// Remove `[stage directions]`
pub(crate) fn strip_directions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Contents of every `[stage direction]`, in order
pub(crate) fn directions(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                let inner = after[..close].trim();
                if !inner.is_empty() {
                    out.push(inner.to_string());
                }
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    out
}

/// Words that would be spoken aloud
pub(crate) fn spoken_word_count(text: &str) -> usize {
    strip_directions(text).split_whitespace().count()
}

/// Lowercase content words of at least three letters
pub(crate) fn keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Lowercase the leading letter unless the first word is an acronym
pub(crate) fn lowercase_first(text: &str) -> String {
    let text = text.trim();
    let first_word = text.split_whitespace().next().unwrap_or("");
    if first_word.chars().filter(|c| c.is_uppercase()).count() > 1 {
        return text.to_string();
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drop trailing sentence punctuation
pub(crate) fn trim_terminal(text: &str) -> &str {
    text.trim().trim_end_matches(['.', '!', '?'])
}

/// First `max_words` spoken words, with an ellipsis when truncated
pub(crate) fn headline(text: &str, max_words: usize) -> String {
    let clean = strip_directions(text);
    let words: Vec<&str> = clean.split_whitespace().collect();
    if words.len() <= max_words {
        words.join(" ")
    } else {
        format!("{}...", words[..max_words].join(" "))
    }
}
