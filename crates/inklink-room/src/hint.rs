//! Hint masks.
//!
//! A hint renders a word one token per character, tokens joined by single
//! spaces. Alphabetic characters become `_` until the word is revealed;
//! everything else (spaces, hyphens, digits) shows through. "ice cream"
//! masks to `_ _ _   _ _ _ _ _`: the space between the words is itself a
//! token, so it appears as three spaces in a row.

/// The masked hint for `word`.
pub fn mask(word: &str) -> String {
    render(word, |c| if c.is_alphabetic() { '_' } else { c })
}

/// The revealed hint for `word`: the same layout as [`mask`], unmasked.
pub fn reveal(word: &str) -> String {
    render(word, |c| c)
}

fn render(word: &str, token: impl Fn(char) -> char) -> String {
    let mut out = String::with_capacity(word.len() * 2);
    for (i, c) in word.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(token(c));
    }
    out
}
