//! Culture-invariant text services.

use customers_core::platform::Localization;

/// Title-cases words the way an invariant culture does: the first letter of
/// every word is uppercased and the rest lowercased, except words written
/// entirely in capitals, which are treated as acronyms and left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvariantLocalization;

impl Localization for InvariantLocalization {
    fn to_title_case(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut word = String::new();

        for c in value.chars() {
            if c.is_alphanumeric() || c == '\'' {
                word.push(c);
            } else {
                push_title_word(&mut out, &word);
                word.clear();
                out.push(c);
            }
        }
        push_title_word(&mut out, &word);
        out
    }
}

fn push_title_word(out: &mut String, word: &str) {
    let mut letters = word.chars().filter(|c| c.is_alphabetic());
    let is_acronym = letters.clone().count() > 1 && letters.all(char::is_uppercase);
    if is_acronym {
        out.push_str(word);
        return;
    }

    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        for c in chars {
            out.extend(c.to_lowercase());
        }
    }
}
