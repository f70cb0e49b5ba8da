use crate::types::Token;

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];
const MAX_SPELLED_NUMBER: u64 = 999_999_999;

/// Split a transcript on whitespace. Surface text is kept verbatim; the
/// normalized form is case-folded only when `lowercase` is set.
pub fn normalize_transcript(text: &str, lowercase: bool) -> Vec<Token> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, surface)| Token {
            surface: surface.to_string(),
            normalized: if lowercase {
                surface.to_lowercase()
            } else {
                surface.to_string()
            },
            position,
        })
        .collect()
}

/// Sub-words used to pronounce a word missing from the lexicon: hyphen
/// separated parts, with all-digit parts spelled out in English.
pub fn compound_parts(word: &str) -> Vec<String> {
    let mut parts = Vec::new();
    for part in word.split('-').filter(|p| !p.is_empty()) {
        match spell_out_number(part) {
            Some(words) => parts.extend(words),
            None => parts.push(part.to_string()),
        }
    }
    parts
}

/// English words for an all-digit string, e.g. `"105"` → `one hundred five`.
/// Returns `None` for anything that is not a plain cardinal in range.
pub fn spell_out_number(digits: &str) -> Option<Vec<String>> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;
    if value > MAX_SPELLED_NUMBER {
        return None;
    }
    if value == 0 {
        return Some(vec![ONES[0].to_string()]);
    }

    let mut words = Vec::new();
    let mut remaining = value;
    for (scale, name) in [(1_000_000, "million"), (1_000, "thousand")] {
        if remaining >= scale {
            push_below_thousand(remaining / scale, &mut words);
            words.push(name);
            remaining %= scale;
        }
    }
    push_below_thousand(remaining, &mut words);
    Some(words.into_iter().map(str::to_string).collect())
}

fn push_below_thousand(value: u64, words: &mut Vec<&'static str>) {
    let hundreds = (value / 100) as usize;
    let rest = (value % 100) as usize;
    if hundreds > 0 {
        words.push(ONES[hundreds]);
        words.push("hundred");
    }
    if rest >= 20 {
        words.push(TENS[rest / 10]);
        if rest % 10 > 0 {
            words.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        words.push(ONES[rest]);
    }
}
