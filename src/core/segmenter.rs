//! Claim segmentation.
//!
//! Splits raw text into an ordered sequence of claims on sentence-terminal
//! punctuation (`.`, `!`, `?`) followed by whitespace or end of text, and on
//! blank lines.
//!
//! A period is *not* terminal when:
//! - it sits inside a number (`3.5 meters`)
//! - it ends a known abbreviation (`Dr.`, `e.g.`, `U.S.`)
//! - it ends a single-letter initial (`J. K. Rowling`)
//! - the next word starts lowercase (`approx. three`)
//! - it follows a list number at the start of a line (`1. The tower...`)
//!
//! List markers (`1.`, `2)`, `-`, `*`) are stripped from the front of a claim
//! and a new list item always starts a new claim. Fragments without a single
//! letter are not claims; if nothing else is left the whole input is one claim.
//!
//! The rule set is a heuristic; only the resulting claim boundaries are
//! externally observable.

use super::error::VerifyError;
use crate::domain::Claim;

/// Lowercased abbreviations (without the final period) that never end a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "inc", "ltd", "co",
    "corp", "approx", "est", "dept", "fig", "gen", "gov", "sen", "rep", "lt",
    "col", "capt", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov",
    "dec", "ca", "cf", "al", "e.g", "i.e", "u.s", "u.k", "u.n", "a.m", "p.m", "ph.d", "b.c",
    "a.d",
];

/// Closing characters that may trail terminal punctuation and still belong to the sentence
fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// One to three digits, as in a numbered list
fn is_list_number(s: &str) -> bool {
    (1..=3).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Byte length of a leading list marker plus the whitespace after it
fn list_marker_len(s: &str) -> Option<usize> {
    let marker = if let Some(rest) = s.strip_prefix(|c: char| matches!(c, '-' | '*' | '\u{2022}')) {
        s.len() - rest.len()
    } else {
        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        if !is_list_number(&s[..digits]) {
            return None;
        }
        match s[digits..].chars().next() {
            Some('.') | Some(')') => digits + 1,
            _ => return None,
        }
    };

    let rest = &s[marker..];
    let body = rest.trim_start();
    if body.len() == rest.len() || body.is_empty() {
        return None;
    }
    Some(s.len() - body.len())
}

/// Split text into claims, preserving source order
pub fn segment(text: &str) -> Result<Vec<Claim>, VerifyError> {
    if text.trim().is_empty() {
        return Err(VerifyError::EmptyInput);
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut claims = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (byte_idx, c) = chars[i];

        if c == '\n' && (next_line_is_blank(&chars, i) || next_line_is_list_item(text, byte_idx)) {
            push_claim(text, start, byte_idx, &mut claims);
            start = byte_idx;
            i += 1;
            continue;
        }

        if !is_terminal(c) {
            i += 1;
            continue;
        }

        // Consume the punctuation run ("?!", "...") and any closing quotes/brackets
        let mut j = i + 1;
        while j < chars.len() && is_terminal(chars[j].1) {
            j += 1;
        }
        while j < chars.len() && is_closer(chars[j].1) {
            j += 1;
        }

        let run_end = chars.get(j).map(|(b, _)| *b).unwrap_or(text.len());
        let at_end = j >= chars.len();
        let followed_by_space = chars.get(j).map(|(_, n)| n.is_whitespace()).unwrap_or(false);

        let single_period = c == '.' && run_end - byte_idx == 1;
        let suppressed = single_period && !at_end && is_non_terminal_period(text, start, byte_idx, &chars, j);

        if (at_end || followed_by_space) && !suppressed {
            push_claim(text, start, run_end, &mut claims);
            start = run_end;
        }

        i = j;
    }

    push_claim(text, start, text.len(), &mut claims);

    if claims.is_empty() {
        let trimmed = text.trim();
        let offset = text.len() - text.trim_start().len();
        claims.push(Claim::new(trimmed, 0, offset));
    }

    Ok(claims)
}

/// Push `text[from..to]` as a claim, minus any list marker, if it contains a letter
fn push_claim(text: &str, from: usize, to: usize, claims: &mut Vec<Claim>) {
    let piece = &text[from..to];
    let mut trimmed = piece.trim();
    let mut offset = from + (piece.len() - piece.trim_start().len());

    if let Some(marker) = list_marker_len(trimmed) {
        trimmed = &trimmed[marker..];
        offset += marker;
    }

    if !trimmed.chars().any(char::is_alphabetic) {
        return;
    }

    let position = claims.len();
    claims.push(Claim::new(trimmed, position, offset));
}

/// True when the newline at `i` is followed by an empty (whitespace-only) line
fn next_line_is_blank(chars: &[(usize, char)], i: usize) -> bool {
    chars[i + 1..]
        .iter()
        .map(|(_, c)| *c)
        .take_while(|c| c.is_whitespace())
        .any(|c| c == '\n')
}

/// True when the line after the newline at `newline_idx` opens a list item
fn next_line_is_list_item(text: &str, newline_idx: usize) -> bool {
    let line = text[newline_idx + 1..].trim_start_matches(|c: char| c == ' ' || c == '\t');
    list_marker_len(line).is_some()
}

/// Decide whether a lone period at `period_idx` should not end the sentence
fn is_non_terminal_period(
    text: &str,
    sentence_start: usize,
    period_idx: usize,
    chars: &[(usize, char)],
    next: usize,
) -> bool {
    let before = &text[sentence_start..period_idx];

    // "1." opening a line or sentence is a list number
    let line = before.rsplit('\n').next().unwrap_or("").trim();
    if is_list_number(line) {
        return true;
    }

    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());

    if word.is_empty() {
        return false;
    }

    let lowered = word.to_lowercase();
    if ABBREVIATIONS.contains(&lowered.as_str()) {
        return true;
    }

    // Single-letter initial such as "J." in "J. K. Rowling"
    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        if first.is_uppercase() {
            return true;
        }
    }

    // A sentence never resumes in lowercase
    chars[next..]
        .iter()
        .map(|(_, c)| *c)
        .find(|c| !c.is_whitespace())
        .map(|c| c.is_lowercase())
        .unwrap_or(false)
}
