//! Greedy word wrapping against measured text width.
//!
//! Words are taken left to right and appended to the current line while the joined line stays
//! strictly under `fill_ratio * target_width`. A word that overflows an empty line on its own is
//! split at its midpoint into two overlapping halves (`word[..=mid]` and `word[mid..]`), both are
//! pushed back to the front of the queue, and wrapping resumes. Halves are always shorter than the
//! word they came from, so the queue drains.

use std::collections::VecDeque;

use crate::text::font::TextMetrics;

/// Ratio of the target width a wrapped line must stay under.
pub const DEFAULT_FILL_RATIO: f32 = 0.95;

/// One wrapped line: the words it holds, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrappedLine {
    pub words: Vec<String>,
}

impl WrappedLine {
    /// The words joined with single spaces, as drawn.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Wrap `text` into lines whose rendered width at `size_px` stays under
/// `fill_ratio * target_width`.
///
/// Whitespace-only input yields no lines. A single character wider than the budget cannot be
/// split further and is placed on a line of its own.
pub fn wrap_text<M: TextMetrics + ?Sized>(
    metrics: &mut M,
    text: &str,
    size_px: f32,
    target_width: f32,
    fill_ratio: f32,
) -> Vec<WrappedLine> {
    let budget = target_width * fill_ratio;
    let mut queue: VecDeque<String> = text.split_whitespace().map(str::to_string).collect();
    let mut lines = Vec::new();

    while !queue.is_empty() {
        let mut line = WrappedLine::default();
        while let Some(word) = queue.front() {
            let candidate = if line.is_empty() {
                word.clone()
            } else {
                format!("{} {word}", line.text())
            };
            if metrics.text_width(&candidate, size_px) < budget {
                if let Some(word) = queue.pop_front() {
                    line.words.push(word);
                }
                continue;
            }
            if line.is_empty() {
                match split_word(word) {
                    Some((head, tail)) => {
                        queue.pop_front();
                        queue.push_front(tail);
                        queue.push_front(head);
                        continue;
                    }
                    None => {
                        if let Some(word) = queue.pop_front() {
                            line.words.push(word);
                        }
                    }
                }
            }
            break;
        }
        lines.push(line);
    }

    lines.retain(|l| !l.is_empty());
    lines
}

/// Split an overflowing word at its midpoint character.
///
/// Returns `(word[..=mid], word[mid..])` so the midpoint character appears in both halves. Two
/// character words split without overlap and single characters cannot be split.
pub fn split_word(word: &str) -> Option<(String, String)> {
    let chars: Vec<char> = word.chars().collect();
    match chars.len() {
        0 | 1 => None,
        2 => Some((chars[0].to_string(), chars[1].to_string())),
        n => {
            let mid = n / 2;
            Some((
                chars[..=mid].iter().collect(),
                chars[mid..].iter().collect(),
            ))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
