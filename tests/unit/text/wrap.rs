use super::*;
use crate::test_support::BlockFont;

// BlockFont at 10px: 5px per char, so a 100px target leaves 95px, i.e. at most 18 chars.
const SIZE: f32 = 10.0;
const WIDTH: f32 = 100.0;

fn wrap(text: &str) -> Vec<Vec<String>> {
    let mut font = BlockFont::new();
    wrap_text(&mut font, text, SIZE, WIDTH, DEFAULT_FILL_RATIO)
        .into_iter()
        .map(|l| l.words)
        .collect()
}

/// Undo midpoint splits: a fragment ending a word that was split overlaps its partner by one
/// char (two-char words split cleanly).
fn rejoin(fragments: &[&str]) -> String {
    let mut out = String::new();
    for (i, f) in fragments.iter().enumerate() {
        if i == 0 {
            out.push_str(f);
        } else {
            out.extend(f.chars().skip(1));
        }
    }
    out
}

#[test]
fn empty_and_blank_input_produce_no_lines() {
    assert!(wrap("").is_empty());
    assert!(wrap("   \n\t ").is_empty());
}

#[test]
fn short_text_fits_on_one_line() {
    assert_eq!(wrap("hello world"), vec![vec!["hello", "world"]]);
}

#[test]
fn words_fill_greedily_in_order() {
    // "aaaa bbbb cccc" is 14 chars (70px); adding " dddd" makes 19 chars (95px), not < 95.
    let lines = wrap("aaaa bbbb cccc dddd eeee");
    assert_eq!(
        lines,
        vec![vec!["aaaa", "bbbb", "cccc"], vec!["dddd", "eeee"]]
    );
}

#[test]
fn threshold_is_strict() {
    // 18 chars = 90px fits, 19 chars = 95px does not.
    let fits = "a".repeat(18);
    assert_eq!(wrap(&fits), vec![vec![fits.clone()]]);

    let boundary = "b".repeat(19);
    let lines = wrap(&boundary);
    assert!(lines.len() > 1);
}

#[test]
fn word_under_budget_is_never_split() {
    for n in 1..=18 {
        let w = "x".repeat(n);
        assert_eq!(wrap(&w), vec![vec![w.clone()]], "len {n}");
    }
}

#[test]
fn overlong_word_splits_at_midpoint_with_overlap() {
    let word = "abcdefghijklmnopqrstuvwxyz0123"; // 30 chars
    let lines = wrap(word);
    assert_eq!(lines, vec![vec!["abcdefghijklmnop"], vec!["pqrstuvwxyz0123"]]);
    let frags: Vec<&str> = lines.iter().flatten().map(String::as_str).collect();
    assert_eq!(rejoin(&frags), word);
}

#[test]
fn very_long_word_splits_recursively_and_every_line_fits() {
    let word = "z".repeat(100);
    let lines = wrap(&word);
    assert!(lines.len() >= 6);
    let mut font = BlockFont::new();
    for l in &lines {
        assert!(font.text_width(&l.join(" "), SIZE) < WIDTH * DEFAULT_FILL_RATIO);
    }
}

#[test]
fn split_halves_continue_filling_following_words() {
    let lines = wrap(&format!("{} ok", "q".repeat(30)));
    assert_eq!(lines.last().unwrap().last().unwrap(), "ok");
    assert_eq!(lines.len(), 2);
}

#[test]
fn unsplittable_wide_char_gets_its_own_line() {
    let mut font = BlockFont::new();
    // 5px per char against a 4px target: nothing fits.
    let lines = wrap_text(&mut font, "a b", SIZE, 4.0, DEFAULT_FILL_RATIO);
    let words: Vec<Vec<String>> = lines.into_iter().map(|l| l.words).collect();
    assert_eq!(words, vec![vec!["a"], vec!["b"]]);
}

#[test]
fn word_sequence_is_preserved_without_splits() {
    let text = "the quick brown fox jumps over the lazy dog and keeps running far away";
    let flat: Vec<String> = wrap(text).into_iter().flatten().collect();
    let expected: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    assert_eq!(flat, expected);
}

#[test]
fn no_line_is_ever_empty() {
    let lines = wrap(&format!("a {} b {}", "m".repeat(40), "n".repeat(25)));
    assert!(lines.iter().all(|l| !l.is_empty()));
}

#[test]
fn fill_ratio_one_uses_full_width() {
    let mut font = BlockFont::new();
    let w = "a".repeat(19);
    let lines = wrap_text(&mut font, &w, SIZE, WIDTH, 1.0);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text(), w);
}

#[test]
fn split_word_policy() {
    assert_eq!(split_word(""), None);
    assert_eq!(split_word("a"), None);
    assert_eq!(split_word("ab"), Some(("a".into(), "b".into())));
    assert_eq!(split_word("abc"), Some(("ab".into(), "bc".into())));
    assert_eq!(split_word("abcd"), Some(("abc".into(), "cd".into())));
    assert_eq!(split_word("héllo"), Some(("hél".into(), "llo".into())));
}
