//! Word boxes produced by text extraction
//!
//! Extraction backends report individual glyphs in content order. Words are
//! whitespace-delimited runs of glyphs on the same visual line, numbered in
//! the order they were produced.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// One extracted character with its bounds in top-left page units.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub rect: Rect,
}

impl Glyph {
    pub fn new(ch: char, rect: Rect) -> Self {
        Self { ch, rect }
    }

    fn is_separator(&self) -> bool {
        self.ch.is_whitespace() || self.ch.is_control()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub rect: Rect,
    pub text: String,
    /// Position in natural reading order within the page
    pub order: usize,
}

impl WordBox {
    pub fn new(rect: Rect, text: impl Into<String>, order: usize) -> Self {
        Self {
            rect,
            text: text.into(),
            order,
        }
    }
}

struct OpenWord {
    rect: Rect,
    text: String,
    last_x0: f64,
}

impl OpenWord {
    fn start(glyph: &Glyph) -> Self {
        Self {
            rect: glyph.rect.normalized(),
            text: glyph.ch.to_string(),
            last_x0: glyph.rect.x0,
        }
    }

    /// Whether `glyph` continues this word rather than starting a new one.
    fn accepts(&self, glyph: &Glyph) -> bool {
        let mid_y = (glyph.rect.y0 + glyph.rect.y1) / 2.0;
        let same_line = mid_y >= self.rect.y0 && mid_y <= self.rect.y1;
        // A glyph that starts left of its predecessor is a wrap onto a new line.
        let moves_forward = glyph.rect.x0 >= self.last_x0;
        same_line && moves_forward
    }

    fn push(&mut self, glyph: &Glyph) {
        self.rect = self.rect.union(&glyph.rect.normalized());
        self.text.push(glyph.ch);
        self.last_x0 = glyph.rect.x0;
    }
}

/// Group content-ordered glyphs into word boxes.
pub fn group_words<'a, I>(glyphs: I) -> Vec<WordBox>
where
    I: IntoIterator<Item = &'a Glyph>,
{
    let mut words = Vec::new();
    let mut open: Option<OpenWord> = None;

    for glyph in glyphs {
        if glyph.is_separator() {
            if let Some(word) = open.take() {
                close(word, &mut words);
            }
            continue;
        }

        match open.as_mut() {
            Some(word) if word.accepts(glyph) => word.push(glyph),
            _ => {
                if let Some(word) = open.replace(OpenWord::start(glyph)) {
                    close(word, &mut words);
                }
            }
        }
    }

    if let Some(word) = open.take() {
        close(word, &mut words);
    }

    words
}

fn close(word: OpenWord, words: &mut Vec<WordBox>) {
    let order = words.len();
    words.push(WordBox::new(word.rect, word.text, order));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn glyph(ch: char, x0: f64, y0: f64) -> Glyph {
        Glyph::new(ch, Rect::new(x0, y0, x0 + 5.0, y0 + 10.0))
    }

    #[test]
    fn test_empty_input() {
        let glyphs: Vec<Glyph> = Vec::new();
        assert!(group_words(&glyphs).is_empty());
    }

    #[test]
    fn test_splits_on_whitespace() {
        let glyphs = vec![
            glyph('H', 0.0, 0.0),
            glyph('i', 5.0, 0.0),
            glyph(' ', 10.0, 0.0),
            glyph('y', 15.0, 0.0),
            glyph('o', 20.0, 0.0),
        ];
        let words = group_words(&glyphs);
        assert_eq!(
            words,
            vec![
                WordBox::new(Rect::new(0.0, 0.0, 10.0, 10.0), "Hi", 0),
                WordBox::new(Rect::new(15.0, 0.0, 25.0, 10.0), "yo", 1),
            ]
        );
    }

    #[test]
    fn test_line_wrap_without_separator_starts_new_word() {
        let glyphs = vec![glyph('a', 50.0, 0.0), glyph('b', 0.0, 20.0)];
        let words = group_words(&glyphs);
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].text, "b");
        assert_eq!(words[1].order, 1);
    }

    #[test]
    fn test_vertical_jump_starts_new_word() {
        let glyphs = vec![glyph('a', 0.0, 0.0), glyph('b', 5.0, 30.0)];
        assert_eq!(group_words(&glyphs).len(), 2);
    }

    #[test]
    fn test_control_characters_separate_words() {
        let glyphs = vec![
            glyph('a', 0.0, 0.0),
            glyph('\r', 5.0, 0.0),
            glyph('\n', 5.0, 0.0),
            glyph('b', 5.0, 0.0),
        ];
        let texts: Vec<_> = group_words(&glyphs).into_iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["a".to_string(), "b".to_string()]);
    }
}
