//! Helvetica glyph metrics for the built-in PDF base fonts.
//!
//! The base-14 fonts carry no embedded metrics, so text measurement for
//! wrapping and right alignment uses the standard AFM advance widths
//! (thousandths of an em) for printable ASCII. Accented Latin-1 letters are
//! measured as their base letter and any other encodable glyph as a digit.
//!
//! The base fonts only cover the WinAnsi repertoire. [`to_win_ansi`] maps
//! everything else to a visible `?` before measuring, so the width used for
//! wrapping and alignment is the width of what ends up on the page.

use std::borrow::Cow;

use super::layout::FontWeight;

const FALLBACK_WIDTH: u16 = 556;

/// Advance widths for U+0020..=U+007E, Helvetica.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths for U+0020..=U+007E, Helvetica-Bold.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// WinAnsi code points above Latin-1 (the 0x80..=0x9F block).
const WIN_ANSI_EXTRA: [char; 27] = [
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Printed in place of characters the base fonts cannot encode.
pub const REPLACEMENT_CHAR: char = '?';

fn is_win_ansi(ch: char) -> bool {
    matches!(ch as u32, 0x20..=0x7e | 0xa0..=0xff) || WIN_ANSI_EXTRA.contains(&ch)
}

fn map_win_ansi(ch: char) -> char {
    match ch {
        '\n' => '\n',
        c if c.is_whitespace() => ' ',
        c if is_win_ansi(c) => c,
        _ => REPLACEMENT_CHAR,
    }
}

/// Reduce `text` to characters the Helvetica base fonts can encode. Newlines
/// are kept, other whitespace becomes a space and anything else outside
/// WinAnsi becomes [`REPLACEMENT_CHAR`].
pub fn to_win_ansi(text: &str) -> Cow<'_, str> {
    if text.chars().all(|ch| map_win_ansi(ch) == ch) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().map(map_win_ansi).collect())
    }
}

fn latin_base(ch: char) -> char {
    match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'Š' => 'S',
        'š' => 's',
        'Ž' => 'Z',
        'ž' => 'z',
        other => other,
    }
}

fn glyph_width(ch: char, weight: FontWeight) -> u16 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    };
    let code = latin_base(ch) as u32;
    if (0x20..=0x7e).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` in points.
pub fn text_width(text: &str, weight: FontWeight, size: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(ch, weight))).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap to `max_width` points. Words longer than a full line are
/// split by character. Always returns at least one (possibly empty) line.
pub fn wrap_text(text: &str, weight: FontWeight, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for source_line in text.split('\n') {
        let mut current = String::new();

        for word in source_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, weight, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, weight, size) <= max_width {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    let mut next = current.clone();
                    next.push(ch);
                    if !current.is_empty() && text_width(&next, weight, size) > max_width {
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    } else {
                        current = next;
                    }
                }
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
