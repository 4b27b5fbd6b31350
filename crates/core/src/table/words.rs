//! Word assembly from ordered characters.
//!
//! Characters arrive in reading order from the extraction collaborator; a
//! word closes at whitespace, at a gap wider than the x-tolerance, or at a
//! baseline jump beyond the y-tolerance. For rotated text the axes swap.

use itertools::Itertools;

use crate::table::clustering::cluster_objects;
use crate::table::types::{Char, TextDir, Word};

#[cfg(test)]
use crate::geometry::BBox;

fn char_dir(c: &Char) -> TextDir {
    if c.upright { TextDir::Ltr } else { TextDir::Ttb }
}

/// Whether `curr` starts a new word after `prev`.
///
/// Along the reading axis a word breaks on backtracking or on a gap wider
/// than the tolerance; across it, on a shift beyond the tolerance.
fn begins_new_word(
    prev: &Char,
    curr: &Char,
    direction: TextDir,
    x_tolerance: f64,
    y_tolerance: f64,
) -> bool {
    let (read_tol, cross_tol, cross_prev, cross_curr, read_min, read_max, read_curr) =
        match direction {
            TextDir::Ltr => (
                x_tolerance,
                y_tolerance,
                prev.bbox.top,
                curr.bbox.top,
                prev.bbox.x0,
                prev.bbox.x1,
                curr.bbox.x0,
            ),
            TextDir::Ttb => (
                y_tolerance,
                x_tolerance,
                prev.bbox.x0,
                curr.bbox.x0,
                prev.bbox.top,
                prev.bbox.bottom,
                curr.bbox.top,
            ),
        };

    (read_curr < read_min)
        || (read_curr > read_max + read_tol)
        || ((cross_curr - cross_prev).abs() > cross_tol)
}

fn merge_chars(run: &[&Char]) -> Word {
    let mut bbox = run[0].bbox;
    let mut text = String::new();
    for c in run {
        bbox = bbox.union(&c.bbox);
        text.push_str(&c.text);
    }
    let doctop_adj = run[0].doctop - run[0].bbox.top;
    Word {
        text,
        bbox,
        doctop: bbox.top + doctop_adj,
        upright: run[0].upright,
        direction: char_dir(run[0]),
    }
}

/// Group ordered characters into words.
///
/// Whitespace-only characters terminate the current word and are dropped;
/// a trailing run with no terminator still closes at input end.
pub fn extract_words(chars: &[Char], x_tolerance: f64, y_tolerance: f64) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Vec<&Char> = Vec::new();

    for c in chars {
        if c.text.chars().all(char::is_whitespace) {
            if !current.is_empty() {
                words.push(merge_chars(&current));
                current.clear();
            }
            continue;
        }
        if let Some(prev) = current.last() {
            let direction = char_dir(prev);
            if c.upright != prev.upright
                || begins_new_word(prev, c, direction, x_tolerance, y_tolerance)
            {
                words.push(merge_chars(&current));
                current.clear();
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(merge_chars(&current));
    }
    words
}

/// Render words as plain text: cluster into lines along the cross axis,
/// order each line along its reading axis, join words with single spaces.
pub fn words_to_text(words: &[Word], y_tolerance: f64) -> String {
    if words.is_empty() {
        return String::new();
    }
    let line_key = |w: &Word| match w.direction {
        TextDir::Ltr => w.bbox.top,
        TextDir::Ttb => w.bbox.x0,
    };
    let lines = cluster_objects(words, line_key, y_tolerance);

    let mut line_texts = Vec::with_capacity(lines.len());
    for mut line in lines {
        line.sort_by(|a, b| {
            let ka = match a.direction {
                TextDir::Ltr => a.bbox.x0,
                TextDir::Ttb => a.bbox.top,
            };
            let kb = match b.direction {
                TextDir::Ltr => b.bbox.x0,
                TextDir::Ttb => b.bbox.top,
            };
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });
        line_texts.push(line.iter().map(|w| w.text.as_str()).join(" "));
    }
    line_texts.join("\n")
}

/// Extract plain text from a set of characters.
pub fn extract_text(chars: &[Char], x_tolerance: f64, y_tolerance: f64) -> String {
    let words = extract_words(chars, x_tolerance, y_tolerance);
    words_to_text(&words, y_tolerance)
}

#[cfg(test)]
pub(crate) fn make_char(text: &str, bbox: BBox) -> Char {
    Char {
        text: text.to_string(),
        bbox,
        doctop: bbox.top,
        fontname: "Helvetica".to_string(),
        size: bbox.height(),
        upright: true,
        page: 0,
    }
}
