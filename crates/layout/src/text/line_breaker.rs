//! Greedy single-line breaking over a glyph window.
//!
//! One call fills one line: it walks non-breakable parts from the window
//! start, commits every part that fits, and stops at the first part that
//! does not, at a forced newline, or at the end of the window. Parts that
//! do not fit are hyphenated when a hyphenator is available, and words wider
//! than a whole line are cut at the first overflowing glyph.

use super::glyph::{GlyphLine, is_invisible, scale};
use super::metrics::LineMetrics;
use folio_traits::{Glyph, Hyphenator};
use folio_types::geometry::EPSILON;

#[derive(Debug, Clone, Copy)]
pub struct LineBreakRequest<'a> {
    pub line: &'a GlyphLine,
    pub font_size: f32,
    pub metrics: LineMetrics,
    pub available_width: f32,
    pub available_height: f32,
    /// Extra width reserved for simulated italic and bold.
    pub style_allowance: f32,
    pub hyphenator: Option<&'a dyn Hyphenator>,
    pub hyphen: Option<Glyph>,
    /// When false a line taller than the area is placed anyway.
    pub check_height: bool,
    /// Content already sits on this line in front of the window.
    pub line_has_content: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakStatus {
    Full,
    Partial,
    Nothing,
}

#[derive(Debug, Clone)]
pub struct LineBreak {
    pub status: BreakStatus,
    /// What goes on this line. A hyphenated line lives in a new buffer that
    /// ends with the hyphen glyph.
    pub line: GlyphLine,
    /// Buffer index at which the remainder starts.
    pub overflow_start: Option<usize>,
    pub width: f32,
    pub height: f32,
    pub word_split: bool,
    pub forced_newline: bool,
    pub hyphenated: bool,
}

impl LineBreak {
    fn nothing(line: &GlyphLine) -> Self {
        Self {
            status: BreakStatus::Nothing,
            line: line.window(line.start, line.start),
            overflow_start: Some(line.start),
            width: 0.0,
            height: 0.0,
            word_split: false,
            forced_newline: false,
            hyphenated: false,
        }
    }
}

/// One scan over a non-breakable part starting at `pos`.
struct Part {
    /// Width of the whole part.
    width: f32,
    first_exceeding: Option<usize>,
    /// Exclusive end of the part.
    end: usize,
    newline: Option<usize>,
}

fn scan_part(req: &LineBreakRequest<'_>, pos: usize, current_width: f32) -> Part {
    let line = req.line;
    let mut part = Part {
        width: 0.0,
        first_exceeding: None,
        end: line.end,
        newline: None,
    };

    for ind in pos..line.end {
        let glyph = line.get(ind);
        if glyph.is_newline() {
            part.newline = Some(ind);
            part.end = ind;
            break;
        }

        let advance = line.glyph_advance(ind, req.font_size);
        // Trailing whitespace may hang past the edge; it is trimmed later.
        let hangs = glyph.is_whitespace() || is_invisible(glyph);
        if part.first_exceeding.is_none()
            && !hangs
            && current_width + part.width + advance + req.style_allowance
                > req.available_width + EPSILON
        {
            part.first_exceeding = Some(ind);
        }
        part.width += advance;

        if line.is_split_after(ind) {
            part.end = ind + 1;
            break;
        }
    }
    part
}

pub fn break_line(req: &LineBreakRequest<'_>) -> LineBreak {
    let line = req.line;
    let height = req.metrics.height();

    if req.check_height && height > req.available_height + EPSILON {
        return LineBreak::nothing(line);
    }

    let mut current_width = 0.0;
    let mut anything_placed = false;
    let mut pos = line.start;

    let finish = |status, end: usize, overflow: Option<usize>, width: f32, placed: bool| {
        LineBreak {
            status,
            line: line.window(line.start, end),
            overflow_start: overflow,
            width: if placed { width + req.style_allowance } else { width },
            height,
            word_split: false,
            forced_newline: false,
            hyphenated: false,
        }
    };

    while pos < line.end {
        if is_invisible(line.get(pos)) {
            pos += 1;
            continue;
        }

        let part = scan_part(req, pos, current_width);

        let Some(exceeding) = part.first_exceeding else {
            if part.end > pos {
                current_width += part.width;
                anything_placed = true;
            }
            pos = part.end;

            if let Some(newline) = part.newline {
                if newline + 1 >= line.end {
                    return finish(BreakStatus::Full, newline, None, current_width, anything_placed);
                }
                let mut result = finish(
                    BreakStatus::Partial,
                    newline,
                    Some(newline + 1),
                    current_width,
                    anything_placed,
                );
                result.forced_newline = true;
                return result;
            }
            continue;
        };

        if let Some(hyphenated) = try_hyphenate(req, pos, exceeding, current_width) {
            return hyphenated;
        }

        // Nothing precedes this part, so it is wider than the whole line.
        if !anything_placed && !req.line_has_content {
            let split_end = exceeding.max(pos + 1);
            let width = line.width_between(pos, split_end, req.font_size);
            let mut result = finish(
                BreakStatus::Partial,
                split_end,
                Some(split_end),
                current_width + width,
                true,
            );
            result.word_split = true;
            return result;
        }

        return finish(
            BreakStatus::Partial,
            pos,
            Some(pos),
            current_width,
            anything_placed,
        );
    }

    finish(BreakStatus::Full, line.end, None, current_width, anything_placed)
}

fn is_word_glyph(glyph: &Glyph) -> bool {
    glyph
        .unicode
        .is_some_and(|c| c.is_alphanumeric() || c == '\u{00AD}')
}

/// Hyphenates the word around `exceeding`, preferring the candidate that
/// keeps the most text on this line.
fn try_hyphenate(
    req: &LineBreakRequest<'_>,
    pos: usize,
    exceeding: usize,
    current_width: f32,
) -> Option<LineBreak> {
    let hyphenator = req.hyphenator?;
    let hyphen = req.hyphen?;
    let line = req.line;

    if !is_word_glyph(line.get(exceeding)) {
        return None;
    }
    let mut word_start = exceeding;
    while word_start > pos && is_word_glyph(line.get(word_start - 1)) {
        word_start -= 1;
    }
    let mut word_end = exceeding;
    while word_end < line.end && is_word_glyph(line.get(word_end)) {
        word_end += 1;
    }

    // Soft hyphens are not part of the dictionary word.
    let mut word = String::new();
    let mut char_positions = Vec::new();
    for index in word_start..word_end {
        if let Some(c) = line.get(index).unicode
            && c != '\u{00AD}'
        {
            word.push(c);
            char_positions.push(index);
        }
    }

    let hyphenation = hyphenator.hyphenate(&word)?;
    let hyphen_width = scale(hyphen.width, req.font_size);

    for candidate in (0..hyphenation.len()).rev() {
        let Some(pre_len) = hyphenation.break_point(candidate) else {
            continue;
        };
        if pre_len == 0 {
            continue;
        }
        let pre_end = char_positions.get(pre_len).copied().unwrap_or(word_end);
        let pre_width = line.width_between(pos, pre_end, req.font_size);
        if current_width + pre_width + hyphen_width + req.style_allowance
            <= req.available_width + EPSILON
        {
            log::debug!(
                "Hyphenated '{}' as '{}-'",
                word,
                hyphenation.pre_text(candidate)
            );
            return Some(LineBreak {
                status: BreakStatus::Partial,
                line: line.window(line.start, pre_end).with_appended(hyphen),
                overflow_start: Some(pre_end),
                width: current_width + pre_width + hyphen_width + req.style_allowance,
                height: req.metrics.height(),
                word_split: false,
                forced_newline: false,
                hyphenated: true,
            });
        }
    }
    None
}
