//! Visual reordering of one line of text.

use folio_style::BaseDirection;
use std::ops::Range;
use unicode_bidi::{BidiInfo, Level};

/// A directional run in visual order. `range` indexes characters of the
/// line in logical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualRun {
    pub range: Range<usize>,
    pub rtl: bool,
}

/// Splits `text` into runs in the order they appear on the page, left to
/// right. Text without right-to-left content in a left-to-right context is
/// returned as a single run.
pub fn visual_runs(text: &str, base: BaseDirection) -> Vec<VisualRun> {
    let char_count = text.chars().count();
    if char_count == 0 {
        return Vec::new();
    }

    let level = if base.is_rtl() { Level::rtl() } else { Level::ltr() };
    let info = BidiInfo::new(text, Some(level));
    if !base.is_rtl() && !info.has_rtl() {
        return vec![VisualRun {
            range: 0..char_count,
            rtl: false,
        }];
    }

    let byte_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let to_char = |byte: usize| match byte_starts.binary_search(&byte) {
        Ok(index) | Err(index) => index,
    };

    let mut runs = Vec::new();
    for paragraph in &info.paragraphs {
        let (levels, paragraph_runs) = info.visual_runs(paragraph, paragraph.range.clone());
        for run in paragraph_runs {
            let rtl = levels.get(run.start).is_some_and(|l| l.is_rtl());
            runs.push(VisualRun {
                range: to_char(run.start)..to_char(run.end),
                rtl,
            });
        }
    }
    runs
}
