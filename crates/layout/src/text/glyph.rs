use folio_traits::{Glyph, TEXT_SPACE_COEFF};
use std::sync::Arc;
use unicode_linebreak::{BreakOpportunity, linebreaks};

/// Zero-width controls that are skipped without taking any width.
pub fn is_invisible(glyph: &Glyph) -> bool {
    matches!(
        glyph.unicode,
        Some(
            '\u{00AD}'
                | '\u{200B}'..='\u{200F}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2060}'..='\u{2064}'
                | '\u{2066}'..='\u{2069}'
                | '\u{FEFF}'
        )
    )
}

/// Converts a glyph-space value (1/1000 em) to points.
pub fn scale(value: f32, font_size: f32) -> f32 {
    value * font_size / TEXT_SPACE_COEFF
}

/// A `[start, end)` window over an immutable, shared glyph buffer.
///
/// Split and overflow fragments of one text run alias the same buffer with
/// disjoint windows; narrowing a window never touches the glyphs.
#[derive(Debug, Clone)]
pub struct GlyphLine {
    glyphs: Arc<[Glyph]>,
    /// `split_after[i]` is set when a line may break between glyph `i` and `i + 1`.
    split_after: Arc<[bool]>,
    pub start: usize,
    pub end: usize,
}

impl GlyphLine {
    pub fn new(glyphs: Vec<Glyph>) -> Self {
        let split_after = break_opportunities(&glyphs);
        let end = glyphs.len();
        Self {
            glyphs: glyphs.into(),
            split_after: split_after.into(),
            start: 0,
            end,
        }
    }

    pub fn from_text(text: &str, advance: f32) -> Self {
        Self::new(
            text.chars()
                .map(|c| Glyph::new(c as u16, advance, Some(c)))
                .collect(),
        )
    }

    /// The same buffer with a different window.
    pub fn window(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.glyphs.len());
        Self {
            glyphs: self.glyphs.clone(),
            split_after: self.split_after.clone(),
            start: start.min(end),
            end,
        }
    }

    /// A new buffer holding this window followed by `glyph`.
    pub fn with_appended(&self, glyph: Glyph) -> Self {
        let mut glyphs = self.as_slice().to_vec();
        glyphs.push(glyph);
        Self::new(glyphs)
    }

    /// A new buffer holding this window in reverse order.
    pub fn reversed(&self) -> Self {
        Self::new(self.as_slice().iter().rev().copied().collect())
    }

    pub fn shares_buffer(&self, other: &GlyphLine) -> bool {
        Arc::ptr_eq(&self.glyphs, &other.glyphs)
    }

    /// Glyph at an absolute buffer index.
    pub fn get(&self, index: usize) -> &Glyph {
        &self.glyphs[index]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn as_slice(&self) -> &[Glyph] {
        &self.glyphs[self.start..self.end]
    }

    pub fn is_split_after(&self, index: usize) -> bool {
        self.split_after.get(index).copied().unwrap_or(false)
    }

    pub fn text(&self) -> String {
        self.text_between(self.start, self.end)
    }

    pub fn text_between(&self, start: usize, end: usize) -> String {
        self.glyphs[start..end]
            .iter()
            .filter_map(|g| g.unicode)
            .collect()
    }

    /// Advance contributed by glyph `index`: its width plus the positional
    /// adjustment of the glyph before it in the window.
    pub fn glyph_advance(&self, index: usize, font_size: f32) -> f32 {
        let glyph = &self.glyphs[index];
        let width = if is_invisible(glyph) { 0.0 } else { glyph.width };
        let kerning = if index > self.start {
            self.glyphs[index - 1].x_advance
        } else {
            0.0
        };
        scale(width + kerning, font_size)
    }

    pub fn width_between(&self, start: usize, end: usize, font_size: f32) -> f32 {
        (start..end)
            .map(|i| self.glyph_advance(i, font_size))
            .sum()
    }

    pub fn width(&self, font_size: f32) -> f32 {
        self.width_between(self.start, self.end, font_size)
    }

    pub fn count_spaces(&self) -> usize {
        self.as_slice().iter().filter(|g| g.is_space()).count()
    }
}

fn break_opportunities(glyphs: &[Glyph]) -> Vec<bool> {
    let mut split_after = vec![false; glyphs.len()];
    if glyphs.is_empty() {
        return split_after;
    }

    let text: String = glyphs
        .iter()
        .map(|g| g.unicode.unwrap_or('\u{FFFC}'))
        .collect();
    let char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();

    for (offset, opportunity) in linebreaks(&text) {
        if offset >= text.len() {
            continue;
        }
        if matches!(opportunity, BreakOpportunity::Allowed | BreakOpportunity::Mandatory)
            && let Ok(char_index) = char_starts.binary_search(&offset)
            && char_index > 0
        {
            split_after[char_index - 1] = true;
        }
    }
    split_after
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaks_after_spaces() {
        let line = GlyphLine::from_text("ab cd", 500.0);
        assert!(!line.is_split_after(0));
        assert!(!line.is_split_after(1));
        assert!(line.is_split_after(2));
        assert!(!line.is_split_after(3));
    }

    #[test]
    fn test_hyphen_breaks_except_before_digit() {
        let line = GlyphLine::from_text("well-known", 500.0);
        assert!(line.is_split_after(4));

        let line = GlyphLine::from_text("a -5", 500.0);
        assert!(!line.is_split_after(2));
    }

    #[test]
    fn test_ideographs_break_between_each_other() {
        let line = GlyphLine::from_text("漢字漢字", 1000.0);
        assert!(line.is_split_after(0));
        assert!(line.is_split_after(1));
    }

    #[test]
    fn test_windows_share_buffer() {
        let line = GlyphLine::from_text("hello world", 500.0);
        let left = line.window(0, 6);
        let right = line.window(6, 11);
        assert!(left.shares_buffer(&right));
        assert_eq!(left.text(), "hello ");
        assert_eq!(right.text(), "world");

        let hyphenated = left.with_appended(Glyph::new(45, 500.0, Some('-')));
        assert!(!hyphenated.shares_buffer(&line));
        assert_eq!(hyphenated.text(), "hello -");
    }

    #[test]
    fn test_width_includes_kerning_of_previous_glyph() {
        let mut glyphs: Vec<Glyph> = "AV"
            .chars()
            .map(|c| Glyph::new(c as u16, 600.0, Some(c)))
            .collect();
        glyphs[0].x_advance = -100.0;
        let line = GlyphLine::new(glyphs);
        assert!((line.width(10.0) - 11.0).abs() < 1e-4);
    }
}
