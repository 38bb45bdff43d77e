//! OpenType shaping through rustybuzz.

use folio_traits::{FontError, FontMetrics, FontProgram, Glyph, TEXT_SPACE_COEFF};
use rustybuzz::{Direction, Feature, UnicodeBuffer};
use std::cell::RefCell;
use std::sync::{Arc, OnceLock};
use ttf_parser::{GlyphId, Tag};

// Reuse buffer to avoid allocations in the tight loop
thread_local! {
    static SCRATCH_BUFFER: RefCell<Option<UnicodeBuffer>> = RefCell::new(Some(UnicodeBuffer::new()));
}

fn features() -> &'static [Feature] {
    static FEATURES: OnceLock<Vec<Feature>> = OnceLock::new();
    FEATURES.get_or_init(|| {
        vec![
            Feature::new(Tag::from_bytes(b"liga"), 1, ..),
            Feature::new(Tag::from_bytes(b"kern"), 1, ..),
        ]
    })
}

/// A TrueType/OpenType font program held in memory.
///
/// Faces are re-parsed on demand; parsing only reads the table directory.
pub struct ShapedFont {
    name: String,
    data: Arc<Vec<u8>>,
    metrics: FontMetrics,
    units_per_em: f32,
}

impl std::fmt::Debug for ShapedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedFont")
            .field("name", &self.name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl ShapedFont {
    /// # Errors
    ///
    /// Returns `FontError::Parse` when the data is not a usable font.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, FontError> {
        let name = name.into();
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::Parse {
            name: name.clone(),
            message: e.to_string(),
        })?;

        let units_per_em = face.units_per_em() as f32;
        let to_text_space = |v: f32| v * TEXT_SPACE_COEFF / units_per_em;

        let typo_ascender = face.typographic_ascender().unwrap_or(face.ascender());
        let typo_descender = face.typographic_descender().unwrap_or(face.descender());
        let (win_ascender, win_descender) = face
            .tables()
            .os2
            .map(|os2| {
                (
                    os2.windows_ascender() as f32,
                    -(os2.windows_descender() as f32).abs(),
                )
            })
            .unwrap_or((0.0, 0.0));
        let underline = face.underline_metrics();

        let metrics = FontMetrics {
            typo_ascender: to_text_space(typo_ascender as f32),
            typo_descender: to_text_space(typo_descender as f32),
            win_ascender: to_text_space(win_ascender),
            win_descender: to_text_space(win_descender),
            underline_position: underline
                .map(|u| to_text_space(u.position as f32))
                .unwrap_or(-100.0),
            underline_thickness: underline
                .map(|u| to_text_space(u.thickness as f32))
                .unwrap_or(50.0),
        };
        log::debug!("Loaded font '{}' ({} units/em)", name, units_per_em);

        Ok(Self {
            name,
            data: Arc::new(data),
            metrics,
            units_per_em,
        })
    }

    fn scale(&self, units: f32) -> f32 {
        units * TEXT_SPACE_COEFF / self.units_per_em
    }
}

impl FontProgram for ShapedFont {
    fn postscript_name(&self) -> &str {
        &self.name
    }

    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn shape(&self, text: &str) -> Vec<Glyph> {
        let Some(face) = rustybuzz::Face::from_slice(&self.data, 0) else {
            log::warn!("Font '{}' could not be reopened for shaping", self.name);
            return Vec::new();
        };

        let mut buffer =
            SCRATCH_BUFFER.with(|b| b.borrow_mut().take().unwrap_or_else(UnicodeBuffer::new));
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let backwards = matches!(
            buffer.direction(),
            Direction::RightToLeft | Direction::BottomToTop
        );

        let glyph_buffer = rustybuzz::shape(&face, features(), buffer);
        let mut glyphs: Vec<Glyph> = glyph_buffer
            .glyph_infos()
            .iter()
            .zip(glyph_buffer.glyph_positions())
            .map(|(info, pos)| {
                let id = GlyphId(info.glyph_id as u16);
                let width = self.scale(face.glyph_hor_advance(id).unwrap_or(0) as f32);
                let unicode = text
                    .get(info.cluster as usize..)
                    .and_then(|rest| rest.chars().next());
                Glyph {
                    id: id.0,
                    width,
                    x_advance: self.scale(pos.x_advance as f32) - width,
                    unicode,
                }
            })
            .collect();
        // Callers break and reorder in logical order; bidi runs are reversed
        // once, at line reordering.
        if backwards {
            glyphs.reverse();
        }

        let recycled_buffer = glyph_buffer.clear();
        SCRATCH_BUFFER.with(|b| *b.borrow_mut() = Some(recycled_buffer));
        glyphs
    }

    fn glyph(&self, ch: char) -> Option<Glyph> {
        let face = ttf_parser::Face::parse(&self.data, 0).ok()?;
        let id = face.glyph_index(ch)?;
        let width = self.scale(face.glyph_hor_advance(id).unwrap_or(0) as f32);
        Some(Glyph::new(id.0, width, Some(ch)))
    }
}
