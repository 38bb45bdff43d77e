//! Background colour and tiled background image.

use super::clip::clip_border_area;
use folio_style::{Background, BackgroundImage, Border};
use folio_traits::Canvas;
use folio_types::Rect;

/// Paints the background of a border box.
///
/// The colour fills the whole box; the image is tiled from the top-left
/// corner, repeating along each axis only when that axis' repeat flag is
/// set. Both are clipped to the rounded padding edge.
pub fn draw_background(
    canvas: &mut dyn Canvas,
    rect: Rect,
    background: Option<&Background>,
    image: Option<&BackgroundImage>,
    radius: f32,
    borders: &[Option<Border>; 4],
) {
    if background.is_none() && image.is_none() {
        return;
    }
    if rect.is_degenerate() {
        log::warn!("Skipping background of degenerate box {:?}", rect);
        return;
    }

    canvas.save_state();
    canvas.open_tag("Artifact");
    clip_border_area(canvas, &rect, radius, borders, false);
    if borders.iter().any(Option::is_some) {
        clip_border_area(canvas, &rect, radius, borders, true);
    }

    if let Some(background) = background {
        if background.opacity < 1.0 {
            canvas.set_opacity(background.opacity, 1.0);
        }
        canvas.set_fill_color(background.color);
        canvas.rectangle(rect);
        canvas.fill();
    }

    if let Some(image) = image {
        tile_image(canvas, rect, image);
    }

    canvas.close_tag();
    canvas.restore_state();
}

fn tile_image(canvas: &mut dyn Canvas, rect: Rect, image: &BackgroundImage) {
    if image.width <= 0.0 || image.height <= 0.0 {
        log::warn!(
            "Background image '{}' has degenerate size {}x{}, skipping",
            image.source.as_str(),
            image.width,
            image.height
        );
        return;
    }

    canvas.rectangle(rect);
    canvas.clip();
    canvas.end_path();

    let mut top = rect.top();
    loop {
        let mut x = rect.x;
        loop {
            canvas.add_image(
                &image.source,
                Rect::new(x, top - image.height, image.width, image.height),
            );
            x += image.width;
            if !image.repeat.x || x >= rect.right() {
                break;
            }
        }
        top -= image.height;
        if !image.repeat.y || top <= rect.bottom() {
            break;
        }
    }
}
