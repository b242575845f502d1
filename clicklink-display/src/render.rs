//! Draws a text layer onto any monochrome draw target

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::layout::wrap;
use crate::text_layer::{TextAlignment, TextLayer};

const GLYPH_WIDTH: u32 = 6;
const LINE_HEIGHT: u32 = 10;

/// Clear `target` and draw the layer's label, wrapped and aligned
pub fn render<T>(layer: &TextLayer, target: &mut T) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;

    let size = target.bounding_box().size;
    let inset = layer.inset();
    let width = size.width.saturating_sub(2 * inset);
    let height = size.height.saturating_sub(2 * inset);

    let cols = (width / GLYPH_WIDTH) as usize;
    let rows = (height / LINE_HEIGHT) as usize;

    let (alignment, x) = match layer.alignment() {
        TextAlignment::Left => (Alignment::Left, inset),
        TextAlignment::Center => (Alignment::Center, inset + width / 2),
        TextAlignment::Right => (Alignment::Right, inset + width),
    };

    let character_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Top)
        .build();

    for (row, line) in wrap(layer.text(), cols, rows).iter().enumerate() {
        let y = inset + row as u32 * LINE_HEIGHT;
        Text::with_text_style(
            line,
            Point::new(x as i32, y as i32),
            character_style,
            text_style,
        )
        .draw(target)?;
    }

    Ok(())
}
