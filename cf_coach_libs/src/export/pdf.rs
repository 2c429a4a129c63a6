use crate::{
    color::Rgb,
    export::{
        layout::{Document, Element, Weight, PAGE_HEIGHT, PAGE_WIDTH},
        ExportError, Result,
    },
};
use printpdf::{
    path::PaintMode, BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
    Rect,
};

fn render_error(e: impl ToString) -> ExportError {
    ExportError::RenderError(e.to_string())
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, weight: Weight) -> &IndirectFontRef {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, element: &Element) {
    match element {
        Element::Fill {
            x,
            y,
            width,
            height,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let rect = Rect::new(
                Mm(*x),
                Mm(PAGE_HEIGHT - (y + height)),
                Mm(x + width),
                Mm(PAGE_HEIGHT - y),
            )
            .with_mode(PaintMode::Fill);
            layer.add_rect(rect);
        }
        Element::Text {
            x,
            y,
            size,
            weight,
            color,
            text,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT - y), fonts.get(*weight));
        }
    }
}

/// Serializes a laid-out document into PDF bytes with the built-in Helvetica
/// faces.
pub fn render(document: &Document) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        document.title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?,
    };

    for (i, page) in document.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Layer {}", i + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for element in page.elements.iter() {
            draw(&layer, &fonts, element);
        }
    }

    let bytes = doc.save_to_bytes().map_err(render_error)?;
    tracing::debug!(
        "rendered {} with {} pages into {} bytes",
        document.title,
        document.pages.len(),
        bytes.len()
    );
    Ok(bytes)
}
