use std::cell::RefCell;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use tracing::debug;

use crate::protocol::ImageSource;

const HALF_BLOCK: &str = "▀";

/// Last rendered area and the lines drawn for it.
type Rendered = ((u16, u16), Vec<Line<'static>>);

/// Decoded pixels of the displayed image, kept between frames.
pub struct Preview {
    image: DynamicImage,
    rendered: RefCell<Option<Rendered>>,
}

impl Preview {
    /// Decode a data URI source. Placeholders and undecodable payloads give `None`.
    pub fn from_source(source: &ImageSource) -> Option<Self> {
        let payload = source.payload()?;
        let bytes = match STANDARD.decode(payload) {
            Ok(b) => b,
            Err(e) => {
                debug!(error = %e, "payload is not base64, no preview");
                return None;
            }
        };
        match image::load_from_memory_with_format(&bytes, ImageFormat::Png) {
            Ok(image) => Some(Self {
                image,
                rendered: RefCell::new(None),
            }),
            Err(e) => {
                debug!(error = %e, "payload is not a PNG, no preview");
                None
            }
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Fit the image into `width` x `height` cells, two pixel rows per cell.
    /// The result is reused until the area changes.
    pub fn lines(&self, width: u16, height: u16) -> Vec<Line<'static>> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        if let Some((size, lines)) = self.rendered.borrow().as_ref() {
            if *size == (width, height) {
                return lines.clone();
            }
        }
        let lines = self.render(width, height);
        *self.rendered.borrow_mut() = Some(((width, height), lines.clone()));
        lines
    }

    fn render(&self, width: u16, height: u16) -> Vec<Line<'static>> {
        let fitted = self
            .image
            .resize(width as u32, height as u32 * 2, FilterType::Triangle)
            .to_rgb8();

        let (w, h) = fitted.dimensions();
        (0..h)
            .step_by(2)
            .map(|y| {
                let spans: Vec<Span<'static>> = (0..w)
                    .map(|x| {
                        let top = rgb(fitted.get_pixel(x, y).0);
                        let bottom = if y + 1 < h {
                            rgb(fitted.get_pixel(x, y + 1).0)
                        } else {
                            Color::Reset
                        };
                        Span::styled(HALF_BLOCK, Style::default().fg(top).bg(bottom))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}
