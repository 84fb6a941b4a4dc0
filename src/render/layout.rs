//! Text fitting and placement for quote images, independent of any raster
//! backend. Coordinates are canvas pixels, `y` values are text baselines.

use crate::models::ImageSize;

const FONT_STEP: f32 = 2.0;
const LINE_HEIGHT: f32 = 1.22;
const CREDIT_LINE_HEIGHT: f32 = 1.35;

pub trait TextMeasure {
    /// Horizontal advance of `text` rendered at `px` pixels.
    fn width(&self, text: &str, px: f32) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub card_padding: f32,
    pub base_font: f32,
    pub min_font: f32,
    pub max_lines: usize,
    pub credit_font: f32,
    pub brand_height: f32,
}

impl Geometry {
    pub fn for_size(size: ImageSize) -> Self {
        let (w, h) = size.dimensions();
        match size {
            ImageSize::Square => Self {
                width: w as f32,
                height: h as f32,
                padding: 64.0,
                card_padding: 48.0,
                base_font: 56.0,
                min_font: 32.0,
                max_lines: 8,
                credit_font: 28.0,
                brand_height: 80.0,
            },
            ImageSize::Story => Self {
                width: w as f32,
                height: h as f32,
                padding: 72.0,
                card_padding: 56.0,
                base_font: 72.0,
                min_font: 40.0,
                max_lines: 10,
                credit_font: 36.0,
                brand_height: 90.0,
            },
        }
    }

    pub fn card_x(&self) -> f32 {
        self.padding
    }

    pub fn card_y(&self) -> f32 {
        self.padding * 1.2
    }

    pub fn card_width(&self) -> f32 {
        self.width - self.padding * 2.0
    }

    pub fn text_box_width(&self) -> f32 {
        self.card_width() - self.card_padding * 2.0
    }

    pub fn text_left(&self) -> f32 {
        (self.width - self.text_box_width()) / 2.0
    }

    /// Top-left corner of the brand mark.
    pub fn brand_origin(&self) -> (f32, f32) {
        (
            self.card_x() + self.card_padding * 0.2,
            self.card_y() + self.card_padding * 0.2,
        )
    }
}

/// Greedy word wrap. A word that starts a line is always kept, so a single
/// over-wide word gets a line of its own.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_width: f32,
    px: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", line, word);
        if measure.width(&candidate, px) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    pub font_size: f32,
    pub lines: Vec<String>,
}

/// Largest size in `[min, base]`, stepping down by 2px, whose wrap fits in
/// `max_lines`. Settles on `min` when nothing fits.
pub fn fit_content_font<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_width: f32,
    max_lines: usize,
    base: f32,
    min: f32,
) -> Fit {
    let mut size = base.max(min);
    loop {
        let lines = wrap_text(measure, text, max_width, size);
        if lines.len() <= max_lines || size <= min {
            return Fit {
                font_size: size,
                lines,
            };
        }
        size = (size - FONT_STEP).max(min);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteLayout {
    pub font_size: f32,
    pub line_height: f32,
    pub lines: Vec<PlacedLine>,
    pub credit_size: f32,
    pub credit_line_height: f32,
    pub credit_lines: Vec<PlacedLine>,
    pub block_top: f32,
    pub block_height: f32,
}

pub fn layout_quote<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    credit: &str,
    geo: &Geometry,
) -> QuoteLayout {
    let box_w = geo.text_box_width();
    let left = geo.text_left();

    let fit = fit_content_font(measure, text, box_w, geo.max_lines, geo.base_font, geo.min_font);
    let size = fit.font_size;
    let line_height = size * LINE_HEIGHT;

    let credit_size = geo.credit_font;
    let credit_line_height = credit_size * CREDIT_LINE_HEIGHT;
    let gap = (geo.height * 0.2).min(line_height * 1.6);
    let credit_wrapped = wrap_text(measure, &format!("— {}", credit), box_w, credit_size);

    let content_height = fit.lines.len() as f32 * line_height;
    let credit_height = credit_wrapped.len() as f32 * credit_line_height;
    let block_height = content_height + gap + credit_height;
    let block_top = (geo.height - block_height) / 2.0;

    let mut y = block_top + size;
    let mut lines = Vec::with_capacity(fit.lines.len());
    for text in fit.lines {
        lines.push(PlacedLine {
            text,
            x: left,
            baseline: y,
        });
        y += line_height;
    }

    // credit stays inside the bottom card padding
    let max_credit_start = geo.height - geo.card_padding - credit_height + credit_size;
    let mut cy = (y + gap + credit_size - size).min(max_credit_start);
    let mut credit_lines = Vec::with_capacity(credit_wrapped.len());
    for text in credit_wrapped {
        credit_lines.push(PlacedLine {
            text,
            x: left,
            baseline: cy,
        });
        cy += credit_line_height;
    }

    QuoteLayout {
        font_size: size,
        line_height,
        lines,
        credit_size,
        credit_line_height,
        credit_lines,
        block_top,
        block_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Every char advances half the pixel size.
    struct Monospace;

    impl TextMeasure for Monospace {
        fn width(&self, text: &str, px: f32) -> f32 {
            text.chars().count() as f32 * px * 0.5
        }
    }

    #[test]
    fn text_box_matches_canvas_geometry() {
        let square = Geometry::for_size(ImageSize::Square);
        assert_eq!(square.text_box_width(), 856.0);
        assert_eq!(square.text_left(), 112.0);
        let (bx, by) = square.brand_origin();
        assert!((bx - 73.6).abs() < 1e-3 && (by - 86.4).abs() < 1e-3);
        let story = Geometry::for_size(ImageSize::Story);
        assert_eq!(story.text_box_width(), 824.0);
    }

    #[test]
    fn wrap_is_greedy() {
        // 10px per char at 20px
        let lines = wrap_text(&Monospace, "aaa bbb ccc dddd", 70.0, 20.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc", "dddd"]);
    }

    #[test]
    fn wrap_keeps_over_wide_words() {
        let lines = wrap_text(&Monospace, "a enormousword b", 50.0, 20.0);
        assert_eq!(lines, vec!["a", "enormousword", "b"]);
        assert!(wrap_text(&Monospace, "   ", 50.0, 20.0).is_empty());
    }

    #[test]
    fn short_text_keeps_base_size() {
        let fit = fit_content_font(&Monospace, "Hello world", 856.0, 8, 56.0, 32.0);
        assert_eq!(fit.font_size, 56.0);
        assert_eq!(fit.lines, vec!["Hello world"]);
    }

    #[test]
    fn long_text_shrinks_until_it_fits() {
        let text = "word ".repeat(60);
        let fit = fit_content_font(&Monospace, &text, 856.0, 8, 56.0, 32.0);
        assert!(fit.font_size < 56.0);
        assert!(fit.font_size >= 32.0);
        assert!(fit.lines.len() <= 8);
        // one step larger would have overflowed
        let bigger = wrap_text(&Monospace, &text, 856.0, fit.font_size + 2.0);
        assert!(bigger.len() > 8);
    }

    #[test]
    fn hopeless_text_settles_on_minimum() {
        let text = "word ".repeat(1000);
        let fit = fit_content_font(&Monospace, &text, 856.0, 8, 56.0, 32.0);
        assert_eq!(fit.font_size, 32.0);
        assert!(fit.lines.len() > 8);
    }

    #[test]
    fn block_is_vertically_centred() {
        let geo = Geometry::for_size(ImageSize::Square);
        let layout = layout_quote(&Monospace, "Hi", "X", &geo);
        assert_eq!(layout.font_size, 56.0);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.credit_lines.len(), 1);
        assert_eq!(layout.credit_lines[0].text, "— X");

        let top_gap = layout.block_top;
        let bottom_gap = geo.height - (layout.block_top + layout.block_height);
        assert!((top_gap - bottom_gap).abs() < 1e-3);
        assert_eq!(layout.lines[0].baseline, layout.block_top + 56.0);
        assert_eq!(layout.lines[0].x, geo.text_left());

        let gap = (geo.height * 0.2).min(layout.line_height * 1.6);
        let expected = layout.lines[0].baseline + layout.line_height + gap + 28.0 - 56.0;
        assert!((layout.credit_lines[0].baseline - expected).abs() < 1e-3);
    }

    #[test]
    fn credit_is_clamped_inside_bottom_padding() {
        let geo = Geometry::for_size(ImageSize::Square);
        let text = "word ".repeat(1000);
        let layout = layout_quote(&Monospace, &text, "Someone", &geo);
        let credit_height = layout.credit_lines.len() as f32 * layout.credit_line_height;
        let limit = geo.height - geo.card_padding - credit_height + layout.credit_size;
        assert_eq!(layout.credit_lines[0].baseline, limit);
    }

    proptest! {
        #[test]
        fn fitting_stays_within_bounds(
            words in proptest::collection::vec("[a-z]{1,12}", 1..200),
            story in any::<bool>(),
        ) {
            let size = if story { ImageSize::Story } else { ImageSize::Square };
            let geo = Geometry::for_size(size);
            let text = words.join(" ");
            let fit = fit_content_font(
                &Monospace, &text, geo.text_box_width(), geo.max_lines, geo.base_font, geo.min_font,
            );
            prop_assert!(fit.font_size >= geo.min_font && fit.font_size <= geo.base_font);
            prop_assert!(fit.lines.len() <= geo.max_lines || fit.font_size == geo.min_font);
            prop_assert_eq!(fit.lines.join(" "), text);
        }
    }
}
