use super::layout::{layout_quote, Geometry, QuoteLayout, TextMeasure};
use crate::models::ImageSize;
use crate::themes::{hex_to_rgb, Palette};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub palette: Palette,
    pub brand_candidates: Vec<PathBuf>,
    pub font_candidates: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Overrides the generated `quote-{size}-{timestamp}.png` name.
    pub filename: Option<String>,
}

/// ab_glyph advance widths with pair kerning.
pub struct GlyphMeasure<'a, F: Font> {
    font: &'a F,
}

impl<'a, F: Font> GlyphMeasure<'a, F> {
    pub fn new(font: &'a F) -> Self {
        Self { font }
    }
}

impl<F: Font> TextMeasure for GlyphMeasure<'_, F> {
    fn width(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let mut width = 0.0;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }
}

/// Render and save a quote card. `Ok(None)` when no font could be loaded,
/// which stands in for "no drawing surface": nothing is written and no
/// error is raised.
pub fn render_quote_image(
    text: &str,
    credit: &str,
    size: ImageSize,
    opts: &ExportOptions,
) -> Result<Option<PathBuf>> {
    let Some(font) = load_font(&opts.font_candidates) else {
        debug!("no usable font, skipping export");
        return Ok(None);
    };

    let canvas = draw_quote(&font, text, credit, size, opts);
    let bytes = encode_png(&canvas)?;

    let name = opts
        .filename
        .clone()
        .unwrap_or_else(|| default_filename(size, Utc::now()));
    let path = opts.output_dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create export directory {}", parent.display()))?;
    }
    fs::write(&path, bytes).with_context(|| format!("Could not write {}", path.display()))?;

    info!(path = %path.display(), size = size.slug(), "quote image exported");
    Ok(Some(path))
}

pub fn draw_quote<F: Font>(
    font: &F,
    text: &str,
    credit: &str,
    size: ImageSize,
    opts: &ExportOptions,
) -> RgbaImage {
    let geo = Geometry::for_size(size);
    let mut canvas = blank_canvas(&geo, &opts.palette);
    draw_brand(&mut canvas, &geo, &opts.brand_candidates);

    let layout = layout_quote(&GlyphMeasure::new(font), text, credit, &geo);
    draw_layout(&mut canvas, font, &layout, &opts.palette);
    canvas
}

fn blank_canvas(geo: &Geometry, palette: &Palette) -> RgbaImage {
    RgbaImage::from_pixel(geo.width as u32, geo.height as u32, rgba(palette.bg))
}

fn draw_layout<F: Font>(canvas: &mut RgbaImage, font: &F, layout: &QuoteLayout, palette: &Palette) {
    let fg = rgba(palette.fg);
    let muted = rgba(palette.muted);

    let content_ascent = font.as_scaled(PxScale::from(layout.font_size)).ascent();
    for line in &layout.lines {
        let top = line.baseline - content_ascent;
        draw_text_mut(
            canvas,
            fg,
            line.x.round() as i32,
            top.round() as i32,
            PxScale::from(layout.font_size),
            font,
            &line.text,
        );
    }

    let credit_ascent = font.as_scaled(PxScale::from(layout.credit_size)).ascent();
    for line in &layout.credit_lines {
        let top = line.baseline - credit_ascent;
        draw_text_mut(
            canvas,
            muted,
            line.x.round() as i32,
            top.round() as i32,
            PxScale::from(layout.credit_size),
            font,
            &line.text,
        );
    }
}

/// First candidate that decodes wins; none is fine.
fn draw_brand(canvas: &mut RgbaImage, geo: &Geometry, candidates: &[PathBuf]) {
    let Some(brand) = load_brand(candidates) else {
        return;
    };

    let target_h = geo.brand_height;
    let scale = target_h / brand.height().max(1) as f32;
    let target_w = (brand.width() as f32 * scale).round().max(1.0) as u32;
    let resized = imageops::resize(&brand, target_w, target_h as u32, FilterType::Triangle);

    let (x, y) = geo.brand_origin();
    imageops::overlay(canvas, &resized, x.round() as i64, y.round() as i64);
}

pub fn load_brand(candidates: &[PathBuf]) -> Option<RgbaImage> {
    candidates.iter().find_map(|path| match image::open(path) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "brand candidate unusable");
            None
        }
    })
}

pub fn load_font(candidates: &[PathBuf]) -> Option<FontVec> {
    candidates.iter().find_map(|path| {
        let bytes = fs::read(path).ok()?;
        match FontVec::try_from_vec(bytes) {
            Ok(font) => Some(font),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "font candidate unusable");
                None
            }
        }
    })
}

pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("Failed to encode image")?;
    Ok(bytes)
}

/// `quote-{size}-{ISO timestamp}.png` with `:` and `.` turned into `-`.
pub fn default_filename(size: ImageSize, now: DateTime<Utc>) -> String {
    let ts = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("quote-{}-{}.png", size.slug(), ts)
}

fn rgba(hex: &str) -> Rgba<u8> {
    let (r, g, b) = hex_to_rgb(hex);
    Rgba([r, g, b, 255])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::get_theme;
    use chrono::TimeZone;
    use std::path::Path;

    fn opts(dir: &Path) -> ExportOptions {
        ExportOptions {
            palette: get_theme("ocean").palette(),
            brand_candidates: Vec::new(),
            font_candidates: Vec::new(),
            output_dir: dir.to_path_buf(),
            filename: None,
        }
    }

    #[test]
    fn filename_replaces_separators() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(678);
        assert_eq!(
            default_filename(ImageSize::Square, now),
            "quote-square-2024-01-02T03-04-05-678Z.png"
        );
        assert!(default_filename(ImageSize::Story, now).starts_with("quote-story-"));
    }

    #[test]
    fn missing_font_aborts_silently() {
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(dir.path());
        let junk = dir.path().join("junk.ttf");
        fs::write(&junk, b"definitely not a font").unwrap();
        o.font_candidates = vec![dir.path().join("absent.ttf"), junk];

        let out = render_quote_image("Hi", "X", ImageSize::Square, &o).unwrap();
        assert!(out.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn brand_uses_first_decodable_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"nope").unwrap();
        let logo = dir.path().join("logo.png");
        RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]))
            .save(&logo)
            .unwrap();

        let candidates = vec![dir.path().join("missing.png"), broken, logo];
        let brand = load_brand(&candidates).unwrap();
        assert_eq!(brand.dimensions(), (40, 20));
        assert!(load_brand(&candidates[..2]).is_none());
    }

    #[test]
    fn brand_is_scaled_onto_background() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]))
            .save(&logo)
            .unwrap();

        let geo = Geometry::for_size(ImageSize::Square);
        let palette = get_theme("ocean").palette();
        let mut canvas = blank_canvas(&geo, &palette);
        draw_brand(&mut canvas, &geo, &[logo]);

        assert_eq!(canvas.dimensions(), (1080, 1080));
        assert_eq!(*canvas.get_pixel(0, 0), rgba(palette.bg));
        // 80px tall, 160px wide, anchored near (74, 86)
        assert_eq!(*canvas.get_pixel(100, 120), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(300, 120), rgba(palette.bg));
    }

    /// Font candidates from the default configuration that exist here.
    fn system_fonts() -> Option<Vec<PathBuf>> {
        let fonts = crate::config::AppConfig::default().font_candidates();
        load_font(&fonts).map(|_| fonts)
    }

    #[test]
    fn renders_png_with_default_name() {
        let Some(fonts) = system_fonts() else {
            eprintln!("no system font available, skipping");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(&dir.path().join("exports"));
        o.font_candidates = fonts;

        for (size, dims) in [(ImageSize::Square, (1080, 1080)), (ImageSize::Story, (1080, 1920))] {
            let path = render_quote_image("Stay hungry, stay foolish.", "Steve Jobs", size, &o)
                .unwrap()
                .expect("font is available");
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(name.starts_with(&format!("quote-{}-", size.slug())), "{}", name);
            assert!(name.ends_with("Z.png"), "{}", name);
            assert_eq!(path.parent(), Some(o.output_dir.as_path()));

            let img = image::open(&path).unwrap().to_rgba8();
            assert_eq!(img.dimensions(), dims);
            assert_eq!(*img.get_pixel(0, 0), rgba(o.palette.bg));
            // some text pixels differ from the background
            assert!(img.pixels().any(|p| *p != rgba(o.palette.bg)));
        }
    }

    #[test]
    fn explicit_filename_is_used() {
        let Some(fonts) = system_fonts() else {
            eprintln!("no system font available, skipping");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let mut o = opts(dir.path());
        o.font_candidates = fonts;
        o.filename = Some("mine.png".to_string());

        let path = render_quote_image("", "Nobody", ImageSize::Square, &o).unwrap().unwrap();
        assert_eq!(path, dir.path().join("mine.png"));
        assert!(path.is_file());
    }

    #[test]
    fn unwritable_output_dir_is_an_error() {
        let Some(fonts) = system_fonts() else {
            eprintln!("no system font available, skipping");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("file");
        fs::write(&not_a_dir, b"occupied").unwrap();
        let mut o = opts(&not_a_dir);
        o.font_candidates = fonts;

        assert!(render_quote_image("Hi", "X", ImageSize::Square, &o).is_err());
    }

    #[test]
    fn png_encoding_produces_signature() {
        let geo = Geometry::for_size(ImageSize::Story);
        let canvas = blank_canvas(&geo, &get_theme("light").palette());
        let bytes = encode_png(&canvas).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
