//! Canvas2D painter for the glyph rain

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::UiError;
use crate::rain::{MatrixRain, RainGlyph, RainIntensity};
use crate::settings::QualityPreset;

pub struct RainRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    rain: MatrixRain,
    glyphs: Vec<RainGlyph>,
    font: String,
    seed: u64,
}

impl RainRenderer {
    pub fn new(
        canvas: HtmlCanvasElement,
        quality: QualityPreset,
        seed: u64,
    ) -> Result<Self, UiError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(UiError::NoCanvasContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| UiError::NoCanvasContext)?;

        let font_size = quality.rain_font_size();
        let rain = MatrixRain::new(
            canvas.width() as f32,
            canvas.height() as f32,
            font_size,
            seed,
        );
        Ok(Self {
            canvas,
            ctx,
            rain,
            glyphs: Vec::new(),
            font: font_for(font_size),
            seed,
        })
    }

    /// Resize the backing store and the column layout
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.rain.resize(width as f32, height as f32);
        log::debug!("Rain resized to {}x{} ({} columns)", width, height, self.rain.columns());
    }

    /// Switch glyph size; drops restart at the top
    pub fn set_quality(&mut self, quality: QualityPreset) {
        let font_size = quality.rain_font_size();
        if font_size == self.rain.font_size() {
            return;
        }
        self.seed = self.seed.wrapping_add(1);
        self.rain = MatrixRain::new(
            self.canvas.width() as f32,
            self.canvas.height() as f32,
            font_size,
            self.seed,
        );
        self.font = font_for(font_size);
    }

    /// Paint the rain steps due after `dt_ms` of wall time
    pub fn render(&mut self, dt_ms: f64, intensity: RainIntensity) -> Result<(), UiError> {
        let steps = self.rain.advance(dt_ms, intensity);
        if steps == 0 {
            return Ok(());
        }

        let style = intensity.style();
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        let wash = format!("rgba(0, 0, 0, {:.3})", style.fade_alpha());
        let mut buf = [0u8; 4];

        for _ in 0..steps {
            self.ctx.set_global_alpha(1.0);
            self.ctx.set_fill_style_str(&wash);
            self.ctx.fill_rect(0.0, 0.0, width, height);

            self.rain.step(&mut self.glyphs);
            self.ctx.set_global_alpha(style.opacity as f64);
            self.ctx.set_fill_style_str(style.color);
            self.ctx.set_font(&self.font);
            for glyph in &self.glyphs {
                let text = glyph.ch.encode_utf8(&mut buf);
                self.ctx.fill_text(text, glyph.x as f64, glyph.y as f64)?;
            }
        }
        self.ctx.set_global_alpha(1.0);
        Ok(())
    }

    /// Blank the canvas (rain turned off)
    pub fn clear(&self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }
}

fn font_for(size: f32) -> String {
    format!("{}px monospace", size)
}
