//! Falling glyph background
//!
//! One drop per column of the canvas. Every step each drop prints a random
//! glyph at its row and moves down one row; drops below the canvas restart at
//! the top at random. The renderer paints a translucent black wash before
//! each step so older glyphs fade into trails.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::CityState;

/// Glyphs the rain is made of
pub const RAIN_CHARS: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default glyph size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Chance per step that a drop below the canvas restarts at the top
pub const RESTART_CHANCE: f64 = 0.025;

/// Maximum steps caught up in a single frame
pub const MAX_STEPS_PER_FRAME: u32 = 4;

/// How agitated the rain is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainIntensity {
    Low,
    Medium,
    High,
}

/// Timing and colors for an intensity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainStyle {
    /// Milliseconds between steps
    pub step_ms: f64,
    pub opacity: f32,
    pub color: &'static str,
}

impl RainIntensity {
    pub fn for_city(city: CityState) -> Self {
        match city {
            CityState::Stable => RainIntensity::Low,
            CityState::Glitching => RainIntensity::Medium,
            CityState::Corrupted => RainIntensity::High,
        }
    }

    pub fn style(&self) -> RainStyle {
        match self {
            RainIntensity::Low => RainStyle {
                step_ms: 120.0,
                opacity: 0.4,
                color: "#00ff41",
            },
            RainIntensity::Medium => RainStyle {
                step_ms: 80.0,
                opacity: 0.6,
                color: "#ffff00",
            },
            RainIntensity::High => RainStyle {
                step_ms: 50.0,
                opacity: 0.8,
                color: "#ff0040",
            },
        }
    }
}

impl RainStyle {
    /// Alpha of the black wash painted before each step
    pub fn fade_alpha(&self) -> f32 {
        1.0 - self.opacity * 0.3
    }
}

/// A glyph to draw this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainGlyph {
    pub x: f32,
    pub y: f32,
    pub ch: char,
}

/// Rain simulation state
#[derive(Debug, Clone)]
pub struct MatrixRain {
    font_size: f32,
    width: f32,
    height: f32,
    /// Current row of each column's drop
    drops: Vec<u32>,
    chars: Vec<char>,
    accumulator_ms: f64,
    rng: Pcg32,
}

impl MatrixRain {
    pub fn new(width: f32, height: f32, font_size: f32, seed: u64) -> Self {
        let mut rain = Self {
            font_size: font_size.max(1.0),
            width: 0.0,
            height: 0.0,
            drops: Vec::new(),
            chars: RAIN_CHARS.chars().collect(),
            accumulator_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        };
        rain.resize(width, height);
        rain
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    /// Match the canvas size; new columns start at the top
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let columns = (self.width / self.font_size).floor() as usize;
        self.drops.resize(columns, 0);
    }

    /// Accumulate frame time; returns how many steps are due
    pub fn advance(&mut self, dt_ms: f64, intensity: RainIntensity) -> u32 {
        let step_ms = intensity.style().step_ms;
        self.accumulator_ms += dt_ms.max(0.0);
        let mut steps = 0;
        while self.accumulator_ms >= step_ms && steps < MAX_STEPS_PER_FRAME {
            self.accumulator_ms -= step_ms;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            // Drop the backlog after a long stall (hidden tab)
            self.accumulator_ms = self.accumulator_ms.min(step_ms);
        }
        steps
    }

    /// Move every drop one row, collecting the glyphs to print
    pub fn step(&mut self, out: &mut Vec<RainGlyph>) {
        out.clear();
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let ch = self.chars[self.rng.random_range(0..self.chars.len())];
            let x = i as f32 * self.font_size;
            let y = *drop as f32 * self.font_size;
            out.push(RainGlyph { x, y, ch });

            if y > self.height && self.rng.random_bool(RESTART_CHANCE) {
                *drop = 0;
            }
            *drop += 1;
        }
    }
}
