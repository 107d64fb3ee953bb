//! Browser output
//!
//! The DOM view builds the page sections from element trees; the rain
//! renderer paints the falling glyph background on a Canvas2D context.

pub mod dom;
pub mod rain_canvas;

pub use dom::DomView;
pub use rain_canvas::RainRenderer;
