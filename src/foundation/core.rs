use crate::foundation::error::{KolamError, KolamResult};

pub use kurbo::{Point, Rect, Vec2};

/// Pen state carried by every stroke step.
///
/// `Down` continues the current stroke; `Lift` terminates it without drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Pen {
    Down,
    Lift,
}

impl Pen {
    /// Decode the numeric pen flag used by stroke files (`0` or `1`).
    pub fn from_flag(flag: f64) -> Option<Self> {
        if flag == 0.0 {
            Some(Self::Down)
        } else if flag == 1.0 {
            Some(Self::Lift)
        } else {
            None
        }
    }

    pub fn as_flag(self) -> f64 {
        match self {
            Self::Down => 0.0,
            Self::Lift => 1.0,
        }
    }

    pub fn is_lift(self) -> bool {
        self == Self::Lift
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> KolamResult<Self> {
        if width == 0 || height == 0 {
            return Err(KolamError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Default pen position for sequences that do not carry an absolute start.
    pub fn default_start(self) -> Point {
        Point::new(f64::from(self.width) * 0.25, f64::from(self.height) * 0.3)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiplied channel values, as stored in raster surfaces.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
