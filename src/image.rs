//! Sample containers consumed by measurement algorithms.
//!
//! These are deliberately thin value types: an [`Image`] stands in for pixel
//! data with a single representative value, a [`Peak`] is a detected
//! candidate position. Algorithms own all interpretation.

use serde::{Deserialize, Serialize};

/// Single-value stand-in for an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Image {
    value: f64,
}

impl Image {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// A detected candidate position in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    x: f32,
    y: f32,
}

impl Peak {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }
}
