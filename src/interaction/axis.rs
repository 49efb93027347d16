//! The single interactive axis of a timeline surface.
//!
//! The wide layout lays the day out left to right, the narrow layout top to
//! bottom. The orthogonal dimension is a fixed band and never feeds into
//! minute calculations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn from_layout(narrow_layout: bool) -> Self {
        if narrow_layout {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    /// Coordinate of `position` along this axis.
    pub fn along(&self, position: PointerPosition) -> f64 {
        match self {
            Axis::Horizontal => position.x,
            Axis::Vertical => position.y,
        }
    }

    /// Distance between two positions measured along this axis only.
    pub fn travel(&self, from: PointerPosition, to: PointerPosition) -> f64 {
        (self.along(to) - self.along(from)).abs()
    }

    /// Length of the surface along this axis.
    pub fn extent(&self, geometry: SurfaceGeometry) -> f64 {
        match self {
            Axis::Horizontal => geometry.width,
            Axis::Vertical => geometry.height,
        }
    }
}

/// Pointer coordinates relative to the surface's top-left corner, in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SurfaceGeometry {
    pub width: f64,
    pub height: f64,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 80.0,
        }
    }
}

impl SurfaceGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: PointerPosition) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }
}

/// Axis plus geometry: everything needed to turn pixels into percentages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SurfaceLayout {
    pub axis: Axis,
    pub geometry: SurfaceGeometry,
}

impl SurfaceLayout {
    pub fn new(narrow_layout: bool, geometry: SurfaceGeometry) -> Self {
        Self {
            axis: Axis::from_layout(narrow_layout),
            geometry,
        }
    }

    pub fn extent(&self) -> f64 {
        self.axis.extent(self.geometry)
    }

    /// Position along the axis as 0–100%, clamped.
    pub fn percent_at(&self, position: PointerPosition) -> f64 {
        let extent = self.extent();
        if extent <= 0.0 {
            return 0.0;
        }
        (self.axis.along(position) / extent * 100.0).clamp(0.0, 100.0)
    }

    /// Pixel offset along the axis for a percentage.
    pub fn pixel_at(&self, percent: f64) -> f64 {
        percent / 100.0 * self.extent()
    }
}
