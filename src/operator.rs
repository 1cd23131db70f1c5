// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::FrameError;
use core::fmt;
use serde::Serialize;

/// Default weak-edge threshold.
pub const DEFAULT_LOW_THRESHOLD: f32 = 50.0;
/// Default strong-edge threshold.
pub const DEFAULT_HIGH_THRESHOLD: f32 = 150.0;

/// Smallest threshold handed to the edge detector. A zero gradient is never
/// an edge.
const MIN_THRESHOLD: f32 = f32::MIN_POSITIVE;

/// Hysteresis thresholds on the Sobel gradient magnitude of the blurred luma
/// plane.
///
/// Pixels at or above `high` seed edges; pixels at or above `low` extend an
/// edge they are connected to; everything else is discarded. A vertical step
/// of contrast `d` peaks at a magnitude of roughly `2 * d`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Thresholds {
    pub low: f32,
    pub high: f32,
}

impl Thresholds {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Returns `(low, high)` ready for the edge detector.
    ///
    /// The pair is swapped when `low > high` and both are raised to a small
    /// positive floor, so negative values behave like zero.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidThresholds`] if either value is NaN or infinite.
    pub fn ordered(self) -> Result<(f32, f32), FrameError> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(FrameError::InvalidThresholds {
                low: self.low,
                high: self.high,
            });
        }
        let (low, high) = if self.low > self.high {
            (self.high, self.low)
        } else {
            (self.low, self.high)
        };
        Ok((low.max(MIN_THRESHOLD), high.max(MIN_THRESHOLD)))
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_THRESHOLD, DEFAULT_HIGH_THRESHOLD)
    }
}

/// Per-frame transform selection.
///
/// Operators are plain values: nothing is carried from one frame to the next.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Operator {
    /// Luma, Canny (via `imageproc`), then a binary RGBA mask.
    #[serde(rename = "edge")]
    EdgeDetect(Thresholds),
    /// Luma replicated into every channel.
    Grayscale,
}

impl Operator {
    /// Edge detection with the default 50/150 thresholds.
    pub fn edge() -> Self {
        Operator::EdgeDetect(Thresholds::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::EdgeDetect(_) => "edge",
            Operator::Grayscale => "grayscale",
        }
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::edge()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operator::EdgeDetect(t) => write!(f, "edge({}, {})", t.low, t.high),
            Operator::Grayscale => write!(f, "grayscale"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(Thresholds::default(), Thresholds::new(50.0, 150.0));
        assert_eq!(Operator::default(), Operator::EdgeDetect(Thresholds::new(50.0, 150.0)));
        assert_eq!(Operator::edge().to_string(), "edge(50, 150)");
        assert_eq!(Operator::Grayscale.name(), "grayscale");
    }

    #[test]
    fn thresholds_ordered() -> Result<(), FrameError> {
        assert_eq!(Thresholds::new(50.0, 150.0).ordered()?, (50.0, 150.0));
        assert_eq!(Thresholds::new(150.0, 50.0).ordered()?, (50.0, 150.0));
        assert_eq!(Thresholds::new(7.5, 7.5).ordered()?, (7.5, 7.5));

        let (low, high) = Thresholds::new(-10.0, 0.0).ordered()?;
        assert!(low > 0.0 && low <= high && high < 1.0);
        Ok(())
    }

    #[test]
    fn thresholds_rejected() {
        for (low, high) in [(f32::NAN, 10.0), (10.0, f32::INFINITY), (f32::NEG_INFINITY, 0.0)] {
            assert!(matches!(
                Thresholds::new(low, high).ordered(),
                Err(FrameError::InvalidThresholds { .. })
            ));
        }
    }

    #[test]
    fn serialize() {
        let json = serde_json::to_value(Operator::edge()).unwrap();
        assert_eq!(json["mode"], "edge");
        assert_eq!(json["low"], 50.0);
        assert_eq!(json["high"], 150.0);
        let json = serde_json::to_value(Operator::Grayscale).unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "grayscale" }));
    }
}
