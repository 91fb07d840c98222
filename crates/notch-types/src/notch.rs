use serde::{Deserialize, Serialize};

use crate::units::inches_to_mm;

/// One rectangular cut along the bar's long axis.
///
/// Offsets are in inches from the bar's origin end. Only `end` positions the
/// cut; `start` is carried for display and bounds checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notch {
    /// Offset of the near edge.
    pub start: f64,
    /// Offset of the far edge. The cut box is placed here.
    pub end: f64,
    /// Display label, expected to be unique within a layout.
    pub name: String,
}

impl Notch {
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            name: name.into(),
        }
    }

    /// Position of the cut along the long axis, in millimetres.
    pub fn position_mm(&self) -> f64 {
        inches_to_mm(self.end)
    }

    /// Whether `0 <= start < end <= bar_length` holds.
    pub fn fits_within(&self, bar_length: f64) -> bool {
        self.start >= 0.0 && self.start < self.end && self.end <= bar_length
    }
}

/// The main rectangular prism. Dimensions in inches, fixed for a session.
///
/// Kernel axes: x = width, y = length (long axis), z = height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bar {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

impl Bar {
    /// Box dimensions `[x, y, z]` in millimetres.
    pub fn dims_mm(&self) -> [f64; 3] {
        [
            inches_to_mm(self.width),
            inches_to_mm(self.length),
            inches_to_mm(self.height),
        ]
    }
}

impl Default for Bar {
    /// 1/2" x 8" x 1/2".
    fn default() -> Self {
        Self {
            width: 0.5,
            length: 8.0,
            height: 0.5,
        }
    }
}

/// Fixed cross-section of every notch cut. The cut spans the full bar width.
///
/// The tool box sticks out past the bar's side and bottom faces by
/// `overshoot`, so none of its faces is coplanar with the bar's. The volume
/// removed from the bar is the same as a flush tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutProfile {
    /// Extent along the long axis, inches.
    pub length: f64,
    /// Extent into the bar along z, inches.
    pub depth: f64,
    /// How far the tool extends past the bar in -x, +x and -z, inches.
    pub overshoot: f64,
}

impl CutProfile {
    /// Tool box dimensions `[x, y, z]` in millimetres for a bar of the given width.
    pub fn dims_mm(&self, bar: &Bar) -> [f64; 3] {
        let pad = inches_to_mm(self.overshoot);
        [
            inches_to_mm(bar.width) + 2.0 * pad,
            inches_to_mm(self.length),
            inches_to_mm(self.depth) + pad,
        ]
    }

    /// Where the tool's origin corner goes for a cut ending at `end` inches.
    pub fn placement_mm(&self, end: f64) -> [f64; 3] {
        let pad = inches_to_mm(self.overshoot);
        [-pad, inches_to_mm(end), -pad]
    }
}

impl Default for CutProfile {
    fn default() -> Self {
        Self {
            length: 0.130,
            depth: 0.130,
            overshoot: 0.04,
        }
    }
}

/// The seed layout a session starts from.
pub fn default_notches() -> Vec<Notch> {
    const SEED: [(f64, f64); 10] = [
        (0.730, 0.860),
        (1.800, 1.930),
        (2.250, 2.380),
        (3.120, 3.250),
        (3.900, 4.030),
        (4.220, 4.350),
        (5.080, 5.210),
        (5.460, 5.590),
        (6.520, 6.650),
        (7.370, 7.500),
    ];
    SEED.iter()
        .enumerate()
        .map(|(i, &(start, end))| Notch::new(format!("Notch {}", i + 1), start, end))
        .collect()
}
