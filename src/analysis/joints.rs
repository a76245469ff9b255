//! Joint angle analysis.
//!
//! Computes the planar angle at 8 named joints for both the candidate
//! and the template frame, then classifies the absolute deviation
//! against per-joint-type tolerances.

use serde::{Deserialize, Serialize};

use crate::pose::{Frame, Landmark};

/// (joint name, [proximal, vertex, distal] landmark indices)
pub const JOINT_SPECS: [(&str, [usize; 3]); 8] = [
    ("left_elbow", [11, 13, 15]),
    ("right_elbow", [12, 14, 16]),
    ("left_shoulder", [23, 11, 13]),
    ("right_shoulder", [24, 12, 14]),
    ("left_knee", [23, 25, 27]),
    ("right_knee", [24, 26, 28]),
    ("left_hip", [11, 23, 25]),
    ("right_hip", [12, 24, 26]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {
    Elbow,
    Shoulder,
    Knee,
    Hip,
}

impl JointType {
    /// Parse the type from a joint name like "left_elbow".
    /// Unknown names fall back to Shoulder (the widest tolerance).
    pub fn from_joint_name(name: &str) -> Self {
        let type_part = name.rsplit('_').next().unwrap_or(name);
        match type_part {
            "elbow" => Self::Elbow,
            "knee" => Self::Knee,
            "hip" => Self::Hip,
            _ => Self::Shoulder,
        }
    }

    pub fn tolerance_spec(self) -> ToleranceSpec {
        match self {
            Self::Elbow => ToleranceSpec { min: 30.0, max: 170.0, tolerance: 15.0 },
            Self::Shoulder => ToleranceSpec { min: 0.0, max: 180.0, tolerance: 20.0 },
            Self::Knee => ToleranceSpec { min: 0.0, max: 170.0, tolerance: 15.0 },
            Self::Hip => ToleranceSpec { min: 45.0, max: 135.0, tolerance: 20.0 },
        }
    }
}

/// Expected angle range and deviation tolerance in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceSpec {
    pub min: f32,
    pub max: f32,
    pub tolerance: f32,
}

/// Per-severity deviation reports, one entry per flagged joint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointErrors {
    pub critical: Vec<String>,
    pub moderate: Vec<String>,
    pub minor: Vec<String>,
}

impl JointErrors {
    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.moderate.is_empty() && self.minor.is_empty()
    }

    pub fn extend(&mut self, other: &JointErrors) {
        self.critical.extend(other.critical.iter().cloned());
        self.moderate.extend(other.moderate.iter().cloned());
        self.minor.extend(other.minor.iter().cloned());
    }

    /// Substring match against the accumulated error text.
    pub fn mentions(&self, needle: &str) -> bool {
        self.critical
            .iter()
            .chain(self.moderate.iter())
            .chain(self.minor.iter())
            .any(|msg| msg.contains(needle))
    }
}

/// Planar angle at `vertex` between vectors vertex->p1 and vertex->p3,
/// in degrees, using image-plane (x, y) coordinates.
///
/// Degenerate geometry (a zero-length vector) returns a neutral 90.0
/// instead of propagating an error.
pub fn joint_angle(p1: &Landmark, vertex: &Landmark, p3: &Landmark) -> f32 {
    let ba = (p1.x - vertex.x, p1.y - vertex.y);
    let bc = (p3.x - vertex.x, p3.y - vertex.y);

    let norm_ba = (ba.0 * ba.0 + ba.1 * ba.1).sqrt();
    let norm_bc = (bc.0 * bc.0 + bc.1 * bc.1).sqrt();
    if norm_ba == 0.0 || norm_bc == 0.0 {
        return 90.0;
    }

    let cosine = ((ba.0 * bc.0 + ba.1 * bc.1) / (norm_ba * norm_bc)).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}

/// Compare joint angles between candidate and template.
///
/// A joint whose indices fall outside the frame is silently skipped;
/// with the fixed 33-landmark layout this should not occur.
pub fn analyze_joint_angles(candidate: &Frame, template: &Frame) -> JointErrors {
    let mut errors = JointErrors::default();

    for (joint_name, [p1, vertex, p3]) in JOINT_SPECS {
        let in_range = |frame: &Frame| p1 < frame.len() && vertex < frame.len() && p3 < frame.len();
        if !in_range(candidate) || !in_range(template) {
            continue;
        }

        let candidate_angle = joint_angle(
            &candidate.landmarks[p1],
            &candidate.landmarks[vertex],
            &candidate.landmarks[p3],
        );
        let template_angle = joint_angle(
            &template.landmarks[p1],
            &template.landmarks[vertex],
            &template.landmarks[p3],
        );
        let deviation = (candidate_angle - template_angle).abs();

        let tolerance = JointType::from_joint_name(joint_name).tolerance_spec().tolerance;
        if deviation > tolerance * 2.0 {
            errors
                .critical
                .push(format!("{joint_name}: {deviation:.1}° deviation (critical)"));
        } else if deviation > tolerance {
            errors
                .moderate
                .push(format!("{joint_name}: {deviation:.1}° deviation (moderate)"));
        } else if deviation > tolerance * 0.5 {
            errors
                .minor
                .push(format!("{joint_name}: {deviation:.1}° deviation (minor)"));
        }
    }

    errors
}
