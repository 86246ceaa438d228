//! Head pose and expression read straight off landmark coordinates.
//!
//! All thresholds are absolute pixel values: no normalization by face size
//! is attempted, so classification drifts for very small or very large faces.

use std::fmt;

use serde::Serialize;

use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::shared::constants::{HEAD_TURN_THRESHOLD_PX, SMILE_RATIO_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadTurn {
    Left,
    Center,
    Right,
}

impl fmt::Display for HeadTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadTurn::Left => write!(f, "left"),
            HeadTurn::Center => write!(f, "center"),
            HeadTurn::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Smile {
    Smiling,
    Neutral,
}

impl fmt::Display for Smile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smile::Smiling => write!(f, "smiling"),
            Smile::Neutral => write!(f, "neutral"),
        }
    }
}

/// The landmark-derived half of the stylization parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    pub head_tilt: f64,
    pub head_turn: HeadTurn,
    pub smile: Smile,
    pub eye_distance: f64,
}

pub fn estimate(landmarks: &FaceLandmarks) -> FaceGeometry {
    FaceGeometry {
        head_tilt: head_tilt(landmarks),
        head_turn: head_turn(landmarks),
        smile: smile(landmarks),
        eye_distance: eye_distance(landmarks),
    }
}

/// Roll angle in degrees of the outer-left to outer-right eye corner vector.
///
/// Image coordinates, so a positive angle means the right eye sits lower.
pub fn head_tilt(landmarks: &FaceLandmarks) -> f64 {
    let (lx, ly) = landmarks.left_eye_outer();
    let (rx, ry) = landmarks.right_eye_outer();
    (ry - ly).atan2(rx - lx).to_degrees()
}

/// Classifies yaw from how far the nose tip sits off the eye midpoint.
pub fn head_turn(landmarks: &FaceLandmarks) -> HeadTurn {
    let center_x = (landmarks.left_eye_outer().0 + landmarks.right_eye_outer().0) / 2.0;
    let diff = landmarks.nose_tip().0 - center_x;
    if diff > HEAD_TURN_THRESHOLD_PX {
        HeadTurn::Right
    } else if diff < -HEAD_TURN_THRESHOLD_PX {
        HeadTurn::Left
    } else {
        HeadTurn::Center
    }
}

/// Smiling when the mouth opening exceeds a fifth of the mouth width.
///
/// A zero-width (or non-finite) mouth span is reported as neutral rather
/// than letting the ratio become infinite or NaN.
pub fn smile(landmarks: &FaceLandmarks) -> Smile {
    let mouth_open = (landmarks.lower_lip().1 - landmarks.upper_lip().1).abs();
    let mouth_width = (landmarks.mouth_right().0 - landmarks.mouth_left().0).abs();
    if mouth_width == 0.0 || !mouth_width.is_finite() {
        return Smile::Neutral;
    }
    let ratio = mouth_open / mouth_width;
    if ratio.is_finite() && ratio > SMILE_RATIO_THRESHOLD {
        Smile::Smiling
    } else {
        Smile::Neutral
    }
}

/// Horizontal distance between the outer eye corners, in pixels.
pub fn eye_distance(landmarks: &FaceLandmarks) -> f64 {
    (landmarks.right_eye_outer().0 - landmarks.left_eye_outer().0).abs()
}
