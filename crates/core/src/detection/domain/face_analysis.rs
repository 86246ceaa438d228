use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::region::BoundingBox;

use super::face_landmarks::FaceLandmarks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Unknown => write!(f, "unknown"),
        }
    }
}

/// Everything the detector reports about the one face in an image.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceAnalysis {
    pub age: u32,
    pub gender: Gender,
    pub landmarks: FaceLandmarks,
    pub bounding_box: BoundingBox,
}

impl FaceAnalysis {
    /// Rounds the detector's fractional age estimate; negative or NaN
    /// estimates become 0.
    pub fn from_estimate(
        age: f64,
        gender: Gender,
        landmarks: FaceLandmarks,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            age: age.round().max(0.0) as u32,
            gender,
            landmarks,
            bounding_box,
        }
    }
}
