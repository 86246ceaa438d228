//! 68-point facial landmarks in the iBUG 300-W ordering.
//!
//! Only the indices below are read by the estimators; the rest are carried
//! along so the set stays a faithful copy of what the detector produced.

use thiserror::Error;

pub const LANDMARK_COUNT: usize = 68;

pub const NOSE_TIP: usize = 30;
pub const LEFT_EYE_OUTER: usize = 36;
pub const LEFT_EYE_UPPER_LID: usize = 37;
pub const RIGHT_EYE_OUTER: usize = 45;
pub const MOUTH_LEFT: usize = 48;
pub const UPPER_LIP_TOP: usize = 51;
pub const MOUTH_RIGHT: usize = 54;
pub const LOWER_LIP_BOTTOM: usize = 57;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<(f64, f64)>,
}

impl FaceLandmarks {
    /// Rejects anything that is not exactly [`LANDMARK_COUNT`] points, so
    /// every named index above is always present.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn left_eye_outer(&self) -> (f64, f64) {
        self.points[LEFT_EYE_OUTER]
    }

    pub fn right_eye_outer(&self) -> (f64, f64) {
        self.points[RIGHT_EYE_OUTER]
    }

    pub fn left_eye_upper_lid(&self) -> (f64, f64) {
        self.points[LEFT_EYE_UPPER_LID]
    }

    pub fn nose_tip(&self) -> (f64, f64) {
        self.points[NOSE_TIP]
    }

    pub fn mouth_left(&self) -> (f64, f64) {
        self.points[MOUTH_LEFT]
    }

    pub fn mouth_right(&self) -> (f64, f64) {
        self.points[MOUTH_RIGHT]
    }

    pub fn upper_lip(&self) -> (f64, f64) {
        self.points[UPPER_LIP_TOP]
    }

    pub fn lower_lip(&self) -> (f64, f64) {
        self.points[LOWER_LIP_BOTTOM]
    }

    /// Copy of the set with every point shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self.points.iter().map(|(x, y)| (x + dx, y + dy)).collect(),
        }
    }
}
