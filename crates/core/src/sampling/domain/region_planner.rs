use std::fmt;

use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::shared::region::{BoundingBox, Region};

/// Fraction of the face box height used for the band above it.
const HAIR_BAND_RATIO: f64 = 0.25;
/// Fraction of the face box height used for the band below the chin.
const OUTFIT_BAND_RATIO: f64 = 0.8;
const EYE_BAND_LIFT: f64 = 5.0;
const EYE_BAND_HEIGHT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Hair,
    Eyes,
    Outfit,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::Hair => write!(f, "hair"),
            RegionKind::Eyes => write!(f, "eyes"),
            RegionKind::Outfit => write!(f, "outfit"),
        }
    }
}

/// The three rectangles sampled for one face, unclamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    pub hair: Region,
    pub eyes: Region,
    pub outfit: Region,
}

impl SamplingPlan {
    pub fn regions(&self) -> [(RegionKind, Region); 3] {
        [
            (RegionKind::Hair, self.hair),
            (RegionKind::Eyes, self.eyes),
            (RegionKind::Outfit, self.outfit),
        ]
    }
}

/// Lays out the hair, eye and outfit bands around a detected face.
///
/// Regions are expressed in image pixels and routinely extend past the
/// image (a face near the top edge puts the hair band at negative y);
/// the sampler clamps them.
pub fn plan_regions(bbox: &BoundingBox, landmarks: &FaceLandmarks) -> SamplingPlan {
    let hair_height = bbox.height * HAIR_BAND_RATIO;
    let hair = Region::new(bbox.x, bbox.y - hair_height, bbox.width, hair_height);

    let (left_x, _) = landmarks.left_eye_outer();
    let (right_x, _) = landmarks.right_eye_outer();
    let (_, lid_y) = landmarks.left_eye_upper_lid();
    let eyes = Region::new(
        left_x,
        lid_y - EYE_BAND_LIFT,
        right_x - left_x,
        EYE_BAND_HEIGHT,
    );

    let outfit = Region::new(
        bbox.x,
        bbox.y + bbox.height,
        bbox.width,
        bbox.height * OUTFIT_BAND_RATIO,
    );

    SamplingPlan { hair, eyes, outfit }
}
