use serde::Serialize;

use crate::detection::domain::face_analysis::{FaceAnalysis, Gender};
use crate::geometry::domain::geometry_estimator::{FaceGeometry, HeadTurn, Smile};
use crate::sampling::domain::bounded_color_sampler::RegionColors;
use crate::sampling::domain::color_sample::ColorSample;

/// Everything the generation step needs to know about the face.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StylizationParams {
    pub age: u32,
    pub gender: Gender,
    pub head_tilt: f64,
    pub head_turn: HeadTurn,
    pub smile: Smile,
    pub eye_distance: f64,
    pub hair_color: ColorSample,
    pub eye_color: ColorSample,
    pub outfit_color: ColorSample,
}

/// Merges detector metadata, landmark geometry and sampled colors.
///
/// Pure copy; only called once every input is final, so a half-filled
/// parameter set can never be observed.
pub fn assemble(
    face: &FaceAnalysis,
    geometry: FaceGeometry,
    colors: RegionColors,
) -> StylizationParams {
    StylizationParams {
        age: face.age,
        gender: face.gender,
        head_tilt: geometry.head_tilt,
        head_turn: geometry.head_turn,
        smile: geometry.smile,
        eye_distance: geometry.eye_distance,
        hair_color: colors.hair,
        eye_color: colors.eyes,
        outfit_color: colors.outfit,
    }
}
