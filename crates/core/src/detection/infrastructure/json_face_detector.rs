use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::detection::domain::face_analysis::{FaceAnalysis, Gender};
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::shared::frame::Frame;
use crate::shared::region::BoundingBox;
use crate::shared::BoxError;

/// Replays a detection result recorded by an external landmark model.
///
/// The model itself runs elsewhere; this adapter lets the pipeline consume
/// its output (`null` for "no face", otherwise one face object) as if it
/// had been detected in-process.
pub struct JsonFaceDetector {
    face: Option<FaceAnalysis>,
}

#[derive(Deserialize)]
struct RecordedFace {
    age: f64,
    #[serde(default = "unknown_gender")]
    gender: Gender,
    #[serde(rename = "box")]
    bounding_box: BoundingBox,
    landmarks: Vec<RecordedPoint>,
}

/// Accepts both `[x, y]` pairs and `{ "x": .., "y": .. }` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordedPoint {
    Pair([f64; 2]),
    Object { x: f64, y: f64 },
}

fn unknown_gender() -> Gender {
    Gender::Unknown
}

impl RecordedPoint {
    fn into_tuple(self) -> (f64, f64) {
        match self {
            RecordedPoint::Pair([x, y]) => (x, y),
            RecordedPoint::Object { x, y } => (x, y),
        }
    }
}

impl JsonFaceDetector {
    pub fn new(face: Option<FaceAnalysis>) -> Self {
        Self { face }
    }

    pub fn from_json(json: &str) -> Result<Self, BoxError> {
        let recorded: Option<RecordedFace> = serde_json::from_str(json)?;
        let face = match recorded {
            Some(r) => {
                let points = r.landmarks.into_iter().map(RecordedPoint::into_tuple).collect();
                let landmarks = FaceLandmarks::new(points)?;
                Some(FaceAnalysis::from_estimate(
                    r.age,
                    r.gender,
                    landmarks,
                    r.bounding_box,
                ))
            }
            None => None,
        };
        Ok(Self::new(face))
    }

    pub fn from_path(path: &Path) -> Result<Self, BoxError> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("failed to read detections {}: {e}", path.display()))?;
        Self::from_json(&json)
    }
}

impl FaceDetector for JsonFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<FaceAnalysis>, BoxError> {
        if let Some(face) = &self.face {
            let b = face.bounding_box;
            if b.x >= frame.width() as f64 || b.y >= frame.height() as f64 {
                log::warn!(
                    "Recorded face box ({:.0}, {:.0}) lies outside the {}x{} image",
                    b.x,
                    b.y,
                    frame.width(),
                    frame.height()
                );
            }
        }
        Ok(self.face.clone())
    }
}
