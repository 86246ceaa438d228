use crate::pipeline::stylization_params::StylizationParams;

/// Comma-separated text prompt describing the cartoon to render.
pub fn build_prompt(params: &StylizationParams) -> String {
    let tilt = params.head_tilt.round() as i64;
    let eye_distance = params.eye_distance.round() as i64;
    [
        "Pixar style 3D child character".to_string(),
        "age 5-7".to_string(),
        params.gender.to_string(),
        "cinematic soft lighting".to_string(),
        "subsurface skin scattering".to_string(),
        "smooth skin gradient".to_string(),
        format!("hair color {}", params.hair_color),
        format!("eye color {}", params.eye_color),
        format!("outfit color {}", params.outfit_color),
        params.smile.to_string(),
        format!("facing {}", params.head_turn),
        format!("head tilt {tilt} degrees"),
        format!("big expressive eyes (eye distance {eye_distance}px)"),
        "same illustration style".to_string(),
        "no background".to_string(),
        "transparent".to_string(),
    ]
    .join(", ")
}
