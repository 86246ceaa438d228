pub mod pipeline_logger;
pub mod stylization_params;
pub mod stylize_error;
pub mod stylize_face_use_case;
