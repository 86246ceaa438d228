pub mod cartoon_generator;
pub mod prompt;
