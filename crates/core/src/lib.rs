pub mod detection;
pub mod generation;
pub mod geometry;
pub mod pipeline;
pub mod sampling;
pub mod shared;
