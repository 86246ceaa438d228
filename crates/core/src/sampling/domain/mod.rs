pub mod bounded_color_sampler;
pub mod color_sample;
pub mod image_fetcher;
pub mod region_planner;
