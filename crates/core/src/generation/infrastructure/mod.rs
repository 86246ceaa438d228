pub mod pollinations_generator;
