pub mod geometry_estimator;
