pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;
pub mod regression;
