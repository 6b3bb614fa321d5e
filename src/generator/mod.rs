pub mod adaptation;
pub mod classifier;
pub mod context;
pub mod generation;
pub mod quality;
pub mod research;
pub mod workflow;
