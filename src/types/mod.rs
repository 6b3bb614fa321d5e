pub mod adaptation;
pub mod analysis;
pub mod generation;
pub mod quality;
pub mod request;
pub mod research;
pub mod routing;
pub mod source;
