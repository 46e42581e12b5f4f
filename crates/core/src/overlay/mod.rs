pub mod annotation;
pub mod fit;
