pub mod constants;
pub mod detection;
