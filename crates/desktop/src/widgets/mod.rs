pub mod overlay;
pub mod toast;
