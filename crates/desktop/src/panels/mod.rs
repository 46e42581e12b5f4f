pub mod camera_panel;
pub mod faces_panel;
pub mod roster_panel;
pub mod wizard;
