pub mod emergencies;
pub mod flights;
pub mod misc;
pub mod state;
