pub mod landmark;

pub use landmark::{BodyRegion, Frame, Landmark, LandmarkIndex};
