//! Named profiles that supply default alert radii to labelled entities.

pub mod labels;
pub mod store;

pub use labels::EntityLabels;
pub use store::{Profile, ProfileStore, ProfileUpdate};
