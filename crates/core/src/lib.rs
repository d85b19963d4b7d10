pub mod format;
pub mod intent;
pub mod lexicon;
pub mod models;
pub mod place;

pub use format::{display_name, render_places, render_weather};
pub use intent::classify_intent;
pub use models::*;
pub use place::{extract_place, normalize};
