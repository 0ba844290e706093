pub mod config;
pub mod preferences;
pub mod style;
pub mod translation;

pub use preferences::{PreferenceError, PreferenceStore};
pub use style::{StylePreference, UnknownStyle};
pub use translation::placeholder_translation;
