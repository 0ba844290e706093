//! Placeholder translation output. No translation engine is wired in yet, so
//! every direction echoes the input behind a fixed prefix.

pub const PLACEHOLDER_PREFIX: &str = "test data : ";

pub fn placeholder_translation(text: &str) -> String {
    format!("{PLACEHOLDER_PREFIX}{text}")
}
