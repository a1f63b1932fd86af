/// The fixed system instruction for recipe extraction.
///
/// Loaded from `prompt.txt` at compile time so it can be edited without
/// dealing with Rust string syntax.
pub const RECIPE_EXTRACTION_PROMPT: &str = include_str!("prompt.txt");
