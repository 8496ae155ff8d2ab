/// Revision of the prompt contract.
///
/// The recovery cascade in [`crate::recovery`] is shaped around the schema
/// documented in the prompt; bump this when the schema or the output rules
/// change.
pub const PROMPT_VERSION: u32 = 2;

/// The system-role instruction block, loaded from `system_prompt.txt` at
/// compile time.
pub const SYSTEM_PROMPT: &str = include_str!("system_prompt.txt");

/// The user-role instruction block, loaded from `user_prompt.txt` at
/// compile time.
pub const USER_PROMPT: &str = include_str!("user_prompt.txt");

/// Ingredients a recipe may use even when they are not in the photo
pub const PANTRY_STAPLES: &[&str] = &[
    "oil",
    "butter",
    "salt",
    "pepper",
    "sugar",
    "flour",
    "water",
    "garlic powder",
    "onion powder",
    "dried herbs",
    "basic spices",
];

/// Build the full instruction text sent alongside the image.
pub fn build_prompt() -> String {
    format!("{}\n\n{}", SYSTEM_PROMPT.trim_end(), USER_PROMPT.trim_end())
}
