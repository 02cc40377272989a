pub mod prompts;
pub mod render;

pub use prompts::{fuzzy_candidates, prompt_yes_no, resolve_item_name};
pub use render::{display_result, display_target, format_delta};
