//! Value Object Module

pub mod account_name;
pub mod email;
pub mod recipe_text;

pub use account_name::AccountName;
pub use email::Email;
pub use recipe_text::{RecipeDescription, RecipeTitle};
