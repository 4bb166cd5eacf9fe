pub mod health;
pub mod narrate;
