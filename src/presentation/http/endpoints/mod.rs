pub mod callback;
pub mod health;
pub mod root;
pub mod tasks;
pub mod usage;
