pub mod analyzer;
pub mod event_bus;
pub mod messenger;
