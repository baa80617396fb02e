pub mod analysis;
pub mod messaging;
