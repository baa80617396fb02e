pub mod deliver_analysis;
pub mod handle_callback;
pub mod notify_unsupported;
