pub mod jetstream;
pub mod line;
pub mod local_queue;
pub mod task_delivery;
