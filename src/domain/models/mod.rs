pub mod event;
pub mod message;
pub mod morpheme;
pub mod task;

pub use event::{Event, EventKind, EventSource, MessagePayload};
pub use message::OutboundMessage;
pub use morpheme::{Morpheme, MorphemeClass};
pub use task::DeferredTask;
