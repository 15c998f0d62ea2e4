pub mod memory;
pub mod push;
pub mod system;

pub use memory::{InMemoryBookStore, InMemoryUserDirectory};
pub use push::LogPushSender;
pub use system::{SystemClock, ThreadRandomSource};
