pub mod ai;
pub mod mirror;
pub mod remote;
pub mod time;

pub use ai::GeminiSummaryClient;
pub use mirror::{FileMirrorStore, InMemoryMirrorStore};
pub use remote::{PostgrestClient, PostgrestConnector};
pub use time::SystemClock;
