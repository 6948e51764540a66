//! Cross-instance synchronisation: game identifiers, the shared key-value
//! store abstraction, the wire format of stored values, and the channel that
//! persists, reloads and announces external changes.

mod channel;
pub mod codec;
mod game_id;
mod store;

pub use channel::{ExternalChange, SyncChannel};
pub use codec::StateKeys;
pub use game_id::{GameId, Invocation};
pub use store::{DirStore, MemoryStore, SharedStore};
