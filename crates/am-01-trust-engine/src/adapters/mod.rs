//! # Adapters
//!
//! Implementations of the outbound ports.

pub mod clock;
pub mod memory;
pub mod notifier;
pub mod postgres;

pub use clock::{ManualClock, SystemClock};
pub use memory::{InMemoryOrderLedger, InMemoryTokenStore, InMemoryTrustStore};
pub use notifier::{LoggingNotifier, RecordingNotifier};
pub use postgres::{connect_pool, PgOrderLedger, PgStoreConfig, PgTokenStore, PgTrustStore};
