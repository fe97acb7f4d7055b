//! In-memory HR data store: employee directory, leave balances, and the
//! file-backed leave request and performance review journals, plus the
//! dispatcher that routes classified intents to them.

pub mod balances;
pub mod config;
pub mod dates;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod intent;
pub mod journal;
pub mod leave_journal;
pub mod loader;
pub mod resolver;
pub mod review_journal;
pub mod store;

pub use config::HrConfig;
pub use dispatcher::{CommandDispatcher, Reply, ReplyKind};
pub use error::{HrError, Result};
pub use intent::{ClassifiedIntent, IntentKind};
pub use store::HrStore;
