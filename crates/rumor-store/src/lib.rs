pub mod error;
pub mod items;
pub mod preferences;
pub mod queue;
pub mod reports;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use items::StoredItem;
pub use queue::{Message, VISIBILITY_TIMEOUT_SECS};
pub use store::{DB_FILE_NAME, Store, default_base_dir};
