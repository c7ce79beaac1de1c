pub mod bulk;
pub mod config;
pub mod controller;
pub mod notification;
pub mod store;

pub use bulk::{delete_all_settled, BulkDeleteOutcome};
pub use config::{ConfigError, Settings};
pub use controller::{ListState, TodoController};
pub use notification::{ErrorBanner, ERROR_BANNER_TTL};
pub use store::{HttpTodoStore, TodoStore};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
