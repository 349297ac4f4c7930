pub mod memory;
pub mod pool;
pub mod repositories;
pub mod store;

pub use memory::InMemoryPaymentStore;
pub use pool::{create_pool, run_migrations};
pub use repositories::PgPaymentStore;
pub use store::{PaymentStore, SharedPaymentStore};
