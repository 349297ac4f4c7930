pub mod payment_repo;

pub use payment_repo::PgPaymentStore;
