pub mod callback;
pub mod health;
pub mod payment;
pub mod status;

pub use callback::*;
pub use health::*;
pub use payment::*;
pub use status::*;
