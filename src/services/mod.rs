pub mod hooks;
pub mod intouch;
pub mod settlement;

pub use hooks::{HookRegistry, LogSettlementHook, PaymentHook};
pub use intouch::{IntouchClient, IntouchService, SharedIntouchService};
pub use settlement::{spawn_worker, SettlementContext, SettlementOutcome, SettlementQueue};
