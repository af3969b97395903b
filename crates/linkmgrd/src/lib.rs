//! linkmgrd - declarative VLAN / L2TPv3 interface reconciler
//!
//! linkmgrd converges one named network interface instance against its
//! desired configuration:
//! - Extracts the desired (or, for deletions, last-applied) record from
//!   the configuration tree
//! - Validates the record before any OS mutation is attempted
//! - Plans an ordered operation sequence against the live interface set
//!   (children before parents, destroy before recreate, attributes before
//!   admin-up)
//! - Applies the plan idempotently through the `ip` command family

pub mod apply;
pub mod commands;
pub mod extract;
pub mod link_mgr;
pub mod modules;
pub mod paths;
pub mod plan;
pub mod types;
pub mod validate;

pub use apply::Applier;
pub use link_mgr::LinkMgr;
pub use plan::{plan, Operation};
pub use types::{InterfaceRecord, KindParams};
