//! Trusted bootstrap loader of the platform layer.
//!
//! This crate is the one-shot gate between an untrusted host and a process
//! expected to run under isolation guarantees. It:
//! - resolves the policy manifest and the canonical executable identity,
//! - decides, under explicit manifest opt-ins, which command-line
//!   arguments and environment variables the application may observe,
//! - loads preload objects and the main executable through the host's
//!   binary-loading collaborator,
//! - publishes the process-wide control block and hands control to the
//!   application.
//!
//! Every decision here is irreversible; any anomaly terminates the process
//! through the host's fatal-diagnostic path.

pub mod args;
pub mod bootstrap;
pub mod env;
pub mod error;
pub mod preload;
pub mod resolve;
pub mod strtab;
pub mod switches;
pub mod uri;

pub use bootstrap::{BootstrapContext, EntryInput, bootstrap_main, run};
pub use error::BootstrapError;
pub use strtab::StringTable;
