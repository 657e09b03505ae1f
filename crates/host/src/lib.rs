//! Host seam of the platform loader.
//!
//! Everything the loader needs from the outside world goes through the
//! [`HostInterface`] trait: stream I/O, binary-object loading, host
//! enumeration, the final transfer of control, and fatal diagnostics.
//! Host-specific bindings implement it once; [`MemoryHost`] is an
//! in-memory implementation used by tests and demos.

pub mod error;
pub use error::HostError;

pub mod interface;
pub use interface::{
    AccessMode, CreateMode, HostInterface, ObjectKind, OpenOptions, CONSOLE_URI, URI_PREFIX_DEV,
    URI_PREFIX_FILE,
};

pub mod memory;
pub use memory::MemoryHost;
