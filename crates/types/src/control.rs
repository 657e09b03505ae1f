//! Control block handed from the loader to the rest of the platform.
//!
//! The loader fills this in exactly once, at the end of bootstrap, and then
//! moves it into [`Launch`]. After that point nothing writes to it again;
//! every later subsystem may read it without synchronization.

use std::ffi::CString;

use crate::cpu::CpuInfo;
use crate::handle::StreamHandle;

/// Half-open range of user-controllable addresses, `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressRange {
    pub start: usize,
    pub end: usize,
}

impl AddressRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Process-wide control state published at the end of bootstrap.
///
/// Built once by the orchestrator and read-only for the remainder of the
/// process lifetime.
#[derive(Clone, Debug)]
pub struct ControlBlock {
    /// Host flavor identifier, e.g. `"linux"` or `"linux-sgx"`.
    pub host_type: &'static str,
    pub process_id: u64,
    pub host_id: u64,
    /// Stream the manifest was read from. Stays open so later subsystems
    /// can re-derive paths relative to it.
    pub manifest_handle: StreamHandle,
    /// Canonical identity of the main executable, when one was resolved.
    pub executable: Option<String>,
    /// Channel to the parent process, for child instances.
    pub parent_process: Option<StreamHandle>,
    /// Handle of the first execution unit of the new process.
    pub first_thread: Option<StreamHandle>,
    /// Address-space randomization was disabled by the manifest. Recorded
    /// here for the address-space management code to enforce.
    pub disable_aslr: bool,
    /// Addresses the application may map.
    pub user_address: AddressRange,
    /// Allocation alignment of the host, always a power of two.
    pub alloc_align: usize,
    pub cpu: CpuInfo,
    /// Destination for debug output, when the manifest routed it anywhere.
    pub debug_stream: Option<StreamHandle>,
    /// Total memory quota in bytes.
    pub mem_total: u64,
}

/// Everything the host needs to start the application: the frozen control
/// block plus the vetted argument and environment vectors.
///
/// Each slot carries its own NUL terminator (`CString`); the host appends
/// the vector-level sentinel slot when it builds the process stack.
#[derive(Clone, Debug)]
pub struct Launch {
    pub control: ControlBlock,
    pub arguments: Vec<CString>,
    pub environment: Vec<CString>,
}
