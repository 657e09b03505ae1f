//! Identity material published on hardware-isolated hosts.
//!
//! Isolation-specific startup code produces exactly one [`SecurityContext`]
//! per process image, before the loader core runs. It is never written
//! again; attestation and identity logic elsewhere in the platform consume
//! it read-only as their trust anchor. Verifying any of this material is
//! out of scope here.

use std::fmt;

use crate::cpu::CpuTopology;

/// A 256-bit enclave measurement value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Measurement(pub [u8; 32]);

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Measurement({})", hex::encode(self.0))
    }
}

/// Opaque quoting-enclave target info blob, kept verbatim for the
/// attestation flow.
#[derive(Clone, Copy)]
pub struct TargetInfo(pub [u8; 512]);

impl fmt::Debug for TargetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetInfo({}..)", hex::encode(&self.0[..8]))
    }
}

impl Default for TargetInfo {
    fn default() -> Self {
        Self([0; 512])
    }
}

/// Enclave attribute flags as reported by the isolation hardware.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnclaveAttributes {
    pub flags: u64,
    pub xfrm: u64,
}

/// Credentials of the hosting process, captured at enclave setup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostCredentials {
    pub instance_id: u64,
    pub ppid: u32,
    pub pid: u32,
    pub uid: u32,
    pub gid: u32,
}

/// Trust anchor for a hardware-isolated process image.
#[derive(Clone, Debug)]
pub struct SecurityContext {
    pub credentials: HostCredentials,

    pub qe_target_info: TargetInfo,
    pub mr_enclave: Measurement,
    pub mr_signer: Measurement,
    pub enclave_attributes: EnclaveAttributes,

    /// Heap range left over for the application.
    pub heap_min: usize,
    pub heap_max: usize,

    /// Main executable identity and where it was placed.
    pub exec_name: String,
    pub exec_addr: usize,
    pub exec_size: usize,

    pub manifest_name: String,

    /// Inter-process channel descriptor inherited from the parent.
    pub stream_fd: u32,

    pub topology: CpuTopology,
}
