use types::{AddressRange, CpuInfo, Launch, SecurityContext, StreamHandle};

use crate::error::HostError;

/// URI scheme for regular files.
pub const URI_PREFIX_FILE: &str = "file:";
/// URI scheme for host devices.
pub const URI_PREFIX_DEV: &str = "dev:";
/// The host's interactive console device.
pub const CONSOLE_URI: &str = "dev:tty";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateMode {
    /// The stream must already exist.
    Never,
    /// Create the stream if it does not exist yet.
    TryCreate,
}

/// How a stream should be opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenOptions {
    pub access: AccessMode,
    pub create: CreateMode,
    /// Restrict write permission to the owning identity on creation.
    pub owner_exclusive: bool,
}

impl OpenOptions {
    pub fn read() -> Self {
        Self { access: AccessMode::Read, create: CreateMode::Never, owner_exclusive: false }
    }

    pub fn write() -> Self {
        Self { access: AccessMode::Write, create: CreateMode::Never, owner_exclusive: false }
    }

    pub fn create(mut self) -> Self {
        self.create = CreateMode::TryCreate;
        self
    }

    pub fn owner_exclusive(mut self) -> Self {
        self.owner_exclusive = true;
        self
    }
}

/// What a binary object is loaded as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    /// Companion library loaded ahead of the main image.
    Preload,
    /// The main executable image.
    Executable,
}

/// Operations the loader requires from its hosting environment.
///
/// All I/O is synchronous; a partial read or write is a violation of the
/// stream contract and surfaces as an error, never a retry. Implementations
/// exist per host flavor; the loader core stays host-agnostic.
pub trait HostInterface {
    /// Host flavor identifier recorded on the control block.
    fn host_type(&self) -> &'static str;

    fn open(&mut self, uri: &str, options: OpenOptions) -> Result<StreamHandle, HostError>;

    /// Resolved canonical name of an open stream.
    fn name(&self, stream: StreamHandle) -> Result<String, HostError>;

    fn size(&self, stream: StreamHandle) -> Result<u64, HostError>;

    fn read_at(
        &mut self,
        stream: StreamHandle,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, HostError>;

    fn close(&mut self, stream: StreamHandle) -> Result<(), HostError>;

    /// Reads the complete contents of `stream` into one allocation. A short
    /// read means the host broke the stream contract and is an error.
    fn read_all(&mut self, stream: StreamHandle) -> Result<Vec<u8>, HostError> {
        let size = self.size(stream)? as usize;
        let mut buf = vec![0; size];
        let got = self.read_at(stream, 0, &mut buf)?;
        if got != size {
            return Err(HostError::Io(format!("short read: {got} of {size} bytes")));
        }
        Ok(buf)
    }

    /// Opens the object at `uri` and loads it into the address space.
    fn load_object(&mut self, uri: &str, kind: ObjectKind) -> Result<(), HostError>;

    /// Loads an object from an already-open stream.
    fn load_object_from(
        &mut self,
        stream: StreamHandle,
        kind: ObjectKind,
    ) -> Result<(), HostError>;

    /// Registers an object that host startup code already mapped into the
    /// address space, instead of loading it again.
    fn adopt_mapped_object(
        &mut self,
        stream: StreamHandle,
        kind: ObjectKind,
    ) -> Result<(), HostError>;

    /// Allocation alignment of the host. Must be a power of two.
    fn allocation_alignment(&self) -> usize;

    fn process_id(&self) -> u64;

    fn host_id(&self) -> u64;

    fn cpu_info(&self) -> Result<CpuInfo, HostError>;

    /// Total memory quota in bytes.
    fn memory_quota(&self) -> Result<u64, HostError>;

    /// Address range the application may use.
    fn user_address_range(&self) -> AddressRange;

    /// Identity material produced by isolation-specific setup, if this is a
    /// hardware-isolated host. Written once before bootstrap, read-only
    /// afterward.
    fn security_context(&self) -> Option<&SecurityContext>;

    /// Hands control to the application entry point. This never returns on
    /// a healthy host; a return of any kind, `Ok` included, is an
    /// internal-consistency violation the caller must treat as fatal.
    fn start_execution(&mut self, launch: Launch) -> Result<(), HostError>;

    /// Renders a fatal diagnostic and terminates the process with a
    /// non-zero exit status.
    fn fail(&self, message: &str) -> !;
}
