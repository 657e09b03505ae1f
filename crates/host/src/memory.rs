//! In-memory host used by tests and demos.

use std::collections::BTreeMap;

use types::{AddressRange, CpuInfo, Launch, SecurityContext, StreamHandle};

use crate::error::HostError;
use crate::interface::{
    AccessMode, CreateMode, HostInterface, ObjectKind, OpenOptions, URI_PREFIX_DEV,
};

/// Host implementation backed by an in-memory file map.
///
/// Streams resolve against `files`, object loads and the final launch are
/// recorded instead of performed, and process termination becomes a panic
/// so test harnesses can observe it.
#[derive(Debug)]
pub struct MemoryHost {
    files: BTreeMap<String, Vec<u8>>,
    streams: BTreeMap<u64, String>,
    next_stream: u64,

    /// Objects loaded via `load_object`/`load_object_from`, in call order.
    pub loaded: Vec<(String, ObjectKind)>,
    /// Objects adopted as already-mapped, in call order.
    pub adopted: Vec<(String, ObjectKind)>,
    /// The launch handed to `start_execution`, if bootstrap got that far.
    pub launched: Option<Launch>,

    pub alloc_align: usize,
    pub process_id: u64,
    pub host_id: u64,
    pub mem_total: u64,
    pub user_address: AddressRange,
    pub cpu: CpuInfo,
    pub security: Option<SecurityContext>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            streams: BTreeMap::new(),
            next_stream: 1,
            loaded: Vec::new(),
            adopted: Vec::new(),
            launched: None,
            alloc_align: 0x1000,
            process_id: 1,
            host_id: 1,
            mem_total: 512 * 1024 * 1024,
            user_address: AddressRange::new(0x10000, 0x8000_0000),
            cpu: CpuInfo {
                cpu_num: 4,
                vendor: "GenuineIntel".to_owned(),
                brand: "memory host".to_owned(),
                family: 6,
                model: 0,
                stepping: 0,
                flags: "fpu sse sse2".to_owned(),
            },
            security: None,
        }
    }

    /// Registers `contents` under `uri`.
    pub fn insert_file(&mut self, uri: &str, contents: impl Into<Vec<u8>>) {
        self.files.insert(uri.to_owned(), contents.into());
    }

    /// Opens `uri` directly, as host startup code would before invoking the
    /// loader.
    pub fn open_existing(&mut self, uri: &str) -> StreamHandle {
        assert!(
            uri.starts_with(URI_PREFIX_DEV) || self.files.contains_key(uri),
            "open_existing: no such file: {uri}"
        );
        self.register(uri)
    }

    /// Contents written to `uri` so far, if any.
    pub fn file(&self, uri: &str) -> Option<&[u8]> {
        self.files.get(uri).map(Vec::as_slice)
    }

    fn register(&mut self, uri: &str) -> StreamHandle {
        let id = self.next_stream;
        self.next_stream += 1;
        self.streams.insert(id, uri.to_owned());
        StreamHandle(id)
    }

    fn uri_of(&self, stream: StreamHandle) -> Result<&str, HostError> {
        self.streams.get(&stream.0).map(String::as_str).ok_or(HostError::Invalid)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostInterface for MemoryHost {
    fn host_type(&self) -> &'static str {
        "memory"
    }

    fn open(&mut self, uri: &str, options: OpenOptions) -> Result<StreamHandle, HostError> {
        if uri.starts_with(URI_PREFIX_DEV) {
            // Devices always exist and ignore creation options.
            return Ok(self.register(uri));
        }
        if !self.files.contains_key(uri) {
            match (options.access, options.create) {
                (AccessMode::Write, CreateMode::TryCreate) => {
                    self.files.insert(uri.to_owned(), Vec::new());
                }
                _ => return Err(HostError::NotFound),
            }
        }
        Ok(self.register(uri))
    }

    fn name(&self, stream: StreamHandle) -> Result<String, HostError> {
        self.uri_of(stream).map(str::to_owned)
    }

    fn size(&self, stream: StreamHandle) -> Result<u64, HostError> {
        let uri = self.uri_of(stream)?;
        if uri.starts_with(URI_PREFIX_DEV) {
            return Ok(0);
        }
        self.files.get(uri).map(|f| f.len() as u64).ok_or(HostError::NotFound)
    }

    fn read_at(
        &mut self,
        stream: StreamHandle,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, HostError> {
        let uri = self.uri_of(stream)?.to_owned();
        if uri.starts_with(URI_PREFIX_DEV) {
            return Err(HostError::Denied);
        }
        let contents = self.files.get(&uri).ok_or(HostError::NotFound)?;
        let offset = offset as usize;
        if offset >= contents.len() {
            return Ok(0);
        }
        let n = buf.len().min(contents.len() - offset);
        buf[..n].copy_from_slice(&contents[offset..offset + n]);
        Ok(n)
    }

    fn close(&mut self, stream: StreamHandle) -> Result<(), HostError> {
        self.streams.remove(&stream.0).map(|_| ()).ok_or(HostError::Invalid)
    }

    fn load_object(&mut self, uri: &str, kind: ObjectKind) -> Result<(), HostError> {
        if !self.files.contains_key(uri) {
            return Err(HostError::NotFound);
        }
        self.loaded.push((uri.to_owned(), kind));
        Ok(())
    }

    fn load_object_from(
        &mut self,
        stream: StreamHandle,
        kind: ObjectKind,
    ) -> Result<(), HostError> {
        let uri = self.uri_of(stream)?.to_owned();
        self.loaded.push((uri, kind));
        Ok(())
    }

    fn adopt_mapped_object(
        &mut self,
        stream: StreamHandle,
        kind: ObjectKind,
    ) -> Result<(), HostError> {
        let uri = self.uri_of(stream)?.to_owned();
        self.adopted.push((uri, kind));
        Ok(())
    }

    fn allocation_alignment(&self) -> usize {
        self.alloc_align
    }

    fn process_id(&self) -> u64 {
        self.process_id
    }

    fn host_id(&self) -> u64 {
        self.host_id
    }

    fn cpu_info(&self) -> Result<CpuInfo, HostError> {
        Ok(self.cpu.clone())
    }

    fn memory_quota(&self) -> Result<u64, HostError> {
        Ok(self.mem_total)
    }

    fn user_address_range(&self) -> AddressRange {
        self.user_address
    }

    fn security_context(&self) -> Option<&SecurityContext> {
        self.security.as_ref()
    }

    fn start_execution(&mut self, launch: Launch) -> Result<(), HostError> {
        self.launched = Some(launch);
        Ok(())
    }

    fn fail(&self, message: &str) -> ! {
        panic!("bootstrap failed: {message}");
    }
}
