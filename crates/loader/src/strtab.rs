//! NUL-delimited string tables read from trusted files.
//!
//! Argument and environment source files are a raw concatenation of
//! NUL-terminated strings. The whole file lives in one contiguous buffer;
//! entries are views into it and the artifact drops as a single unit.

use std::ffi::{CStr, CString};

use host::{HostInterface, OpenOptions};

use crate::error::BootstrapError;

/// One contiguous buffer plus the start offset of every entry.
///
/// Invariant: each offset begins a NUL-terminated run inside the buffer,
/// so every view handed out stays within the single region.
#[derive(Clone, Debug)]
pub struct StringTable {
    buf: Box<[u8]>,
    offsets: Vec<usize>,
}

impl StringTable {
    /// Parses raw file contents. Non-empty contents must end with the NUL
    /// terminator; an empty file is valid and holds no entries.
    pub fn parse(buf: Vec<u8>) -> Result<Self, BootstrapError> {
        if let Some(&last) = buf.last() {
            if last != 0 {
                return Err(BootstrapError::format(
                    "string table does not end with a terminator",
                ));
            }
        }
        let mut offsets = Vec::new();
        let mut start = 0;
        for (pos, &byte) in buf.iter().enumerate() {
            if byte == 0 {
                offsets.push(start);
                start = pos + 1;
            }
        }
        Ok(Self { buf: buf.into_boxed_slice(), offsets })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The entry at `index` as a view into the shared buffer.
    pub fn get(&self, index: usize) -> Option<&CStr> {
        self.offsets.get(index).map(|&start| self.entry(start))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CStr> {
        self.offsets.iter().map(|&start| self.entry(start))
    }

    /// Materializes the entries as an owned vector, in order. The trailing
    /// sentinel slot is the host's concern when it builds the stack.
    pub fn to_vector(&self) -> Vec<CString> {
        self.iter().map(CStr::to_owned).collect()
    }

    fn entry(&self, start: usize) -> &CStr {
        // Construction guarantees a terminator follows every offset.
        CStr::from_bytes_until_nul(&self.buf[start..]).unwrap_or(c"")
    }
}

/// Opens and fully reads the string table at `uri`.
///
/// Any failure at any stage releases everything read so far and propagates;
/// no partial table is ever returned.
pub fn load_string_table<H: HostInterface + ?Sized>(
    host: &mut H,
    uri: &str,
) -> Result<StringTable, BootstrapError> {
    let stream = host
        .open(uri, OpenOptions::read())
        .map_err(|err| BootstrapError::resource(format!("cannot open '{uri}': {err}")))?;
    let contents = host
        .read_all(stream)
        .map_err(|err| BootstrapError::resource(format!("cannot read '{uri}': {err}")));
    let _ = host.close(stream);
    StringTable::parse(contents?)
        .map_err(|err| err.context(&format!("malformed string table in '{uri}'")))
}
