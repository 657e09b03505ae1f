//! Manifest and executable identity resolution.

use goblin::elf::header::{ELFMAG, SELFMAG};
use host::{HostInterface, OpenOptions};
use log::debug;
use manifest::Manifest;
use types::StreamHandle;

use crate::error::BootstrapError;
use crate::uri;

/// Manifest filename suffix appended to the executable identity.
pub const MANIFEST_SUFFIX: &str = ".manifest";
/// Suffix variant produced by the isolated-host packaging flow.
pub const MANIFEST_ISOLATED_SUFFIX: &str = ".manifest.sgx";
/// Fixed alternate location tried when no derived candidate opens.
const DEFAULT_MANIFEST_URI: &str = "file:manifest";

/// The authoritative manifest: parsed document, canonical identity, open
/// stream.
pub struct ResolvedManifest {
    pub document: Manifest,
    pub uri: String,
    pub handle: StreamHandle,
}

/// Locates, opens and parses the manifest.
///
/// A supplied manifest stream is authoritative. Otherwise the candidate
/// `<normalized executable>.manifest` is tried, then the fixed alternate
/// location. A process with neither a manifest stream nor an executable
/// cannot boot at all.
pub fn resolve_manifest<H: HostInterface + ?Sized>(
    host: &mut H,
    manifest_handle: Option<StreamHandle>,
    executable_uri: Option<&str>,
) -> Result<ResolvedManifest, BootstrapError> {
    let (handle, uri) = match manifest_handle {
        Some(handle) => {
            let uri = host.name(handle).map_err(|err| {
                BootstrapError::resource(format!("cannot get manifest name: {err}"))
            })?;
            (handle, uri)
        }
        None => {
            let executable_uri = executable_uri.ok_or_else(|| {
                BootstrapError::configuration("must have a manifest or an executable")
            })?;
            let candidate = format!("{}{}", uri::normalize(executable_uri)?, MANIFEST_SUFFIX);
            match host.open(&candidate, OpenOptions::read()) {
                Ok(handle) => (handle, candidate),
                Err(_) => match host.open(DEFAULT_MANIFEST_URI, OpenOptions::read()) {
                    Ok(handle) => (handle, DEFAULT_MANIFEST_URI.to_owned()),
                    Err(_) => return Err(BootstrapError::resource("cannot find manifest file")),
                },
            }
        }
    };
    debug!("loading manifest from '{uri}'");

    let raw = host
        .read_all(handle)
        .map_err(|err| BootstrapError::resource(format!("cannot read manifest file: {err}")))?;
    let text = String::from_utf8(raw)
        .map_err(|_| BootstrapError::format("manifest is not valid UTF-8"))?;
    let document = Manifest::parse(&text)?;
    Ok(ResolvedManifest { document, uri, handle })
}

/// `loader.exec` used to redirect the loader at another executable; it is
/// rejected unconditionally now, whatever its value.
pub fn reject_deprecated_keys(document: &Manifest) -> Result<(), BootstrapError> {
    if document.contains("loader.exec") {
        return Err(BootstrapError::configuration(
            "'loader.exec' is not supported anymore; update the manifest according to the \
             current documentation",
        ));
    }
    Ok(())
}

/// Derives the executable identity by stripping a recognized manifest
/// suffix from `manifest_uri` and opens it.
///
/// An unrecognized suffix means no executable can be derived (and the
/// image-loading steps are skipped); a failed open of a recognized
/// candidate is fatal.
pub fn derive_executable<H: HostInterface + ?Sized>(
    host: &mut H,
    manifest_uri: &str,
) -> Result<Option<(String, StreamHandle)>, BootstrapError> {
    let stripped = manifest_uri
        .strip_suffix(MANIFEST_SUFFIX)
        .or_else(|| manifest_uri.strip_suffix(MANIFEST_ISOLATED_SUFFIX));
    let Some(executable_uri) = stripped else {
        return Ok(None);
    };
    let handle = host.open(executable_uri, OpenOptions::read()).map_err(|err| {
        BootstrapError::resource(format!("cannot open the executable '{executable_uri}': {err}"))
    })?;
    Ok(Some((executable_uri.to_owned(), handle)))
}

/// The executable must begin with the recognized binary-object magic,
/// checked against the pre-mapped image when one exists, otherwise against
/// the stream header.
pub fn validate_executable_magic<H: HostInterface + ?Sized>(
    host: &mut H,
    handle: StreamHandle,
    mapped_image: Option<&[u8]>,
) -> Result<(), BootstrapError> {
    let mut header = [0u8; SELFMAG];
    let bytes: &[u8] = match mapped_image {
        Some(image) => image,
        None => {
            let got = host.read_at(handle, 0, &mut header).map_err(|err| {
                BootstrapError::resource(format!("cannot read executable header: {err}"))
            })?;
            &header[..got]
        }
    };
    if bytes.len() < SELFMAG || bytes[..SELFMAG] != *ELFMAG {
        return Err(BootstrapError::format("executable is not an ELF binary"));
    }
    Ok(())
}
