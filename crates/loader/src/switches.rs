//! Remaining manifest-declared runtime toggles.

use host::{CONSOLE_URI, HostInterface, OpenOptions};
use manifest::Manifest;
use types::StreamHandle;

use crate::error::BootstrapError;

/// Validates and reports the ASLR-disable switch. Enforcement belongs to
/// the address-space management code; this only records the flag.
pub fn resolve_disable_aslr(document: Option<&Manifest>) -> Result<bool, BootstrapError> {
    match document {
        Some(document) => Ok(document.switch("loader.insecure__disable_aslr")?),
        None => Ok(false),
    }
}

/// Resolves `loader.debug_type` and opens the requested debug stream.
///
/// `inline` writes to the host console device, `file` to the manifest-named
/// file (created if needed, owner-exclusive), `none` and absence route
/// nowhere. Anything else is a configuration error.
pub fn resolve_debug_stream<H: HostInterface + ?Sized>(
    host: &mut H,
    document: Option<&Manifest>,
) -> Result<Option<StreamHandle>, BootstrapError> {
    let Some(document) = document else {
        return Ok(None);
    };
    let Some(kind) = document.string("loader.debug_type")? else {
        return Ok(None);
    };

    match kind.as_str() {
        "inline" => {
            let stream = host.open(CONSOLE_URI, OpenOptions::write()).map_err(|err| {
                BootstrapError::resource(format!("cannot open debug stream: {err}"))
            })?;
            Ok(Some(stream))
        }
        "file" => {
            let path = document.string("loader.debug_file")?.ok_or_else(|| {
                BootstrapError::configuration("cannot find or parse 'loader.debug_file'")
            })?;
            let stream = host
                .open(&path, OpenOptions::write().create().owner_exclusive())
                .map_err(|err| {
                    BootstrapError::resource(format!("cannot open debug stream: {err}"))
                })?;
            Ok(Some(stream))
        }
        "none" => Ok(None),
        _ => Err(BootstrapError::configuration(
            "unknown 'loader.debug_type' (allowed: `inline`, `file`, `none`)",
        )),
    }
}
