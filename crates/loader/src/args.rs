//! Selection of the authoritative argument source.

use std::ffi::CString;

use host::HostInterface;
use log::{info, warn};
use manifest::Manifest;

use crate::error::BootstrapError;
use crate::strtab;

/// Builds the argument vector the application is allowed to observe.
///
/// Exactly one source is authoritative per run: a manifest-trusted source
/// file, the host command line under an explicit insecure opt-in, or the
/// (possibly rewritten) first slot alone. A source file always wins over
/// host-supplied arguments; host arguments beyond slot 0 without any
/// opt-in are a policy violation.
pub fn build_arguments<H: HostInterface + ?Sized>(
    host: &mut H,
    document: Option<&Manifest>,
    mut arguments: Vec<CString>,
) -> Result<Vec<CString>, BootstrapError> {
    if let Some(document) = document {
        if let Some(argv0) = document.string("loader.argv0_override")? {
            let argv0 = CString::new(argv0).map_err(|_| {
                BootstrapError::configuration("cannot parse 'loader.argv0_override'")
            })?;
            // Rewrites slot 0 only; a two-slot sequence (value plus the
            // vector sentinel) is synthesized when no arguments existed.
            if arguments.is_empty() {
                arguments = vec![argv0];
            } else {
                arguments[0] = argv0;
            }
        }
    }

    let use_cmdline = match document {
        Some(document) => document.switch("loader.insecure__use_cmdline_argv")?,
        None => false,
    };
    let argv_src_file = match document {
        Some(document) => document.string("loader.argv_src_file")?,
        None => None,
    };

    if let Some(path) = argv_src_file {
        // The file contents are trusted; whatever the host supplied is
        // discarded wholesale.
        if arguments.len() > 1 {
            info!(
                "discarding command-line arguments ({} {} [...]) because \
                 'loader.argv_src_file' is set in the manifest",
                arguments[0].to_string_lossy(),
                arguments[1].to_string_lossy()
            );
        }
        let table = strtab::load_string_table(host, &path)
            .map_err(|err| err.context("cannot load arguments from 'loader.argv_src_file'"))?;
        return Ok(table.to_vector());
    }

    if use_cmdline {
        warn!("using insecure argv source; do not use this configuration in production");
        return Ok(arguments);
    }

    if arguments.len() > 1 {
        return Err(BootstrapError::policy(
            "argv handling is not configured in the manifest, but command-line arguments were \
             supplied",
        ));
    }

    Ok(arguments)
}
