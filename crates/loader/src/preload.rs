//! Preload object loading.

use host::{HostInterface, ObjectKind};
use log::debug;
use manifest::Manifest;

use crate::error::BootstrapError;

/// Loads manifest-declared companion objects ahead of the main image.
///
/// `loader.preload` is one comma-separated string; empty segments from
/// leading, trailing or adjacent commas are skipped. Objects load in
/// declaration order and any failure is fatal.
pub fn load_preload_objects<H: HostInterface + ?Sized>(
    host: &mut H,
    document: Option<&Manifest>,
) -> Result<(), BootstrapError> {
    let list = match document {
        Some(document) => document.string("loader.preload")?,
        None => None,
    };
    let Some(list) = list else {
        return Ok(());
    };

    for name in list.split(',').filter(|segment| !segment.is_empty()) {
        debug!("loading preload object '{name}'");
        host.load_object(name, ObjectKind::Preload).map_err(|err| {
            BootstrapError::resource(format!("unable to load preload library '{name}': {err}"))
        })?;
    }
    Ok(())
}
