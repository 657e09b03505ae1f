//! Selection and merge of the environment the application observes.

use std::ffi::CString;

use host::HostInterface;
use log::warn;
use manifest::Manifest;

use crate::error::BootstrapError;
use crate::strtab;

/// Builds the environment the application is allowed to observe.
///
/// The inherited host environment is cleared unless the manifest opts in
/// to forwarding it; a source file may seed the environment instead (the
/// two options are mutually exclusive); `loader.env` declarations are
/// merged last and win on key conflicts.
pub fn build_environment<H: HostInterface + ?Sized>(
    host: &mut H,
    document: Option<&Manifest>,
    host_environment: Vec<CString>,
) -> Result<Vec<CString>, BootstrapError> {
    let use_host_env = match document {
        Some(document) => document.switch("loader.insecure__use_host_env")?,
        None => false,
    };
    let env_src_file = match document {
        Some(document) => document.string("loader.env_src_file")?,
        None => None,
    };

    if use_host_env && env_src_file.is_some() {
        return Err(BootstrapError::configuration(
            "cannot use 'loader.insecure__use_host_env' and 'loader.env_src_file' at the same \
             time",
        ));
    }

    let mut environment = if use_host_env {
        warn!(
            "forwarding host environment variables to the application; do not use this \
             configuration in production"
        );
        host_environment
    } else {
        // Deny by default: the inherited environment is dropped before any
        // later step can observe it.
        Vec::new()
    };

    if let Some(path) = env_src_file {
        environment = strtab::load_string_table(host, &path)
            .map_err(|err| {
                err.context("cannot load environment variables from 'loader.env_src_file'")
            })?
            .to_vector();
    }

    insert_manifest_entries(document, environment)
}

/// Merges `loader.env` declarations over the materialized environment.
///
/// Surviving pre-merge entries keep their original relative order;
/// manifest entries follow in declaration order. Entries sourced from an
/// environment file get the same override accounting as host-original
/// ones — the manifest wins over whatever was materialized before it.
fn insert_manifest_entries(
    document: Option<&Manifest>,
    environment: Vec<CString>,
) -> Result<Vec<CString>, BootstrapError> {
    let entries = match document {
        Some(document) => document.string_table("loader.env")?,
        None => None,
    };
    let Some(entries) = entries else {
        return Ok(environment);
    };
    if entries.is_empty() {
        return Ok(environment);
    }

    let mut overwritten = 0;
    for slot in &environment {
        let key = slot_key(slot)?;
        if entries.iter().any(|(name, _)| name.as_bytes() == key) {
            overwritten += 1;
        }
    }

    // Bounded by both operands, so this never underflows.
    let total = environment.len() + entries.len() - overwritten;
    let mut merged = Vec::with_capacity(total);

    for slot in environment {
        let overridden = {
            let key = slot_key(&slot)?;
            entries.iter().any(|(name, _)| name.as_bytes() == key)
        };
        if !overridden {
            merged.push(slot);
        }
    }

    for (name, value) in entries {
        let entry = CString::new(format!("{name}={value}")).map_err(|_| {
            BootstrapError::configuration(format!("cannot parse 'loader.env.{name}'"))
        })?;
        merged.push(entry);
    }

    debug_assert_eq!(merged.len(), total);
    Ok(merged)
}

/// Key part of a `KEY=value` slot. A slot without `=` is malformed.
fn slot_key(slot: &CString) -> Result<&[u8], BootstrapError> {
    let bytes = slot.to_bytes();
    let split = bytes
        .iter()
        .position(|&b| b == b'=')
        .ok_or_else(|| BootstrapError::format("environment entry is missing '='"))?;
    Ok(&bytes[..split])
}
