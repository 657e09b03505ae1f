//! The bootstrap state machine.
//!
//! A strictly linear sequence: every step runs at most once, nothing loops
//! back, and no step is retried after a later step started. Only one
//! thread of control exists at this stage, so there is no shared mutable
//! state to protect. Any failure terminates the process through the
//! host's fatal-diagnostic path and never returns to the step that
//! triggered it.

use std::ffi::CString;

use host::{HostInterface, ObjectKind};
use log::debug;
use types::{ControlBlock, Launch, StreamHandle};

use crate::error::BootstrapError;
use crate::{args, env, preload, resolve, switches};

/// Everything host-specific startup code hands to the loader, exactly
/// once per process.
pub struct EntryInput<'a> {
    pub instance_id: u64,
    /// Manifest stream, when startup code already opened one.
    pub manifest_handle: Option<StreamHandle>,
    /// Executable stream, when startup code already opened one.
    pub executable_handle: Option<StreamHandle>,
    /// Executable image bytes, when startup code already mapped the image
    /// into the address space.
    pub executable_image: Option<&'a [u8]>,
    /// Channel to the parent process, for child instances.
    pub parent_process: Option<StreamHandle>,
    /// Handle of the first execution unit.
    pub first_thread: Option<StreamHandle>,
    /// Host-supplied arguments, untrusted until vetted.
    pub arguments: Vec<CString>,
    /// Host-supplied environment, untrusted until vetted.
    pub environment: Vec<CString>,
}

/// Identities and handles committed during the bootstrap pass.
///
/// Mutated only while bootstrap runs; read-only afterward.
#[derive(Clone, Debug)]
pub struct BootstrapContext {
    pub instance_id: u64,
    pub alloc_align: usize,
    pub manifest_uri: String,
    pub manifest_handle: StreamHandle,
    pub executable_uri: Option<String>,
    pub executable_handle: Option<StreamHandle>,
    pub parent_process: Option<StreamHandle>,
}

/// Entry point invoked by host-specific startup code.
///
/// Returns only by transferring control to the application. A return from
/// the application entry point, or any failure along the way, terminates
/// the process.
pub fn bootstrap_main<H: HostInterface>(host: &mut H, input: EntryInput<'_>) -> ! {
    match run(host, input) {
        Ok(launch) => {
            let message = match host.start_execution(launch) {
                Ok(()) => "unexpected return from application entry point".to_owned(),
                Err(err) => format!("cannot start execution: {err}"),
            };
            host.fail(&message)
        }
        Err(err) => host.fail(&err.to_string()),
    }
}

/// The full bootstrap sequence up to, but not including, the transfer of
/// control. Split from [`bootstrap_main`] so the pipeline is testable
/// against a host implementation.
pub fn run<H: HostInterface>(host: &mut H, input: EntryInput<'_>) -> Result<Launch, BootstrapError> {
    // Allocation alignment seeds everything later placed in the address
    // space; the host contract requires a power of two.
    let alloc_align = host.allocation_alignment();
    if !alloc_align.is_power_of_two() {
        return Err(BootstrapError::resource(
            "host reported a non-power-of-two allocation alignment",
        ));
    }

    let executable_uri = match input.executable_handle {
        Some(handle) => Some(host.name(handle).map_err(|err| {
            BootstrapError::resource(format!("cannot get executable name: {err}"))
        })?),
        None => None,
    };

    let resolved = resolve::resolve_manifest(host, input.manifest_handle, executable_uri.as_deref())?;
    resolve::reject_deprecated_keys(&resolved.document)?;

    let (executable_uri, executable_handle) = match input.executable_handle {
        Some(handle) => (executable_uri, Some(handle)),
        None => match resolve::derive_executable(host, &resolved.uri)? {
            Some((uri, handle)) => (Some(uri), Some(handle)),
            None => (None, None),
        },
    };

    if let Some(handle) = executable_handle {
        resolve::validate_executable_magic(host, handle, input.executable_image)?;
    }

    let context = BootstrapContext {
        instance_id: input.instance_id,
        alloc_align,
        manifest_uri: resolved.uri,
        manifest_handle: resolved.handle,
        executable_uri,
        executable_handle,
        parent_process: input.parent_process,
    };
    debug!(
        "bootstrap context committed: manifest '{}', executable {:?}",
        context.manifest_uri, context.executable_uri
    );

    let document = Some(&resolved.document);

    let disable_aslr = switches::resolve_disable_aslr(document)?;

    let arguments = args::build_arguments(host, document, input.arguments)?;
    let environment = env::build_environment(host, document, input.environment)?;

    preload::load_preload_objects(host, document)?;

    if let Some(handle) = context.executable_handle {
        if input.executable_image.is_some() {
            host.adopt_mapped_object(handle, ObjectKind::Executable)
        } else {
            host.load_object_from(handle, ObjectKind::Executable)
        }
        .map_err(|err| BootstrapError::resource(format!("cannot load the executable: {err}")))?;
    }

    let debug_stream = switches::resolve_debug_stream(host, document)?;

    let cpu = host
        .cpu_info()
        .map_err(|err| BootstrapError::resource(format!("cannot query CPU info: {err}")))?;
    let mem_total = host
        .memory_quota()
        .map_err(|err| BootstrapError::resource(format!("cannot query memory quota: {err}")))?;

    let control = ControlBlock {
        host_type: host.host_type(),
        process_id: host.process_id(),
        host_id: host.host_id(),
        manifest_handle: context.manifest_handle,
        executable: context.executable_uri.clone(),
        parent_process: context.parent_process,
        first_thread: input.first_thread,
        disable_aslr,
        user_address: host.user_address_range(),
        alloc_align: context.alloc_align,
        cpu,
        debug_stream,
        mem_total,
    };

    Ok(Launch { control, arguments, environment })
}
