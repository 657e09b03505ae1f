//! URI path normalization.

use crate::error::BootstrapError;

/// Splits `uri` into its scheme prefix (colon included) and path part.
/// A URI without a scheme is all path.
fn split_scheme(uri: &str) -> (&str, &str) {
    match uri.find(':') {
        Some(pos) if pos > 0 && uri[..pos].chars().all(|c| c.is_ascii_alphanumeric()) => {
            (&uri[..pos + 1], &uri[pos + 1..])
        }
        _ => ("", uri),
    }
}

/// Collapses `.`, `..` and repeated separators in the path part of `uri`,
/// keeping the scheme untouched.
///
/// `..` above the root of an absolute path cannot be resolved and is an
/// error; a relative path keeps its leading `..` components.
pub fn normalize(uri: &str) -> Result<String, BootstrapError> {
    let (scheme, path) = split_scheme(uri);
    let absolute = path.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&"..") | None => {
                    if absolute {
                        return Err(BootstrapError::format(format!("cannot normalize '{uri}'")));
                    }
                    parts.push("..");
                }
                Some(_) => {
                    parts.pop();
                }
            },
            other => parts.push(other),
        }
    }

    let mut out = String::with_capacity(uri.len());
    out.push_str(scheme);
    if absolute {
        out.push('/');
    }
    out.push_str(&parts.join("/"));
    Ok(out)
}
