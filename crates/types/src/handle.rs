/// Opaque reference to an open host stream.
///
/// The host side owns the actual resource (file descriptor, mapping,
/// process channel); everything above it only moves these identifiers
/// around. A handle stays valid until the owning host closes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamHandle(pub u64);

impl core::fmt::Display for StreamHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}
