use crate::gpu::GpuLocation;

/// Cached location of a named uniform or attribute.
///
/// Starts out `Unresolved`, moves to `NotFound` or `Resolved` the first time
/// it is looked up after a link, and goes back to `Unresolved` whenever the
/// owning program relinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    /// Not looked up since the last link.
    #[default]
    Unresolved,
    /// The linked program does not declare (or optimized away) the name.
    NotFound,
    /// Valid location within the current link generation.
    Resolved(GpuLocation),
}

impl Location {
    /// Cache the result of a driver lookup.
    #[must_use]
    pub fn from_lookup(found: Option<GpuLocation>) -> Self {
        found.map_or(Self::NotFound, Self::Resolved)
    }

    /// The resolved location, if any.
    #[must_use]
    pub fn resolved(self) -> Option<GpuLocation> {
        match self {
            Self::Resolved(loc) => Some(loc),
            Self::Unresolved | Self::NotFound => None,
        }
    }
}
