//! Unit marker types for tagging typed dates and times.

/// Marker of a moment an entity was created at.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker of a moment an entity was deleted at.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;
