//! Image tag rotation.
//!
//! Releases are simulated by moving the image tag through a fixed, ordered
//! list. Advancing past the last tag starts over at the first one, and so
//! does advancing from a tag that is not in the list at all.

/// The tags a values file cycles through, in release order.
pub const IMAGE_TAGS: [&str; 3] = ["0.1", "0.2", "0.3"];

/// Returns the tag that follows `current`.
///
/// An unknown tag rolls over to the first entry, the same as the last one.
pub fn next_tag(current: &str) -> &'static str {
    IMAGE_TAGS
        .iter()
        .position(|tag| *tag == current)
        .and_then(|idx| IMAGE_TAGS.get(idx + 1))
        .copied()
        .unwrap_or(IMAGE_TAGS[0])
}
