use crate::block::buffer::BufferHandle;
use crate::block::payload::Payload;
use crate::block::tag::Tag;

/// Value crossing a block boundary through the topology layer.
///
/// Buffers move ownership; tags and payloads are shared-immutable.
/// Config-committed announcements never cross blocks, so they are not
/// part of this set.
#[derive(Debug)]
pub enum Delivery {
    /// Tag annotation for the destination input's stream.
    Tag(Tag),
    /// Opaque out-of-band message for the destination input.
    Payload(Payload),
    /// Stream data, ownership transferred to the destination.
    Buffer(BufferHandle),
}
