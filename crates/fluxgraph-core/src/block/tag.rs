use crate::block::payload::Payload;

/// Absolute item index on a port's stream.
pub type ItemIndex = u64;

/// Offset-stamped metadata annotation on an item stream.
#[derive(Debug, Clone)]
pub struct Tag {
    /// Position relative to the absolute item count of the stream the
    /// tag was produced against.
    pub offset: ItemIndex,
    /// Opaque annotation value.
    pub value: Payload,
}

impl Tag {
    pub fn new(offset: ItemIndex, value: Payload) -> Self {
        Self { offset, value }
    }

    /// Re-bases the tag across a block: `offset - consumed + produced`
    /// preserves the tag's logical position in the combined stream.
    ///
    /// An offset computed against stale counters would underflow here;
    /// that is a caller-ordering bug, flagged in debug builds only.
    pub fn rebased(&self, consumed: ItemIndex, produced: ItemIndex) -> Self {
        debug_assert!(
            self.offset + produced >= consumed,
            "tag offset {} re-based against stale counters (consumed={consumed}, produced={produced})",
            self.offset,
        );
        Self {
            offset: self.offset.wrapping_sub(consumed).wrapping_add(produced),
            value: self.value.clone(),
        }
    }
}
