//! Position mementos.

use crate::domain::{
    error::ContractViolation,
    value_objects::{StreamId, StreamPosition},
};

/// An opaque memento of a stream position.
///
/// Markers are created by `ByteStream::new_marker`, filled in by `mark` and
/// handed back to `reset`. They own nothing; dropping one is free. Each marker
/// is tagged with the id of the stream that created it and is rejected by
/// every other stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteStreamMarker {
    stream: StreamId,
    position: Option<StreamPosition>,
}

impl ByteStreamMarker {
    pub(crate) const fn unset(stream: StreamId) -> Self {
        Self { stream, position: None }
    }

    /// The stream this marker belongs to.
    #[inline]
    pub const fn stream(&self) -> StreamId {
        self.stream
    }

    /// The recorded position, or None if the marker was never marked.
    #[inline]
    pub const fn position(&self) -> Option<StreamPosition> {
        self.position
    }

    pub(crate) fn check_owner(&self, owner: StreamId) -> Result<(), ContractViolation> {
        if self.stream != owner {
            return Err(ContractViolation::ForeignMarker {
                marker: self.stream,
                stream: owner,
            });
        }
        Ok(())
    }

    pub(crate) fn record(&mut self, owner: StreamId, position: StreamPosition) -> Result<(), ContractViolation> {
        self.check_owner(owner)?;
        self.position = Some(position);
        Ok(())
    }

    /// Resolve the marked position for `owner`.
    pub(crate) fn resolve(&self, owner: StreamId) -> Result<StreamPosition, ContractViolation> {
        self.check_owner(owner)?;
        self.position.ok_or(ContractViolation::UnsetMarker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_resolve() {
        let id = StreamId::next();
        let mut marker = ByteStreamMarker::unset(id);
        assert_eq!(marker.resolve(id), Err(ContractViolation::UnsetMarker));

        marker.record(id, StreamPosition::new(17)).unwrap();
        assert_eq!(marker.resolve(id), Ok(StreamPosition::new(17)));

        marker.record(id, StreamPosition::new(3)).unwrap();
        assert_eq!(marker.position(), Some(StreamPosition::new(3)));
    }

    #[test]
    fn test_foreign_owner_rejected() {
        let a = StreamId::next();
        let b = StreamId::next();
        let mut marker = ByteStreamMarker::unset(a);

        assert_eq!(
            marker.record(b, StreamPosition::START),
            Err(ContractViolation::ForeignMarker { marker: a, stream: b })
        );
        assert!(marker.position().is_none());
    }
}
