//! Stroke registry: id -> stroke mapping for concurrent and retained
//! strokes.
//!
//! Ids are caller-supplied (pointer ids from the input surface) and must be
//! unique among concurrently open strokes. Completed strokes stay registered
//! and drawable for batch redraw until explicitly evicted.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StrokeError, StrokeResult};
use crate::stroke::Stroke;

/// Caller-supplied stroke identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StrokeId(pub u64);

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StrokeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// All registered strokes, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct StrokeRegistry {
    strokes: HashMap<StrokeId, Stroke>,
}

impl StrokeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stroke under the given id.
    ///
    /// Returns the displaced stroke if the id was already in use (the caller
    /// contract is unique ids per concurrently open stroke, so a displaced
    /// entry usually means a stale completed stroke is being replaced).
    pub fn insert(&mut self, id: StrokeId, stroke: Stroke) -> Option<Stroke> {
        let displaced = self.strokes.insert(id, stroke);
        if displaced.is_some() {
            tracing::debug!(%id, "stroke registry displaced an existing entry");
        }
        displaced
    }

    /// Look up a stroke by id.
    #[must_use]
    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.get(&id)
    }

    /// Look up a stroke for mutation.
    pub fn get_mut(&mut self, id: StrokeId) -> Option<&mut Stroke> {
        self.strokes.get_mut(&id)
    }

    /// Evict a stroke from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::UnknownStroke`] if the id is not registered.
    pub fn remove(&mut self, id: StrokeId) -> StrokeResult<Stroke> {
        let stroke = self
            .strokes
            .remove(&id)
            .ok_or(StrokeError::UnknownStroke(id))?;
        tracing::debug!(%id, "stroke evicted");
        Ok(stroke)
    }

    /// Whether the id is registered.
    #[must_use]
    pub fn contains(&self, id: StrokeId) -> bool {
        self.strokes.contains_key(&id)
    }

    /// Number of registered strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Iterate over all registered strokes.
    pub fn iter(&self) -> impl Iterator<Item = (StrokeId, &Stroke)> {
        self.strokes.iter().map(|(id, stroke)| (*id, stroke))
    }

    /// Serialize the registry to JSON for the persistence collaborator.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> StrokeResult<String> {
        let mut entries: Vec<(StrokeId, &Stroke)> = self.iter().collect();
        entries.sort_by_key(|(id, _)| *id);
        serde_json::to_string(&entries).map_err(StrokeError::Serialization)
    }

    /// Restore a registry from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> StrokeResult<Self> {
        let entries: Vec<(StrokeId, Stroke)> = serde_json::from_str(json)?;
        Ok(Self {
            strokes: entries.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{Brush, Color};
    use crate::geometry::Point;
    use crate::grid::PartitionGrid;

    fn sample_stroke(grid: &PartitionGrid) -> Stroke {
        let mut stroke = Stroke::begin(
            Brush::new("pen", 10.0, Color::BLACK),
            Point::new(10.0, 10.0, 1.0),
            grid,
        );
        stroke
            .add_points(
                [
                    Point::new(12.0, 11.0, 0.8),
                    Point::new(15.0, 13.0, 0.9),
                    Point::new(20.0, 18.0, 1.0),
                ],
                grid,
            )
            .expect("open");
        stroke
    }

    #[test]
    fn test_insert_lookup_remove() {
        let grid = PartitionGrid::new(100.0, 100.0, 4, 4);
        let mut registry = StrokeRegistry::new();
        assert!(registry.is_empty());

        registry.insert(StrokeId(1), sample_stroke(&grid));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(StrokeId(1)));
        assert!(registry.get(StrokeId(1)).is_some());

        registry.remove(StrokeId(1)).expect("registered");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_unknown_errors() {
        let mut registry = StrokeRegistry::new();
        let err = registry.remove(StrokeId(7)).expect_err("not registered");
        assert!(matches!(err, StrokeError::UnknownStroke(StrokeId(7))));
    }

    #[test]
    fn test_completed_strokes_stay_registered() {
        let grid = PartitionGrid::new(100.0, 100.0, 4, 4);
        let mut registry = StrokeRegistry::new();
        registry.insert(StrokeId(1), sample_stroke(&grid));
        registry
            .get_mut(StrokeId(1))
            .expect("registered")
            .complete();
        assert!(registry.get(StrokeId(1)).expect("retained").is_completed());
    }

    #[test]
    fn test_json_round_trip() {
        let grid = PartitionGrid::new(100.0, 100.0, 4, 4);
        let mut registry = StrokeRegistry::new();
        registry.insert(StrokeId(1), sample_stroke(&grid));
        registry.insert(StrokeId(2), sample_stroke(&grid));

        let json = registry.to_json().expect("serializes");
        let restored = StrokeRegistry::from_json(&json).expect("deserializes");

        assert_eq!(restored.len(), 2);
        let stroke = restored.get(StrokeId(1)).expect("restored");
        assert_eq!(stroke.path().len(), 4);
        assert_eq!(stroke.control_points().len(), 4);
        assert_eq!(stroke.touched(), registry.get(StrokeId(1)).expect("kept").touched());
    }
}
