use crate::error::BrowseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Opaque, single-use pagination token. Every consumption of a token yields
/// a brand-new token (or none); tokens are never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContinuationPoint(Vec<u8>);

impl ContinuationPoint {
    fn fresh() -> Self {
        Self(Uuid::new_v4().into_bytes().to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

struct Pending<T> {
    remaining: Vec<T>,
    max_per_call: usize,
}

/// Manages pagination state over arbitrary item arrays, independent of the
/// node graph. Each outstanding token holds the not-yet-delivered remainder
/// of one traversal; tokens for different traversals are independent, a
/// single token is use-once.
pub struct ContinuationPointManager<T> {
    points: BTreeMap<Vec<u8>, Pending<T>>,
}

impl<T> ContinuationPointManager<T> {
    pub fn new() -> Self {
        Self {
            points: BTreeMap::new(),
        }
    }

    /// Number of simultaneously outstanding continuation points.
    pub fn outstanding(&self) -> usize {
        self.points.len()
    }

    /// Capacity guard, independent of any single token. A configured
    /// maximum of 0 means unlimited.
    pub fn has_reached_maximum(&self, max_continuation_points: usize) -> bool {
        max_continuation_points != 0 && self.points.len() >= max_continuation_points
    }

    /// Start a paged traversal. When `max_elements` is 0 or everything fits
    /// in one call, all items are returned and no continuation point is
    /// created.
    pub fn register(
        &mut self,
        max_elements: usize,
        mut items: Vec<T>,
    ) -> (Vec<T>, Option<ContinuationPoint>) {
        if max_elements == 0 || items.len() <= max_elements {
            return (items, None);
        }
        let remaining = items.split_off(max_elements);
        let point = ContinuationPoint::fresh();
        tracing::trace!(
            outstanding = self.points.len() + 1,
            remaining = remaining.len(),
            "continuation point registered"
        );
        self.points.insert(
            point.0.clone(),
            Pending {
                remaining,
                max_per_call: max_elements,
            },
        );
        (items, Some(point))
    }

    /// Consume a token, returning the next slice and a fresh token if more
    /// items remain. A stale, cancelled or unknown token fails with
    /// [`BrowseError::BadContinuationPointInvalid`].
    pub fn get_next(
        &mut self,
        point: &ContinuationPoint,
    ) -> Result<(Vec<T>, Option<ContinuationPoint>), BrowseError> {
        let Some(pending) = self.points.remove(&point.0) else {
            return Err(BrowseError::BadContinuationPointInvalid);
        };
        let Pending {
            mut remaining,
            max_per_call,
        } = pending;
        if remaining.len() <= max_per_call {
            return Ok((remaining, None));
        }
        let rest = remaining.split_off(max_per_call);
        let next = ContinuationPoint::fresh();
        self.points.insert(
            next.0.clone(),
            Pending {
                remaining: rest,
                max_per_call,
            },
        );
        Ok((remaining, Some(next)))
    }

    /// Free a token's retained slice without returning data. The token is
    /// invalid for any future `get_next`.
    pub fn cancel(&mut self, point: &ContinuationPoint) -> Result<(), BrowseError> {
        match self.points.remove(&point.0) {
            Some(_) => {
                tracing::trace!(outstanding = self.points.len(), "continuation point cancelled");
                Ok(())
            }
            None => Err(BrowseError::BadContinuationPointInvalid),
        }
    }
}

impl<T> Default for ContinuationPointManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
