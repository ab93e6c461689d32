//! Cyclic waveform datasets and the loop extension that makes them seamless.

use std::sync::Arc;

use crate::error::GenerationError;

/// Identity of a dataset within a pool.
pub type DatasetId = usize;

/// An immutable cyclic waveform, cheap to clone and shared by every series reading it.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: DatasetId,
    values: Arc<[f64]>,
}

impl Dataset {
    /// Wrap `values` as a dataset. An empty waveform cannot be streamed and is rejected.
    pub fn new(id: DatasetId, values: Vec<f64>) -> Result<Self, GenerationError> {
        if values.is_empty() {
            return Err(GenerationError::EmptyTrace);
        }
        Ok(Self {
            id,
            values: values.into(),
        })
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at virtual time index `x`, read with wraparound.
    #[inline]
    pub fn sample_at(&self, x: i64) -> f64 {
        self.values[wrap_index(x, self.values.len())]
    }

    /// Two handles refer to the same underlying waveform.
    pub fn same_as(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

/// Append a reversed copy of `values`, producing a ping-pong loop of twice the length.
///
/// The two middle samples are equal, and so are the first and last, so reading
/// the result modulo its length never jumps.
pub fn loop_extend(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() * 2);
    out.extend_from_slice(values);
    out.extend(values.iter().rev());
    out
}

/// Normalise any integer index, negative ones included, into `[0, len)`.
///
/// Panics if `len` is zero.
#[inline]
pub fn wrap_index(x: i64, len: usize) -> usize {
    x.rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_extend_mirrors_sequence() {
        let s = [1.0, 2.0, 5.0, 3.0];
        let ext = loop_extend(&s);
        assert_eq!(ext.len(), 8);
        assert_eq!(&ext[..4], &s);
        assert_eq!(ext[4], s[3]);
        assert_eq!(&ext[4..], &[3.0, 5.0, 2.0, 1.0]);
    }

    #[test]
    fn loop_extend_empty_is_empty() {
        assert!(loop_extend(&[]).is_empty());
    }

    #[test]
    fn wrap_index_handles_negative_indices() {
        assert_eq!(wrap_index(-1, 20), 19);
        assert_eq!(wrap_index(-20, 20), 0);
        assert_eq!(wrap_index(-21, 20), 19);
        assert_eq!(wrap_index(45, 20), 5);
    }

    #[test]
    fn wrap_index_in_range_and_periodic() {
        for len in [1usize, 2, 7, 20, 120_000] {
            for x in [-250_001i64, -30_000, -7, -1, 0, 1, 6, 19, 59_999, 1_000_003] {
                let i = wrap_index(x, len);
                assert!(i < len, "wrap_index({x}, {len}) = {i}");
                assert_eq!(i, wrap_index(x + len as i64, len));
            }
        }
    }

    #[test]
    fn clones_share_identity() {
        let a = Dataset::new(0, vec![1.0, 2.0]).unwrap();
        let b = a.clone();
        let c = Dataset::new(0, vec![1.0, 2.0]).unwrap();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert_eq!(a.sample_at(-1), 2.0);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            Dataset::new(4, Vec::new()),
            Err(GenerationError::EmptyTrace)
        ));
    }
}
