use std::sync::Arc;

use super::{Record, SharedDomain};

/// Ordered, read-only sequence of records.
///
/// Records are shared behind `Arc` so that selections can hold them without
/// copying.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Arc<Record>>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_shared(records: Vec<Arc<Record>>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.iter()
    }

    /// Look a record up by its stable index
    pub fn get(&self, index: usize) -> Option<&Arc<Record>> {
        self.records.iter().find(|r| r.index() == index)
    }

    /// All finite values of a numeric field, in dataset order
    pub fn valid_values(&self, field: &str) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| r.number(field))
            .filter(|v| v.is_finite())
            .collect()
    }

    /// `[min, max]` of the valid values of a field
    pub fn extent(&self, field: &str) -> Option<SharedDomain> {
        SharedDomain::from_values(self.records.iter().map(|r| r.number(field)))
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
