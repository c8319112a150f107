//! De-duplicated record selections

use indexmap::IndexMap;
use std::sync::Arc;

use crate::data::Record;

/// Set of selected records keyed by their stable index.
///
/// Replaced wholesale on every change; the empty set means "nothing selected".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    records: IndexMap<usize, Arc<Record>>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from records, keeping one entry per index
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Arc<Record>>,
    {
        let mut set = Self::new();
        set.extend(records);
        set
    }

    pub fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Arc<Record>>,
    {
        for record in records {
            self.records.insert(record.index(), record);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.records.contains_key(&index)
    }

    pub fn contains_record(&self, record: &Record) -> bool {
        self.contains(record.index())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.keys().copied()
    }

    pub fn records(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.values()
    }

    pub fn to_vec(&self) -> Vec<Arc<Record>> {
        self.records.values().cloned().collect()
    }
}

impl FromIterator<Arc<Record>> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = Arc<Record>>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, price: f64) -> Arc<Record> {
        Arc::new(Record::builder(index).number("price", price).build())
    }

    #[test]
    fn test_distinct_references_same_index() {
        let set = SelectionSet::from_records([record(1, 10.0), record(1, 99.0), record(2, 5.0)]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(1));
        assert!(set.contains_record(&record(2, 0.0)));
        assert_eq!(set.indices().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = SelectionSet::from_records([record(1, 0.0), record(2, 0.0)]);
        let b = SelectionSet::from_records([record(2, 0.0), record(1, 0.0)]);
        assert_eq!(a, b);
        assert!(SelectionSet::new().is_empty());
    }
}
