use crate::domain::record::{Record, RecordId};

/// Ordered in-memory collection of the records of one session
///
/// Insertion order is kept, it is the order used for display and for
/// picking which of several records with the same id gets removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// appends a record, duplicate ids are allowed
    pub fn add(&mut self, record: Record) {
        self.records.push(record);
    }

    /// removes the first record with the given id
    ///
    /// returns false if no record has that id
    pub fn remove(&mut self, id: RecordId) -> bool {
        match self.records.iter().position(|r| r.id == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    /// discards all records and adopts the given ones
    pub fn replace(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn snapshot(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}
