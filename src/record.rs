// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Records and sub-records: the input/output data the orchestrator walks.
//!
//! A [`Record`] is an ordered list of [`SubRecord`]s (layers) plus
//! record-level (slab) raw fields and computed parameter slots. Neither
//! type is ever mutated by the orchestrator in place — pathway execution
//! clones a sub-record only the first time it needs to write a slot
//! (`Rc::make_mut`-style copy-on-write), so unmodified sub-records stay
//! shared between the input record and every pathway's result record.

use crate::registry::spec::FieldValue;
use crate::value::UncertainValue;
use indexmap::IndexMap;
use std::rc::Rc;

/// One layer: raw fields plus computed parameter slots, filled in at most
/// once per pathway execution.
#[derive(Debug, Clone, Default)]
pub struct SubRecord {
    raw_fields: IndexMap<String, FieldValue>,
    parameters: IndexMap<String, UncertainValue>,
}

impl SubRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, name: impl Into<String>, value: FieldValue) {
        self.raw_fields.insert(name.into(), value);
    }

    pub fn get_raw(&self, name: &str) -> Option<&FieldValue> {
        self.raw_fields.get(name)
    }

    pub fn get_parameter(&self, name: &str) -> Option<UncertainValue> {
        self.parameters.get(name).copied()
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: UncertainValue) {
        self.parameters.insert(name.into(), value);
    }

    pub fn parameters(&self) -> &IndexMap<String, UncertainValue> {
        &self.parameters
    }

    pub fn raw_fields(&self) -> &IndexMap<String, FieldValue> {
        &self.raw_fields
    }
}

/// The whole input/output record: an ordered list of sub-records plus
/// record-level raw fields and computed parameter slots.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub sub_records: Vec<Rc<SubRecord>>,
    raw_fields: IndexMap<String, FieldValue>,
    parameters: IndexMap<String, UncertainValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sub_records(sub_records: Vec<SubRecord>) -> Self {
        Self {
            sub_records: sub_records.into_iter().map(Rc::new).collect(),
            raw_fields: IndexMap::new(),
            parameters: IndexMap::new(),
        }
    }

    pub fn set_raw(&mut self, name: impl Into<String>, value: FieldValue) {
        self.raw_fields.insert(name.into(), value);
    }

    pub fn get_raw(&self, name: &str) -> Option<&FieldValue> {
        self.raw_fields.get(name)
    }

    pub fn get_parameter(&self, name: &str) -> Option<UncertainValue> {
        self.parameters.get(name).copied()
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: UncertainValue) {
        self.parameters.insert(name.into(), value);
    }

    /// Replace the sub-record at `index` with a new `Rc`, as the
    /// copy-on-write rule requires: unrelated indices keep sharing their
    /// original `Rc` with `self`.
    pub fn replace_sub_record(&mut self, index: usize, sub_record: SubRecord) {
        self.sub_records[index] = Rc::new(sub_record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmodified_sub_records_are_shared_by_pointer() {
        let original = Record::with_sub_records(vec![SubRecord::new(), SubRecord::new()]);
        let mut clone = original.clone();
        assert!(Rc::ptr_eq(&original.sub_records[0], &clone.sub_records[0]));
        clone.replace_sub_record(0, SubRecord::new());
        assert!(!Rc::ptr_eq(&original.sub_records[0], &clone.sub_records[0]));
        assert!(Rc::ptr_eq(&original.sub_records[1], &clone.sub_records[1]));
    }

    #[test]
    fn parameter_slots_round_trip() {
        let mut sr = SubRecord::new();
        assert!(sr.get_parameter("density").is_none());
        sr.set_parameter("density", UncertainValue::exact(400.0));
        assert_eq!(sr.get_parameter("density").unwrap().mean, 400.0);
    }
}
