//! Result tree assembly
//!
//! Arranges normalized values into top-level fields and group fields,
//! following the dictionary layout. Absent values produce no output at any
//! level; a group with no present children is omitted entirely.

use super::dictionary::{FieldDictionary, LayoutSlot};
use crate::app::models::{FieldSpec, ResultField};
use std::collections::HashMap;

/// Assemble normalized `(spec, value)` pairs into the ordered output
///
/// When the same header key appears more than once the first value wins.
pub fn assemble<'a, I>(dictionary: &FieldDictionary, values: I) -> Vec<ResultField>
where
    I: IntoIterator<Item = (&'a FieldSpec, String)>,
{
    let mut by_key: HashMap<&str, String> = HashMap::new();
    for (spec, value) in values {
        by_key.entry(spec.header_key).or_insert(value);
    }

    let mut fields = Vec::new();

    for slot in dictionary.layout() {
        match *slot {
            LayoutSlot::Field(key) => {
                if let (Some(spec), Some(value)) = (dictionary.lookup(key), by_key.remove(key)) {
                    fields.push(ResultField::leaf(spec.output_name, value));
                }
            }
            LayoutSlot::Group(id) => {
                let Some(group) = dictionary.group(id) else {
                    continue;
                };

                let children: Vec<ResultField> = group
                    .children
                    .iter()
                    .filter_map(|&key| {
                        let spec = dictionary.lookup(key)?;
                        let value = by_key.remove(key)?;
                        Some(ResultField::leaf(spec.output_name, value))
                    })
                    .collect();

                if !children.is_empty() {
                    fields.push(ResultField::group(group.output_name, children));
                }
            }
        }
    }

    fields
}

/// Number of leaf values in an assembled tree
pub fn count_leaves(fields: &[ResultField]) -> usize {
    fields
        .iter()
        .map(|field| {
            if field.is_group() {
                count_leaves(&field.children)
            } else {
                1
            }
        })
        .sum()
}
