//! Dependency ordering of record definitions.
//!
//! A record must be complete before another record embeds it by value.
//! Enums, handles, and compound aliases never depend on records and are
//! declared ahead of them, so only record-to-record edges matter here.

use std::collections::HashMap;

use hbind_model::{InterfaceModel, RecordDef, TypeDescriptor};

use crate::error::{HeaderError, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Records embedded by value in `record`, in field order.
fn value_dependencies(record: &RecordDef) -> impl Iterator<Item = &str> {
    record.fields.iter().filter_map(|f| match &f.ty {
        TypeDescriptor::Record(name) => Some(name.as_str()),
        _ => None,
    })
}

/// Order records so every record follows the records it embeds.
///
/// Depth-first from each record in declaration order, so independent
/// records keep their declared order. A value cycle is an error naming
/// every record on it.
pub fn sort_records(model: &InterfaceModel) -> Result<Vec<&RecordDef>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(model.records.len());
    let mut path = Vec::new();

    for record in &model.records {
        visit(model, record, &mut marks, &mut path, &mut order)?;
    }
    Ok(order)
}

fn visit<'m>(
    model: &'m InterfaceModel,
    record: &'m RecordDef,
    marks: &mut HashMap<&'m str, Mark>,
    path: &mut Vec<&'m str>,
    order: &mut Vec<&'m RecordDef>,
) -> Result<()> {
    match marks.get(record.name.as_str()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            let start = path
                .iter()
                .position(|n| *n == record.name)
                .unwrap_or_default();
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(record.name.clone());
            return Err(HeaderError::CyclicType { path: cycle });
        }
        None => {}
    }

    marks.insert(&record.name, Mark::InProgress);
    path.push(&record.name);
    for dep in value_dependencies(record) {
        // Unresolved names were rejected when the context was built.
        if let Some(next) = model.record(dep) {
            visit(model, next, marks, path, order)?;
        }
    }
    path.pop();
    marks.insert(&record.name, Mark::Done);
    order.push(record);
    Ok(())
}
