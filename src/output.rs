//! # Rendering measurement results
//!
//! Two reflection-driven renderers, neither of which knows any concrete
//! algorithm type — everything goes through schemas and the
//! [`Record`](crate::record::Record) getters:
//!
//! - [`write_csv`] — the reproducible CSV contract: one header row
//!   (`<component>.<fieldName>`, arrays as `<component>.<fieldName><i>`),
//!   one units row aligned to the same columns, then one data row per
//!   [`Source`], astrometry columns first, all cells joined with `", "`.
//! - [`SchemaTable`] — a human-readable field/type/value/units table for one
//!   source, rendered with `comfy-table`. A borrowing Display adaptor; build
//!   it with [`Source::schema_table`] and print with `{}`.
//!
//! Int fields are rendered through the `i64` getter; Float fields are
//! rendered at f32 precision (widening them to `f64` first would print the
//! f32 representation error, e.g. `6.66` as `6.659999847412109`).

use std::fmt;
use std::io;

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use itertools::Itertools;

use crate::measurement::Measurement;
use crate::record::Record;
use crate::schema::{FieldEntry, FieldType};
use crate::skymeter_errors::SkymeterError;
use crate::source::Source;

#[derive(Clone, Copy)]
enum RowKind {
    Header,
    Units,
    Data,
}

/// Render one cell of a CSV row.
fn cell<R: Record + ?Sized>(
    record: &R,
    entry: &FieldEntry,
    index: Option<u32>,
    kind: RowKind,
) -> Result<String, SkymeterError> {
    match kind {
        RowKind::Header => {
            let mut name = format!("{}.{}", record.component(), entry.name);
            if let Some(i) = index {
                name.push_str(&i.to_string());
            }
            Ok(name)
        }
        RowKind::Units => Ok(entry.units.clone()),
        RowKind::Data => data_cell(record, entry, index.unwrap_or(0)),
    }
}

fn data_cell<R: Record + ?Sized>(
    record: &R,
    entry: &FieldEntry,
    i: u32,
) -> Result<String, SkymeterError> {
    let text = match entry.ftype {
        FieldType::Int | FieldType::Long => {
            record.get_entry_as_long_indexed(i, entry)?.to_string()
        }
        FieldType::Float => (record.get_entry_indexed(i, entry)? as f32).to_string(),
        _ => record.get_entry_indexed(i, entry)?.to_string(),
    };
    Ok(text)
}

/// One CSV row for a whole composite: every record, every schema entry,
/// every array element, in declaration order.
fn composite_row<R: Record + ?Sized>(
    values: &Measurement<R>,
    kind: RowKind,
) -> Result<String, SkymeterError> {
    let mut cells = Vec::new();
    for record in values.iter() {
        for entry in record.schema().entries() {
            if entry.is_array() {
                for i in 0..entry.arity {
                    cells.push(cell(record, entry, Some(i), kind)?);
                }
            } else {
                cells.push(cell(record, entry, None, kind)?);
            }
        }
    }
    Ok(cells.iter().join(", "))
}

/// One full-width row: astrometry columns, then photometry columns.
fn source_row(source: &Source, kind: RowKind) -> Result<String, SkymeterError> {
    Ok(format!(
        "{}, {}",
        composite_row(source.astrometry(), kind)?,
        composite_row(source.photometry(), kind)?
    ))
}

/// Write the CSV rendering of `sources`: header row, units row, then one
/// data row per source.
///
/// Column order and cell formatting are a reproducible contract (see the
/// module docs); the header is taken from the first source, so every source
/// is expected to have been measured with the same algorithm configuration.
/// Writes nothing for an empty slice.
pub fn write_csv<W: io::Write>(writer: &mut W, sources: &[Source]) -> Result<(), SkymeterError> {
    writer.write_all(csv_string(sources)?.as_bytes())?;
    Ok(())
}

/// Like [`write_csv`], returning the rendering as one string.
pub fn csv_string(sources: &[Source]) -> Result<String, SkymeterError> {
    let Some(first) = sources.first() else {
        return Ok(String::new());
    };

    let mut rendered = String::new();
    rendered.push_str(&source_row(first, RowKind::Header)?);
    rendered.push('\n');
    rendered.push_str(&source_row(first, RowKind::Units)?);
    rendered.push('\n');
    for source in sources {
        rendered.push_str(&source_row(source, RowKind::Data)?);
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Borrowing Display adaptor rendering one source's fields as a table:
/// `component.name | type | value(s) | units`.
pub struct SchemaTable<'a> {
    source: &'a Source,
}

impl Source {
    /// A field/type/value/units table over everything measured for this
    /// source.
    pub fn schema_table(&self) -> SchemaTable<'_> {
        SchemaTable { source: self }
    }
}

fn table_rows<R: Record + ?Sized>(table: &mut Table, values: &Measurement<R>) {
    for record in values.iter() {
        for entry in record.schema().entries() {
            let value = (0..entry.arity)
                .map(|i| {
                    data_cell(record, entry, i)
                        .unwrap_or_else(|e| format!("<{e}>"))
                })
                .join(" ");
            table.add_row(vec![
                Cell::new(format!("{}.{}", record.component(), entry.name)),
                Cell::new(entry.ftype),
                Cell::new(value),
                Cell::new(&entry.units),
            ]);
        }
    }
}

impl fmt::Display for SchemaTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Field", "Type", "Value", "Units"]);
        table_rows(&mut table, self.source.astrometry());
        table_rows(&mut table, self.source.photometry());
        write!(f, "{table}")
    }
}
