//! CSV payloads used to seed the ingredient and tag catalogs.

use std::io::Read;

use csv::{StringRecord, Trim};
use thiserror::Error;

use crate::domain::ingredient::NewIngredient;
use crate::domain::tag::NewTag;
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for names, units and slugs.
const FIELD_MAX_LEN: usize = 200;

pub type CatalogFormResult<T> = Result<T, CatalogFormError>;

/// Errors that can occur while parsing a catalog CSV.
#[derive(Debug, Error)]
pub enum CatalogFormError {
    #[error("строка {row}: ожидалось {expected} столбца, получено {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("строка {row}: пустое поле `{field}`")]
    EmptyField { row: usize, field: &'static str },
    #[error("строка {row}: поле `{field}` длиннее {FIELD_MAX_LEN} символов")]
    TooLong { row: usize, field: &'static str },
    #[error("строка {row}: некорректный цвет `{value}`")]
    InvalidColor { row: usize, value: String },
    #[error("строка {row}: некорректный slug `{value}`")]
    InvalidSlug { row: usize, value: String },
    #[error("файл не содержит записей")]
    Empty,
    /// CSV parsing failures.
    #[error("не удалось разобрать CSV: {0}")]
    Csv(#[from] csv::Error),
}

const INGREDIENT_COLUMNS: [&str; 2] = ["name", "measurement_unit"];
const TAG_COLUMNS: [&str; 3] = ["name", "color", "slug"];

/// Ingredient catalog in `name,measurement_unit` form. The header row is optional.
pub struct UploadIngredientsForm<R> {
    reader: R,
}

impl<R: Read> UploadIngredientsForm<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Parse and validate every row into a domain `NewIngredient`.
    pub fn into_new_ingredients(self) -> CatalogFormResult<Vec<NewIngredient>> {
        let rows = read_rows(self.reader, &INGREDIENT_COLUMNS)?;

        rows.into_iter()
            .map(|(row, record)| {
                let name = required_field(&record, 0, row, "name")?;
                let unit = required_field(&record, 1, row, "measurement_unit")?;
                Ok(NewIngredient::new(name, unit))
            })
            .collect()
    }
}

/// Tag catalog in `name,color,slug` form. The header row is optional.
pub struct UploadTagsForm<R> {
    reader: R,
}

impl<R: Read> UploadTagsForm<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Parse and validate every row into a domain `NewTag`.
    pub fn into_new_tags(self) -> CatalogFormResult<Vec<NewTag>> {
        let rows = read_rows(self.reader, &TAG_COLUMNS)?;

        rows.into_iter()
            .map(|(row, record)| {
                let name = required_field(&record, 0, row, "name")?;

                let color = required_field(&record, 1, row, "color")?;
                if !is_hex_color(&color) {
                    return Err(CatalogFormError::InvalidColor { row, value: color });
                }

                let slug = required_field(&record, 2, row, "slug")?;
                if !is_slug(&slug) {
                    return Err(CatalogFormError::InvalidSlug { row, value: slug });
                }

                Ok(NewTag::new(name, color, slug))
            })
            .collect()
    }
}

/// Read all records, skipping a leading header row equal to `columns`.
/// Returns records paired with their 1-based row numbers.
fn read_rows<R: Read>(
    reader: R,
    columns: &[&str],
) -> CatalogFormResult<Vec<(usize, StringRecord)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;

        if record.iter().all(str::is_empty) {
            continue;
        }
        if index == 0 && is_header(&record, columns) {
            continue;
        }
        if record.len() != columns.len() {
            return Err(CatalogFormError::ColumnCount {
                row,
                expected: columns.len(),
                found: record.len(),
            });
        }

        rows.push((row, record));
    }

    if rows.is_empty() {
        return Err(CatalogFormError::Empty);
    }

    Ok(rows)
}

fn is_header(record: &StringRecord, columns: &[&str]) -> bool {
    record.len() == columns.len()
        && record
            .iter()
            .zip(columns)
            .all(|(value, column)| value.eq_ignore_ascii_case(column))
}

fn required_field(
    record: &StringRecord,
    index: usize,
    row: usize,
    field: &'static str,
) -> CatalogFormResult<String> {
    let value = sanitize_inline_text(record.get(index).unwrap_or_default());
    if value.is_empty() {
        return Err(CatalogFormError::EmptyField { row, field });
    }
    if value.chars().count() > FIELD_MAX_LEN {
        return Err(CatalogFormError::TooLong { row, field });
    }
    Ok(value)
}

/// `#RRGGBB` in either case.
fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|ch| ch.is_ascii_hexdigit())
}

fn is_slug(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
