//! Load-once catalog of items to compare.
//!
//! Each item carries exactly [`SLOT_COUNT`] title variants addressed by slot
//! index, an optional original title, and a (possibly empty) list of image
//! references. The catalog is built once and never mutated afterwards; share it
//! by reference (or `Arc`) between consumers.

pub mod images;
pub mod table;

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

pub use images::decode_image_list;
pub use table::Table;

/// Number of variant slots per item.
pub const SLOT_COUNT: usize = 6;

/// Number of image cells the rating surface renders per item.
pub const DISPLAY_IMAGE_COUNT: usize = 4;

/// Accepted column names per slot: the short `vN` form and the benchmark
/// spreadsheet's `title_Nx` form.
const SLOT_COLUMNS: [[&str; 2]; SLOT_COUNT] = [
    ["v0", "title_0a"],
    ["v1", "title_0b"],
    ["v2", "title_1a"],
    ["v3", "title_1b"],
    ["v4", "title_2a"],
    ["v5", "title_2b"],
];

const TITLE_COLUMN: &str = "title";
const IMAGE_COLUMNS: [&str; 2] = ["images", "image_urls"];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed source: {0}")]
    MalformedSource(String),
    #[error("item {id} out of range (catalog has {count} items)")]
    OutOfRange { id: usize, count: usize },
}

impl CatalogError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSource(message.into())
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Stable index into the catalog.
    pub id: usize,
    /// Original title the variants were derived from, when the source has one.
    pub title: Option<String>,
    /// Variant text per slot. Content may be empty; the slot space is fixed.
    pub variants: [String; SLOT_COUNT],
    /// Decoded image references.
    pub images: Vec<String>,
}

impl Item {
    pub fn variant(&self, slot: usize) -> Option<&str> {
        self.variants.get(slot).map(String::as_str)
    }

    /// Image references padded with empty strings (or truncated) to `count` cells.
    pub fn display_images(&self, count: usize) -> Vec<&str> {
        (0..count)
            .map(|i| self.images.get(i).map(String::as_str).unwrap_or(""))
            .collect()
    }
}

/// Raw row handed to [`Catalog::from_rows`].
#[derive(Debug, Clone, Default)]
pub struct CatalogRow {
    pub title: Option<String>,
    pub variants: Vec<String>,
    /// Encoded image list, e.g. `['a.jpg', 'b.jpg']`.
    pub images: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Load a catalog from a file. `.json` files are read as an array of row
    /// objects, anything else as CSV with a header row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let table = if is_json {
            Table::from_json_str(&raw)?
        } else {
            Table::from_csv_str(&raw)?
        };
        let catalog = Self::from_table(&table)?;
        info!(path = %path.display(), items = catalog.item_count(), "catalog loaded");
        Ok(catalog)
    }

    /// Build from a parsed table, resolving the slot, title and image columns.
    pub fn from_table(table: &Table) -> Result<Self, CatalogError> {
        let mut slot_idx = [0usize; SLOT_COUNT];
        for (slot, names) in SLOT_COLUMNS.iter().enumerate() {
            slot_idx[slot] = names
                .iter()
                .find_map(|name| table.column(name))
                .ok_or_else(|| {
                    CatalogError::malformed(format!(
                        "missing variant column for slot {slot} (expected `{}` or `{}`)",
                        names[0], names[1]
                    ))
                })?;
        }
        let title_idx = table.column(TITLE_COLUMN);
        let image_idx = IMAGE_COLUMNS.iter().find_map(|name| table.column(name));

        let rows = table
            .rows
            .iter()
            .enumerate()
            .map(|(row_no, cells)| -> Result<CatalogRow, CatalogError> {
                let variants = slot_idx
                    .iter()
                    .enumerate()
                    .map(|(slot, &col)| {
                        cells.get(col).cloned().flatten().ok_or_else(|| {
                            CatalogError::malformed(format!(
                                "row {row_no}: no value for variant slot {slot}"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CatalogRow {
                    title: title_idx.and_then(|c| cells.get(c).cloned().flatten()),
                    variants,
                    images: image_idx.and_then(|c| cells.get(c).cloned().flatten()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rows(rows)
    }

    /// Build from in-memory rows. Every row must carry exactly six variants.
    pub fn from_rows(rows: impl IntoIterator<Item = CatalogRow>) -> Result<Self, CatalogError> {
        let mut items = Vec::new();
        for (id, row) in rows.into_iter().enumerate() {
            let found = row.variants.len();
            let variants: [String; SLOT_COUNT] = row.variants.try_into().map_err(|_| {
                CatalogError::malformed(format!(
                    "row {id}: expected {SLOT_COUNT} variants, found {found}"
                ))
            })?;
            let images = match row.images.as_deref() {
                Some(raw) => match decode_image_list(raw) {
                    Some(list) => list,
                    None => {
                        warn!(row = id, "unreadable image list; showing no images");
                        Vec::new()
                    }
                },
                None => Vec::new(),
            };
            items.push(Item {
                id,
                title: row.title.filter(|t| !t.trim().is_empty()),
                variants,
                images,
            });
        }
        Ok(Self { items })
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get_item(&self, id: usize) -> Result<&Item, CatalogError> {
        self.items.get(id).ok_or(CatalogError::OutOfRange {
            id,
            count: self.items.len(),
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }
}
