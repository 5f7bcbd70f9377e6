use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Spreadsheet formats the import pipeline accepts.
///
/// Cell parsing itself is a collaborator's job; this type only gates which
/// files are allowed in, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadsheetFormat {
    Csv,
    Xls,
    Xlsx,
}

impl SpreadsheetFormat {
    /// Detect the format from a file's extension (case-insensitive).
    /// Anything else is a fatal input-format error.
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xls") => Ok(Self::Xls),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(ImportError::UnknownFormat {
                filename: path.display().to_string(),
            }),
        }
    }
}

/// One decoded spreadsheet row, keyed by the import sheet's header names.
/// All cells arrive as raw strings; numeric cells are parsed downstream so a
/// malformed amount fails loudly instead of coercing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub weight: Option<String>,
    pub price: Option<String>,
    pub qty: Option<String>,
    pub category_name: Option<String>,
}
