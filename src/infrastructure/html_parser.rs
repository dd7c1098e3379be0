//! HTML parsing and camera extraction for technical pages
//!
//! The technical page lists production facts as sibling label/value pairs.
//! This module locates the row labeled "Camera" and normalizes its value into
//! a list of camera model names. Pure functions over markup, no I/O.

use anyhow::{Result, anyhow};
use scraper::{Html, Selector};

/// Result of running the extractor over one technical page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraExtraction {
    /// The camera section was present; the list may be empty. Encounter order
    /// is preserved and duplicates are not collapsed here (the store layer
    /// owns de-duplication).
    Cameras(Vec<String>),

    /// No camera label exists anywhere in the document. Downstream this is
    /// treated the same as an empty list; the distinction only feeds logging.
    SectionAbsent,
}

/// Configuration for technical-page extraction
#[derive(Debug, Clone)]
pub struct CameraExtractorConfig {
    /// Selector for label/value rows
    pub row_selector: String,
    /// Selector for the cells within a row (first = label, second = value)
    pub cell_selector: String,
    /// Label text identifying the camera section, compared case-insensitively
    pub camera_label: String,
}

impl Default for CameraExtractorConfig {
    fn default() -> Self {
        Self {
            row_selector: "tr".to_string(),
            cell_selector: "td".to_string(),
            camera_label: "camera".to_string(),
        }
    }
}

/// Extracts camera model names from technical-page markup
pub struct CameraExtractor {
    row_selector: Selector,
    cell_selector: Selector,
    camera_label: String,
}

impl CameraExtractor {
    /// Create a new extractor with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CameraExtractorConfig::default())
    }

    /// Create a new extractor with custom configuration
    pub fn with_config(config: CameraExtractorConfig) -> Result<Self> {
        let row_selector = Selector::parse(&config.row_selector)
            .map_err(|e| anyhow!("invalid row selector: {}", e))?;
        let cell_selector = Selector::parse(&config.cell_selector)
            .map_err(|e| anyhow!("invalid cell selector: {}", e))?;

        Ok(Self {
            row_selector,
            cell_selector,
            camera_label: config.camera_label,
        })
    }

    /// Extract camera model names from one technical page.
    ///
    /// Each line of the value cell yields at most one name: the substring
    /// before the first comma, trimmed. Both element boundaries (`<br>`
    /// produces separate text nodes) and literal newlines within one text
    /// node delimit lines. Trailing lens/accessory detail after the comma
    /// is discarded.
    pub fn extract_camera_names(&self, html: &str) -> CameraExtraction {
        let document = Html::parse_document(html);

        for row in document.select(&self.row_selector) {
            let mut cells = row.select(&self.cell_selector);

            let Some(label_cell) = cells.next() else {
                continue;
            };
            let label = label_cell.text().collect::<String>();
            if !label.trim().eq_ignore_ascii_case(&self.camera_label) {
                continue;
            }

            // Label present but no value cell: a valid zero-camera outcome
            let Some(value_cell) = cells.next() else {
                return CameraExtraction::Cameras(Vec::new());
            };

            let names = value_cell
                .text()
                .flat_map(str::lines)
                .filter_map(|line| {
                    let name = line.split(',').next().unwrap_or("").trim();
                    if name.is_empty() {
                        None
                    } else {
                        Some(name.to_string())
                    }
                })
                .collect();

            return CameraExtraction::Cameras(names);
        }

        CameraExtraction::SectionAbsent
    }
}
