//! xlsxstream - Streaming, gap-filling row/cell parser for OOXML worksheet parts
//!
//! This crate turns the XML of a single worksheet part (`xl/worksheets/sheetN.xml`)
//! into an ordered stream of row and cell events delivered to a caller-supplied sink,
//! without materializing the sheet in memory.
//!
//! - Omitted cells are synthesized as empty cells so that every row is contiguous
//! - Shared strings, number formats and comments are resolved through read-only stores
//! - Numeric cells are rendered as dates or canonical decimals depending on their format
//! - Malformed cells are logged (via the `log` facade) and degraded to text, never fatal
//!
//! Opening the archive and selecting sheets is left to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use xlsxstream::{RowSink, SharedStrings, SheetParserBuilder, StyleTable};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let strings = SharedStrings::from_xml(
//!         r#"<sst><si><t>Name</t></si><si><t>Age</t></si></sst>"#.as_bytes(),
//!     )?;
//!     let styles = StyleTable::default();
//!
//!     let mut rows = Vec::new();
//!     let sink = RowSink::new(|row: u32, values: Vec<String>| {
//!         rows.push((row, values));
//!         Ok::<(), std::fmt::Error>(())
//!     });
//!
//!     let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
//!       <dimension ref="A1:C2"/>
//!       <sheetData>
//!         <row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="s"><v>1</v></c></row>
//!         <row r="2"><c r="A2" t="inlineStr"><is><t>Alice</t></is></c><c r="C2"><v>30</v></c></row>
//!       </sheetData>
//!     </worksheet>"#;
//!
//!     let mut parser = SheetParserBuilder::new(&strings, &styles).build(sink)?;
//!     parser.parse_xml(sheet.as_bytes())?;
//!     drop(parser);
//!
//!     assert_eq!(rows[0].1, vec!["Name", "", "Age"]);
//!     assert_eq!(rows[1].1, vec!["Alice", "", "30"]);
//!     Ok(())
//! }
//! ```
//!
//! # Custom Sinks
//!
//! Implement [`SheetSink`] to receive typed cells, comments, headers and footers:
//!
//! ```rust
//! use xlsxstream::{CellRecord, CellValue, SheetSink};
//!
//! #[derive(Default)]
//! struct Totals {
//!     sum: f64,
//! }
//!
//! impl SheetSink for Totals {
//!     fn cell(&mut self, cell: CellRecord) {
//!         if let Some(CellValue::Number(n)) = cell.typed_value {
//!             self.sum += n;
//!         }
//!     }
//! }
//! ```

pub mod address;
mod api;
mod builder;
mod error;
mod format;
mod numeric;
mod parser;
mod security;
mod sink;
mod store;
mod types;

// 公開API
pub use api::{DateFormat, DateSystem, FormulaMode};
pub use builder::SheetParserBuilder;
pub use error::XlsxStreamError;
pub use parser::SheetParser;
pub use security::{SecurityLimits, MAX_COLUMNS, MAX_ROWS};
pub use sink::{RowSink, SheetSink};
pub use store::{
    CommentStore, CommentTable, SharedStringStore, SharedStrings, StyleStore, StyleTable,
};
pub use types::{CellAddress, CellRange, CellRecord, CellValue, Comment};
