//! Sink Module
//!
//! シートパーサーが生成するイベントの受け取り先を定義するモジュール。

use log::error;

use crate::types::CellRecord;

/// シートイベントの受け取り先
///
/// すべての呼び出しは同期的に、文書順で行われます。
/// `cell`以外のメソッドにはデフォルトの空実装があります。
///
/// # イベント順序
///
/// ```text
/// (cell* row_start cell* row_end)* cell* (header | footer)* sheet_end
/// ```
///
/// 行の外の`cell`は、XMLに行要素がない位置のコメントを運ぶ空セルです。
/// ヘッダー/フッターはXML上の位置（`sheetData`の後）で通知されます。
///
/// # 使用例
///
/// ```rust
/// use xlsxstream::{CellRecord, SheetSink};
///
/// #[derive(Default)]
/// struct Counter {
///     cells: usize,
///     rows: usize,
/// }
///
/// impl SheetSink for Counter {
///     fn cell(&mut self, _cell: CellRecord) {
///         self.cells += 1;
///     }
///
///     fn row_end(&mut self, _row_index: u32) {
///         self.rows += 1;
///     }
/// }
/// ```
pub trait SheetSink {
    /// ヘッダー（`oddHeader`, `evenHeader`, `firstHeader`）
    fn header(&mut self, _text: String, _tag: &str) {}

    /// 行の開始
    ///
    /// `column_count`は`dimension`から求めた列数です（不明な場合は`-1`）。
    fn row_start(&mut self, _row_index: u32, _column_count: i32) {}

    /// セル（ギャップ埋めで合成された空セルを含む）
    fn cell(&mut self, cell: CellRecord);

    /// 行の終了
    fn row_end(&mut self, _row_index: u32) {}

    /// フッター（`oddFooter`, `evenFooter`, `firstFooter`）
    fn footer(&mut self, _text: String, _tag: &str) {}

    /// シートの終了
    ///
    /// `row_count`は最後の行インデックス+1です（行がない場合は0）。
    fn sheet_end(&mut self, _row_count: u32) {}
}

impl<S: SheetSink + ?Sized> SheetSink for &mut S {
    fn header(&mut self, text: String, tag: &str) {
        (**self).header(text, tag)
    }

    fn row_start(&mut self, row_index: u32, column_count: i32) {
        (**self).row_start(row_index, column_count)
    }

    fn cell(&mut self, cell: CellRecord) {
        (**self).cell(cell)
    }

    fn row_end(&mut self, row_index: u32) {
        (**self).row_end(row_index)
    }

    fn footer(&mut self, text: String, tag: &str) {
        (**self).footer(text, tag)
    }

    fn sheet_end(&mut self, row_count: u32) {
        (**self).sheet_end(row_count)
    }
}

/// 行単位のコールバックアダプター
///
/// 各行のセルの`string_value`を列順に集め、行の終了時にコールバックを呼び出します。
/// コールバックのエラーはログに出力され、パーサーには伝播しません。
///
/// # 使用例
///
/// ```rust
/// use xlsxstream::{RowSink, SharedStrings, SheetParserBuilder, StyleTable};
///
/// # fn main() -> Result<(), xlsxstream::XlsxStreamError> {
/// let strings = SharedStrings::from(vec!["Name".to_string()]);
/// let styles = StyleTable::default();
/// let mut rows = Vec::new();
///
/// let sink = RowSink::new(|row: u32, values: Vec<String>| {
///     rows.push((row, values));
///     Ok::<(), std::fmt::Error>(())
/// });
/// let mut parser = SheetParserBuilder::new(&strings, &styles).build(sink)?;
/// parser.parse_xml(
///     r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1"><v>42</v></c></row></sheetData></worksheet>"#
///         .as_bytes(),
/// )?;
/// drop(parser);
///
/// assert_eq!(rows, vec![(0, vec!["Name".to_string(), String::new(), "42".to_string()])]);
/// # Ok(())
/// # }
/// ```
pub struct RowSink<F, G = fn(u32)> {
    /// 行コールバック
    on_row: F,

    /// シート終了コールバック
    on_sheet_end: Option<G>,

    /// 現在の行の値
    current: Vec<String>,

    /// コールバックが失敗した回数
    failures: usize,
}

impl<F> RowSink<F> {
    /// 行コールバックのみのアダプターを生成
    pub fn new(on_row: F) -> Self {
        Self {
            on_row,
            on_sheet_end: None,
            current: Vec::new(),
            failures: 0,
        }
    }
}

impl<F, G> RowSink<F, G> {
    /// 行コールバックとシート終了コールバック（引数は行数）を持つアダプターを生成
    pub fn with_sheet_end(on_row: F, on_sheet_end: G) -> Self {
        Self {
            on_row,
            on_sheet_end: Some(on_sheet_end),
            current: Vec::new(),
            failures: 0,
        }
    }

    /// 行コールバックが失敗した回数
    pub fn failures(&self) -> usize {
        self.failures
    }
}

impl<F, G, E> SheetSink for RowSink<F, G>
where
    F: FnMut(u32, Vec<String>) -> Result<(), E>,
    G: FnMut(u32),
    E: std::fmt::Display,
{
    fn row_start(&mut self, _row_index: u32, column_count: i32) {
        self.current.clear();
        if let Ok(count) = usize::try_from(column_count) {
            self.current.reserve(count);
        }
    }

    fn cell(&mut self, cell: CellRecord) {
        self.current.push(cell.string_value);
    }

    fn row_end(&mut self, row_index: u32) {
        let values = std::mem::take(&mut self.current);
        if let Err(e) = (self.on_row)(row_index, values) {
            self.failures += 1;
            error!("Row callback failed at row {}: {}", row_index, e);
        }
    }

    fn sheet_end(&mut self, row_count: u32) {
        // 行の外で出力されたコメントのみのセルは破棄
        self.current.clear();
        if let Some(on_sheet_end) = self.on_sheet_end.as_mut() {
            on_sheet_end(row_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellAddress, CellValue};

    fn cell(col: u32, value: &str) -> CellRecord {
        CellRecord {
            column_index: col,
            reference: CellAddress::new(0, col).to_a1(),
            string_value: value.to_string(),
            typed_value: Some(CellValue::Text(value.to_string())),
            comment: None,
        }
    }

    #[test]
    fn test_row_sink_collects_values() {
        let mut rows = Vec::new();
        {
            let mut sink = RowSink::new(|row: u32, values: Vec<String>| {
                rows.push((row, values));
                Ok::<(), String>(())
            });
            sink.row_start(0, 2);
            sink.cell(cell(0, "a"));
            sink.cell(cell(1, "b"));
            sink.row_end(0);
            sink.row_start(1, -1);
            sink.row_end(1);
        }
        assert_eq!(
            rows,
            vec![
                (0, vec!["a".to_string(), "b".to_string()]),
                (1, Vec::new())
            ]
        );
    }

    #[test]
    fn test_row_sink_swallows_errors() {
        let mut calls = 0;
        let mut sink = RowSink::new(|_row: u32, _values: Vec<String>| {
            calls += 1;
            Err::<(), String>("boom".to_string())
        });
        sink.row_start(0, -1);
        sink.row_end(0);
        sink.row_start(1, -1);
        sink.row_end(1);
        assert_eq!(sink.failures(), 2);
        drop(sink);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_row_sink_sheet_end() {
        let mut total = None;
        let mut sink = RowSink::with_sheet_end(
            |_row: u32, _values: Vec<String>| Ok::<(), String>(()),
            |count: u32| total = Some(count),
        );
        sink.row_start(0, -1);
        sink.row_end(0);
        sink.sheet_end(1);
        drop(sink);
        assert_eq!(total, Some(1));
    }

    #[test]
    fn test_mut_ref_forwarding() {
        struct Count(usize);
        impl SheetSink for Count {
            fn cell(&mut self, _cell: CellRecord) {
                self.0 += 1;
            }
        }

        let mut count = Count(0);
        {
            let mut by_ref = &mut count;
            by_ref.cell(cell(0, "x"));
            SheetSink::cell(&mut by_ref, cell(1, "y"));
        }
        assert_eq!(count.0, 2);
    }
}
