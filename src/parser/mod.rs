//! Sheet Parser Module
//!
//! ワークシートパーツ（`xl/worksheets/sheetN.xml`）のXMLイベントを受け取り、
//! ギャップ埋め済みの行・セルイベントをシンクへ通知するステートマシン。
//!
//! パーサーは先読みを行わず、現在のセル（またはヘッダー/フッター）の文字データ以外を
//! バッファしません。セル単位のエラーで解析を中断することはなく、
//! ログを出力して安全なテキスト表現にフォールバックします。

mod comments;
mod events;
mod state;

use log::{debug, warn};

use self::comments::CommentQueue;
use self::state::{CellState, ParserState, Phase, RowState};
use crate::address;
use crate::api::FormulaMode;
use crate::builder::ParserConfig;
use crate::error::XlsxStreamError;
use crate::numeric::NumericFormatter;
use crate::security::{append_bounded, SecurityLimits};
use crate::sink::SheetSink;
use crate::store::{CommentStore, SharedStringStore, StyleStore};
use crate::types::{CellAddress, CellRecord, CellType, CellValue, Comment};

/// SpreadsheetML名前空間（Transitional）
pub(crate) const SPREADSHEETML_NS: &str =
    "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// SpreadsheetML名前空間（Strict）
pub(crate) const SPREADSHEETML_STRICT_NS: &str = "http://purl.oclc.org/ooxml/spreadsheetml/main";

/// 未知のセル型に対して出力するマーカー
const UNKNOWN_MARKER: &str = "UNKNOWN";

/// エラー値セルの接頭辞
const ERROR_PREFIX: &str = "ERROR:";

/// 解析対象の名前空間かどうか（名前空間なしの要素も対象）
fn is_spreadsheet_namespace(namespace: Option<&str>) -> bool {
    matches!(
        namespace,
        None | Some(SPREADSHEETML_NS) | Some(SPREADSHEETML_STRICT_NS)
    )
}

/// ヘッダー/フッター要素の名前
fn header_footer_tag(name: &str) -> Option<&'static str> {
    match name {
        "oddHeader" => Some("oddHeader"),
        "evenHeader" => Some("evenHeader"),
        "firstHeader" => Some("firstHeader"),
        "oddFooter" => Some("oddFooter"),
        "evenFooter" => Some("evenFooter"),
        "firstFooter" => Some("firstFooter"),
        _ => None,
    }
}

fn attribute<'x>(attributes: &[(&'x str, &'x str)], name: &str) -> Option<&'x str> {
    attributes
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

fn blank() -> (String, Option<CellValue>) {
    (String::new(), None)
}

fn text(value: String) -> (String, Option<CellValue>) {
    (value.clone(), Some(CellValue::Text(value)))
}

fn text_or_blank(value: &str) -> (String, Option<CellValue>) {
    if value.is_empty() {
        blank()
    } else {
        text(value.to_string())
    }
}

/// ワークシートのストリーミングパーサー
///
/// XMLイベントを`on_start_element` / `on_end_element` / `on_characters`で受け取り、
/// 文書順にシンクへ通知します。`parse_xml`を使用すると、quick-xmlのリーダーから
/// イベントを供給できます。
///
/// 1つのインスタンスは1つのワークシートパーツ専用です。複数のシートを解析する場合は、
/// 読み取り専用のストアを共有したまま、シートごとにパーサーを生成してください。
///
/// # 使用例
///
/// ```rust
/// use xlsxstream::{CellRecord, SharedStrings, SheetParserBuilder, SheetSink, StyleTable};
///
/// #[derive(Default)]
/// struct Collect(Vec<String>);
///
/// impl SheetSink for Collect {
///     fn cell(&mut self, cell: CellRecord) {
///         self.0.push(format!("{}={}", cell.reference, cell.string_value));
///     }
/// }
///
/// # fn main() -> Result<(), xlsxstream::XlsxStreamError> {
/// let strings = SharedStrings::from(vec!["Hello".to_string()]);
/// let styles = StyleTable::default();
/// let mut parser = SheetParserBuilder::new(&strings, &styles).build(Collect::default())?;
///
/// parser.on_start_element(None, "row", &[("r", "1")]);
/// parser.on_start_element(None, "c", &[("r", "B1"), ("t", "s")]);
/// parser.on_start_element(None, "v", &[]);
/// parser.on_characters("0");
/// parser.on_end_element(None, "v");
/// parser.on_end_element(None, "c");
/// parser.on_end_element(None, "row");
/// parser.finish();
///
/// assert_eq!(parser.into_sink().0, vec!["A1=", "B1=Hello"]);
/// # Ok(())
/// # }
/// ```
pub struct SheetParser<'a, S: SheetSink> {
    /// 共有文字列ストア
    shared_strings: &'a dyn SharedStringStore,

    /// スタイルストア
    styles: &'a dyn StyleStore,

    /// 未出力のコメント
    comments: CommentQueue,

    /// イベントの通知先
    sink: S,

    /// 数式セルの出力モード
    formula_mode: FormulaMode,

    /// セキュリティ制限
    limits: SecurityLimits,

    /// 数値フォーマッター（書式のパース結果をキャッシュ）
    formatter: NumericFormatter,

    /// 解析状態
    state: ParserState<'a>,
}

impl<'a, S: SheetSink> SheetParser<'a, S> {
    /// 新しいパーサーを生成（`SheetParserBuilder::build`から呼び出される）
    pub(crate) fn new(
        shared_strings: &'a dyn SharedStringStore,
        styles: &'a dyn StyleStore,
        comments: Option<&'a dyn CommentStore>,
        sink: S,
        config: ParserConfig,
    ) -> Self {
        let comments = CommentQueue::new(comments.map(|c| c.all_sorted()).unwrap_or_default());
        debug!("Sheet parser created with {} pending comments", comments.len());

        Self {
            shared_strings,
            styles,
            comments,
            sink,
            formula_mode: config.formula_mode,
            limits: config.limits,
            formatter: NumericFormatter::new(config.date_system, config.date_format),
            state: ParserState::default(),
        }
    }

    /// シンクへの参照
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// シンクへの可変参照
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// パーサーを破棄してシンクを取り出す
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// 要素の開始
    ///
    /// # 引数
    ///
    /// * `namespace` - 要素の名前空間URI（`None`は名前空間なし）
    /// * `name` - 要素のローカル名
    /// * `attributes` - 属性（ローカル名, エスケープ解除済みの値）
    pub fn on_start_element(
        &mut self,
        namespace: Option<&str>,
        name: &str,
        attributes: &[(&str, &str)],
    ) {
        if !is_spreadsheet_namespace(namespace) {
            return;
        }

        match (self.state.phase, name) {
            (_, "dimension") => self.read_dimension(attributes),
            (Phase::Idle | Phase::InRow, "row") => self.start_row(attributes),
            (Phase::InRow, "c") => self.start_cell(attributes),
            (Phase::InCell, "v") => {
                self.state.value_buffer.clear();
                self.state.phase = Phase::CapturingValue;
            }
            (Phase::InCell, "f") => self.start_formula(attributes),
            (Phase::InCell, "is") => {
                self.state.value_buffer.clear();
                self.state.phase = Phase::InInlineString {
                    text_open: false,
                    phonetic: false,
                };
            }
            (Phase::InInlineString { phonetic: false, .. }, "t") => {
                self.state.phase = Phase::InInlineString {
                    text_open: true,
                    phonetic: false,
                };
            }
            (Phase::InInlineString { text_open, .. }, "rPh") => {
                self.state.phase = Phase::InInlineString {
                    text_open,
                    phonetic: true,
                };
            }
            (Phase::Idle, _) => {
                if let Some(tag) = header_footer_tag(name) {
                    self.state.header_footer_buffer.clear();
                    self.state.header_footer_truncated = false;
                    self.state.phase = Phase::InHeaderFooter { tag };
                }
            }
            _ => {}
        }
    }

    /// 要素の終了
    pub fn on_end_element(&mut self, namespace: Option<&str>, name: &str) {
        if !is_spreadsheet_namespace(namespace) {
            return;
        }

        match (self.state.phase, name) {
            (Phase::CapturingValue, "v") => {
                self.resolve_value();
                self.state.phase = Phase::InCell;
            }
            (Phase::CapturingFormula, "f") => self.state.phase = Phase::InCell,
            (Phase::InInlineString { phonetic, .. }, "t") => {
                self.state.phase = Phase::InInlineString {
                    text_open: false,
                    phonetic,
                };
            }
            (Phase::InInlineString { text_open, .. }, "rPh") => {
                self.state.phase = Phase::InInlineString {
                    text_open,
                    phonetic: false,
                };
            }
            (Phase::InInlineString { .. }, "is") => {
                self.resolve_value();
                self.state.phase = Phase::InCell;
            }
            (Phase::InCell, "c") => self.end_cell(),
            (Phase::InRow, "row") => self.end_row(),
            (Phase::Idle, "sheetData") => self.flush_all_comments(),
            (Phase::InHeaderFooter { tag }, _) if name == tag => self.end_header_footer(tag),
            (Phase::Idle, "worksheet") => self.end_sheet(),
            _ => {}
        }
    }

    /// 文字データ
    ///
    /// `v`・`f`・インライン文字列の`t`・ヘッダー/フッター要素の内部でのみ取り込まれます。
    pub fn on_characters(&mut self, text: &str) {
        let max_len = self.limits.max_buffer_len;

        match self.state.phase {
            Phase::CapturingValue
            | Phase::InInlineString {
                text_open: true,
                phonetic: false,
            } => {
                if !append_bounded(&mut self.state.value_buffer, text, max_len) {
                    self.report_cell_truncation();
                }
            }
            Phase::CapturingFormula => {
                if !append_bounded(&mut self.state.formula_buffer, text, max_len) {
                    self.report_cell_truncation();
                }
            }
            Phase::InHeaderFooter { tag } => {
                if !append_bounded(&mut self.state.header_footer_buffer, text, max_len)
                    && !self.state.header_footer_truncated
                {
                    self.state.header_footer_truncated = true;
                    warn!("Text of {} truncated at {} bytes", tag, max_len);
                }
            }
            _ => {}
        }
    }

    /// シートの終了
    ///
    /// 未出力のコメントをすべて出力し、`sheet_end`を通知します。
    /// `worksheet`要素の終了で既に通知済みの場合は何もしません。
    pub fn finish(&mut self) {
        self.end_sheet();
    }

    fn read_dimension(&mut self, attributes: &[(&str, &str)]) {
        let Some(reference) = attribute(attributes, "ref").filter(|r| !r.trim().is_empty()) else {
            return;
        };

        match address::parse_range(reference) {
            Ok(range) => {
                let count = range.column_count().min(self.limits.max_columns);
                debug!("Sheet dimension {} ({} columns)", reference, count);
                self.state.expected_columns = Some(count);
            }
            Err(e) => {
                warn!("Ignoring sheet dimension: {}", e);
                self.state.expected_columns = None;
            }
        }
    }

    fn start_row(&mut self, attributes: &[(&str, &str)]) {
        if self.state.row.is_some() {
            self.end_row();
        }

        let index = attribute(attributes, "r")
            .and_then(|r| self.declared_row_index(r))
            .unwrap_or(self.state.next_row_index);

        // XMLに現れない行のコメントは次の行の前に出力
        self.flush_comments_before(CellAddress::new(index, 0));

        self.state.row = Some(RowState::new(index));
        self.state.phase = Phase::InRow;

        let column_count = self
            .state
            .expected_columns
            .map_or(-1, |count| i32::try_from(count).unwrap_or(i32::MAX));
        self.sink.row_start(index, column_count);
    }

    /// `row`要素の`r`属性（1始まり）を行インデックスに変換
    fn declared_row_index(&self, value: &str) -> Option<u32> {
        match value.trim().parse::<u32>() {
            Ok(number) if number >= 1 && number <= self.limits.max_rows => Some(number - 1),
            _ => {
                warn!(
                    "Invalid row number '{}', using inferred row index {}",
                    value, self.state.next_row_index
                );
                None
            }
        }
    }

    fn start_cell(&mut self, attributes: &[(&str, &str)]) {
        let Some(row) = self.state.row else {
            return;
        };
        let next_column = row.next_column();

        let (column_index, reference, malformed) = match attribute(attributes, "r") {
            Some(r) => match self.locate_cell(r) {
                Ok(address) => (address.col, r.to_string(), false),
                Err(e) => {
                    warn!("{}; treating as column {}", e, next_column);
                    (next_column, r.to_string(), true)
                }
            },
            None => (next_column, address::format(row.index, next_column), false),
        };

        // 推定した列も上限を超えない（超えたセルは出力しない）
        if column_index == next_column {
            if let Err(e) = self.limits.check_coordinate(row.index, next_column) {
                warn!("{}; skipping cell {}", e, reference);
                return;
            }
        }

        let cell_type = CellType::from_attribute(attribute(attributes, "t"));
        let (format_id, format_pattern) = if cell_type == CellType::Number {
            self.resolve_style(attribute(attributes, "s"))
        } else {
            (0, None)
        };

        self.state.value_buffer.clear();
        self.state.formula_buffer.clear();
        self.state.cell = Some(CellState {
            column_index,
            reference,
            malformed,
            cell_type,
            format_id,
            format_pattern,
            shared_formula_use: false,
            resolved: None,
            truncated: false,
        });
        self.state.phase = Phase::InCell;
    }

    fn locate_cell(&self, reference: &str) -> Result<CellAddress, XlsxStreamError> {
        let address = address::parse(reference)?;
        self.limits.check_coordinate(address.row, address.col)?;
        Ok(address)
    }

    /// `s`属性からスタイルを解決（属性がない場合はスタイル0）
    fn resolve_style(&self, style: Option<&str>) -> (u16, Option<&'a str>) {
        let style_id = match style {
            None => 0,
            Some(value) => value.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!("Invalid style index '{}', using style 0", value);
                0
            }),
        };

        let styles: &'a dyn StyleStore = self.styles;
        styles.get(style_id).unwrap_or((0, None))
    }

    fn start_formula(&mut self, attributes: &[(&str, &str)]) {
        let Some(cell) = self.state.cell.as_mut() else {
            return;
        };
        if cell.cell_type == CellType::Number {
            cell.cell_type = CellType::Formula;
        }

        let shared_use =
            attribute(attributes, "t") == Some("shared") && attribute(attributes, "ref").is_none();
        if shared_use {
            cell.shared_formula_use = true;
            if self.formula_mode == FormulaMode::Formula {
                warn!(
                    "{}",
                    XlsxStreamError::UnsupportedSharedFormulaUse {
                        cell: cell.reference.clone()
                    }
                );
            }
            return;
        }

        self.state.formula_buffer.clear();
        self.state.phase = Phase::CapturingFormula;
    }

    fn report_cell_truncation(&mut self) {
        if let Some(cell) = self.state.cell.as_mut() {
            if !cell.truncated {
                cell.truncated = true;
                warn!(
                    "Character data of cell {} truncated at {} bytes",
                    cell.reference, self.limits.max_buffer_len
                );
            }
        }
    }

    /// `v` / `is`要素の終了時にセルの値を確定
    fn resolve_value(&mut self) {
        let Some(mut cell) = self.state.cell.take() else {
            return;
        };
        let raw = std::mem::take(&mut self.state.value_buffer);
        cell.resolved = Some(self.resolve(&cell, &raw));
        self.state.value_buffer = raw;
        self.state.cell = Some(cell);
    }

    fn resolve(&mut self, cell: &CellState<'a>, raw: &str) -> (String, Option<CellValue>) {
        match &cell.cell_type {
            CellType::Boolean => match raw.trim().chars().next() {
                None => blank(),
                Some('0') => ("FALSE".to_string(), Some(CellValue::Bool(false))),
                Some(_) => ("TRUE".to_string(), Some(CellValue::Bool(true))),
            },
            CellType::Error => text(format!("{}{}", ERROR_PREFIX, raw)),
            CellType::InlineString => text(raw.to_string()),
            CellType::SharedStringRef => self.resolve_shared_string(cell, raw),
            CellType::Number => self.resolve_number(cell, raw),
            CellType::Formula => self.resolve_formula(cell, raw),
            CellType::IsoDate => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return blank();
                }
                match self.formatter.format_iso_date(trimmed) {
                    Some((string_value, typed_value)) => (string_value, Some(typed_value)),
                    None => {
                        warn!("Cell {}: invalid ISO 8601 date '{}'", cell.reference, trimmed);
                        text(raw.to_string())
                    }
                }
            }
            CellType::Unknown(t) => {
                warn!(
                    "Cell {}: {}",
                    cell.reference,
                    XlsxStreamError::UnknownCellType(t.clone())
                );
                text(UNKNOWN_MARKER.to_string())
            }
        }
    }

    fn resolve_shared_string(&self, cell: &CellState<'a>, raw: &str) -> (String, Option<CellValue>) {
        let index_text = raw.trim();
        if index_text.is_empty() {
            return blank();
        }

        let lookup = index_text
            .parse::<u32>()
            .map_err(|_| XlsxStreamError::SharedStringIndexParse(index_text.to_string()))
            .and_then(|index| self.shared_strings.get(index));

        match lookup {
            Ok(value) => text(value.to_string()),
            Err(e) => {
                warn!("Cell {}: {}", cell.reference, e);
                text(raw.to_string())
            }
        }
    }

    fn resolve_number(&mut self, cell: &CellState<'a>, raw: &str) -> (String, Option<CellValue>) {
        match self
            .formatter
            .format(raw, cell.format_id, cell.format_pattern)
        {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("Cell {}: {}", cell.reference, e);
                text_or_blank(raw)
            }
        }
    }

    fn resolve_formula(&mut self, cell: &CellState<'a>, raw: &str) -> (String, Option<CellValue>) {
        if self.formula_mode == FormulaMode::Formula {
            return text_or_blank(&self.state.formula_buffer);
        }

        if cell.format_pattern.is_none() {
            return text_or_blank(raw);
        }

        // 文字列結果の数式は数値として解析できない
        match self
            .formatter
            .format(raw, cell.format_id, cell.format_pattern)
        {
            Ok(resolved) => resolved,
            Err(_) => text_or_blank(raw),
        }
    }

    fn end_cell(&mut self) {
        self.state.phase = Phase::InRow;
        let Some(cell) = self.state.cell.take() else {
            return;
        };
        let Some(row) = self.state.row else {
            return;
        };

        let (string_value, typed_value) = match cell.resolved {
            Some(resolved) => resolved,
            // `v`要素のない数式セル
            None if cell.cell_type == CellType::Formula
                && self.formula_mode == FormulaMode::Formula =>
            {
                text_or_blank(&self.state.formula_buffer)
            }
            None => blank(),
        };
        let typed_value = if cell.malformed { None } else { typed_value };

        let next_column = row.next_column();
        self.flush_comments_before(CellAddress::new(
            row.index,
            next_column.min(cell.column_index),
        ));
        self.fill_gap(row.index, next_column, cell.column_index);

        let comment = self
            .comments
            .take_at(CellAddress::new(row.index, cell.column_index));
        self.sink.cell(CellRecord {
            column_index: cell.column_index,
            reference: cell.reference,
            string_value,
            typed_value,
            comment,
        });

        if let Some(row) = self.state.row.as_mut() {
            row.last_emitted = Some(
                row.last_emitted
                    .map_or(cell.column_index, |last| last.max(cell.column_index)),
            );
        }
    }

    fn end_row(&mut self) {
        self.state.phase = Phase::Idle;
        self.state.cell = None;
        let Some(row) = self.state.row.take() else {
            return;
        };

        let next_column = row.next_column();
        self.flush_comments_before(CellAddress::new(row.index, next_column));
        if let Some(expected) = self.state.expected_columns {
            self.fill_gap(row.index, next_column, expected.min(self.limits.max_columns));
        }

        // 行内でセル要素を持たないコメント
        while let Some((address, comment)) = self.comments.pop_through_row(row.index) {
            self.emit_comment_cell(address, comment);
        }

        self.sink.row_end(row.index);
        self.state.next_row_index = row.index.saturating_add(1);
        self.state.last_row_index = Some(
            self.state
                .last_row_index
                .map_or(row.index, |last| last.max(row.index)),
        );
    }

    fn end_header_footer(&mut self, tag: &'static str) {
        self.state.phase = Phase::Idle;
        let text = std::mem::take(&mut self.state.header_footer_buffer);
        if tag.ends_with("Header") {
            self.sink.header(text, tag);
        } else {
            self.sink.footer(text, tag);
        }
    }

    fn end_sheet(&mut self) {
        if self.state.sheet_ended {
            return;
        }
        if self.state.row.is_some() {
            self.end_row();
        }
        self.state.phase = Phase::Idle;
        self.flush_all_comments();

        let row_count = self
            .state
            .last_row_index
            .map_or(0, |last| last.saturating_add(1));
        debug!("Sheet finished with {} rows", row_count);
        self.sink.sheet_end(row_count);
        self.state.sheet_ended = true;
    }

    /// `[from, to)`の列を空セルで埋める（各位置のコメントを添付）
    fn fill_gap(&mut self, row: u32, from: u32, to: u32) {
        for col in from..to {
            let address = CellAddress::new(row, col);
            let comment = self.comments.take_at(address);
            self.sink.cell(CellRecord::empty(address, comment));
        }
    }

    fn flush_comments_before(&mut self, limit: CellAddress) {
        while let Some((address, comment)) = self.comments.pop_before(limit) {
            self.emit_comment_cell(address, comment);
        }
    }

    fn flush_all_comments(&mut self) {
        if self.state.comments_flushed {
            return;
        }
        while let Some((address, comment)) = self.comments.pop_any() {
            self.emit_comment_cell(address, comment);
        }
        self.state.comments_flushed = true;
    }

    fn emit_comment_cell(&mut self, address: CellAddress, comment: Comment) {
        self.sink.cell(CellRecord::empty(address, Some(comment)));
    }
}
