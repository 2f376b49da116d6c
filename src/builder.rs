//! Builder Module
//!
//! Fluent Builder APIを提供し、`SheetParser`インスタンスを段階的に構築する。

use chrono::format::{Item, StrftimeItems};

use crate::api::{DateFormat, DateSystem, FormulaMode};
use crate::error::XlsxStreamError;
use crate::parser::SheetParser;
use crate::security::SecurityLimits;
use crate::sink::SheetSink;
use crate::store::{CommentStore, SharedStringStore, StyleStore};

/// 解析処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ParserConfig {
    /// 数式出力モード
    pub formula_mode: FormulaMode,

    /// 日付システム
    pub date_system: DateSystem,

    /// 日付形式
    pub date_format: DateFormat,

    /// セキュリティ制限
    pub limits: SecurityLimits,
}

/// Fluent Builder APIを提供する構造体
///
/// 読み取り専用のストアを借用し、`SheetParser`を段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use xlsxstream::{FormulaMode, SharedStrings, SheetParserBuilder, StyleTable};
/// # use xlsxstream::{CellRecord, SheetSink};
/// # struct Nop;
/// # impl SheetSink for Nop { fn cell(&mut self, _cell: CellRecord) {} }
///
/// # fn main() -> Result<(), xlsxstream::XlsxStreamError> {
/// let strings = SharedStrings::default();
/// let styles = StyleTable::default();
/// let parser = SheetParserBuilder::new(&strings, &styles)
///     .with_formula_mode(FormulaMode::Formula)
///     .build(Nop)?;
/// # drop(parser);
/// # Ok(())
/// # }
/// ```
pub struct SheetParserBuilder<'a> {
    /// 共有文字列ストア
    shared_strings: &'a dyn SharedStringStore,

    /// スタイルストア
    styles: &'a dyn StyleStore,

    /// コメントストア（任意）
    comments: Option<&'a dyn CommentStore>,

    /// 内部設定（構築中）
    config: ParserConfig,
}

impl<'a> SheetParserBuilder<'a> {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 数式モード: キャッシュ値を出力
    /// - 日付システム: 1900年システム
    /// - 日付形式: 書式から自動導出
    /// - コメント: なし
    /// - セキュリティ制限: `SecurityLimits::default()`
    ///
    /// # 引数
    ///
    /// * `shared_strings` - 共有文字列ストア
    /// * `styles` - スタイルストア
    pub fn new(shared_strings: &'a dyn SharedStringStore, styles: &'a dyn StyleStore) -> Self {
        Self {
            shared_strings,
            styles,
            comments: None,
            config: ParserConfig::default(),
        }
    }

    /// コメントストアを指定する
    ///
    /// 指定したストアのコメントは、対応するセル（または合成された空セル）に
    /// ちょうど1回ずつ添付されます。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxstream::{CommentTable, SharedStrings, SheetParserBuilder, StyleTable};
    ///
    /// let strings = SharedStrings::default();
    /// let styles = StyleTable::default();
    /// let comments = CommentTable::new();
    /// let builder = SheetParserBuilder::new(&strings, &styles).with_comments(&comments);
    /// ```
    pub fn with_comments(mut self, comments: &'a dyn CommentStore) -> Self {
        self.comments = Some(comments);
        self
    }

    /// 数式セルの出力モードを指定する
    ///
    /// # 引数
    ///
    /// * `mode: FormulaMode`: 数式出力モード
    pub fn with_formula_mode(mut self, mode: FormulaMode) -> Self {
        self.config.formula_mode = mode;
        self
    }

    /// 日付システム（エポック）を指定する
    ///
    /// ブックの`workbookPr`要素に`date1904="1"`がある場合は`DateSystem::V1904`を指定します。
    pub fn with_date_system(mut self, system: DateSystem) -> Self {
        self.config.date_system = system;
        self
    }

    /// 日付の出力形式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxstream::{DateFormat, SharedStrings, SheetParserBuilder, StyleTable};
    ///
    /// let strings = SharedStrings::default();
    /// let styles = StyleTable::default();
    /// let builder = SheetParserBuilder::new(&strings, &styles)
    ///     .with_date_format(DateFormat::Custom("%Y/%m/%d".to_string()));
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// セキュリティ制限を指定する
    pub fn with_limits(mut self, limits: SecurityLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// 設定を検証し、`SheetParser`インスタンスを生成する
    ///
    /// # 引数
    ///
    /// * `sink` - イベントの通知先
    ///
    /// # 戻り値
    ///
    /// * `Ok(SheetParser)`: 設定が有効な場合
    /// * `Err(XlsxStreamError::Config)`: カスタム日付形式が空または不正な指定子を含む場合、
    ///   セキュリティ制限に0が指定された場合
    pub fn build<S: SheetSink>(self, sink: S) -> Result<SheetParser<'a, S>, XlsxStreamError> {
        // 1. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            if format_str.trim().is_empty() {
                return Err(XlsxStreamError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(XlsxStreamError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        // 2. セキュリティ制限の検証
        self.config.limits.validate()?;

        // 3. SheetParserインスタンス生成
        Ok(SheetParser::new(
            self.shared_strings,
            self.styles,
            self.comments,
            sink,
            self.config,
        ))
    }
}
