//! Public API Types
//!
//! シートパーサーの設定で使用する列挙型を定義するモジュール。

/// 日付の出力形式
///
/// 日付書式が適用された数値セルの`string_value`の生成方法を指定します。
/// `typed_value`には常に`CellValue::DateTime`が格納されます。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DateFormat {
    /// 書式文字列から自動導出（デフォルト）
    ///
    /// 書式文字列に含まれるトークンに応じて次のいずれかを使用します。
    ///
    /// - 年・月・日のみ: `2021-01-01`（`%Y-%m-%d`）
    /// - 時・分・秒のみ: `08:30:00`（`%H:%M:%S`）
    /// - 両方: `2021-01-01 08:30:00`（`%Y-%m-%d %H:%M:%S`）
    #[default]
    Auto,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # フォーマット指定子（主要なもの）
    ///
    /// - `%Y`: 4桁の年（例: 2025）
    /// - `%y`: 2桁の年（例: 25）
    /// - `%m`: 2桁の月（01-12）
    /// - `%d`: 2桁の日（01-31）
    /// - `%H`: 24時間形式の時（00-23）
    /// - `%M`: 分（00-59）
    /// - `%S`: 秒（00-59）
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxstream::{DateFormat, SharedStrings, SheetParserBuilder, StyleTable};
    /// # use xlsxstream::{CellRecord, SheetSink};
    /// # struct Nop;
    /// # impl SheetSink for Nop {
    /// #     fn cell(&mut self, _cell: CellRecord) {}
    /// # }
    ///
    /// # fn main() -> Result<(), xlsxstream::XlsxStreamError> {
    /// let strings = SharedStrings::default();
    /// let styles = StyleTable::default();
    /// let parser = SheetParserBuilder::new(&strings, &styles)
    ///     .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
    ///     .build(Nop)?;
    /// # drop(parser);
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// 数式セルの出力モード
///
/// 数式セル（`f`要素を持つセル、`t="str"`のセル）の値の取り出し方を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum FormulaMode {
    /// キャッシュされた結果値を出力（デフォルト）
    ///
    /// 数式セルの計算結果（`v`要素）を出力します。
    /// 例: `=SUM(A1:A10)` → `100`
    #[default]
    CachedValue,

    /// 数式文字列を出力
    ///
    /// 数式そのもの（`f`要素のテキスト）を出力します。
    /// 例: `=SUM(A1:A10)` → `SUM(A1:A10)`
    ///
    /// 共有数式を参照するだけのセル（`ref`属性のない`t="shared"`）は
    /// 数式テキストを復元できないため、空文字列になります。
    Formula,
}

/// 日付システム（エポック）
///
/// ブックの`workbookPr/@date1904`属性に対応します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DateSystem {
    /// 1900年システム（デフォルト）
    ///
    /// シリアル値1 = 1900-01-01。Excelの1900年うるう年バグと互換の暦で、
    /// シリアル値61以降は1899-12-30起算になります。
    #[default]
    V1900,

    /// 1904年システム（旧Mac版Excel）
    ///
    /// シリアル値0 = 1904-01-01。
    V1904,
}
