//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! シートパーサー自身はセル単位のエラーで処理を中断しません。
//! ここで定義するエラーの多くは、パーサー内部でログ出力された後に
//! 安全なテキスト表現へフォールバックします。

use thiserror::Error;

/// xlsxstreamクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io` / `Utf8` / `Xml`: 入力XMLの読み込みや字句解析の失敗（致命的）
/// - `MalformedReference` など: セル単位の回復可能なエラー
/// - `Config`: ビルダーでの設定検証の失敗
/// - `SecurityViolation`: セキュリティ制限への違反
///
/// # 使用例
///
/// ```rust
/// use xlsxstream::XlsxStreamError;
///
/// let error = XlsxStreamError::MalformedReference("1A".to_string());
/// assert!(error.to_string().contains("1A"));
/// ```
#[derive(Error, Debug)]
pub enum XlsxStreamError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// XMLの字句解析エラー（quick-xml由来）
    ///
    /// 開始タグと終了タグの不一致など、構造的に不正なXMLで発生します。
    /// これはシート解析全体を中断する唯一の条件です。
    #[error("XML parse error: {0}")]
    Xml(String),

    /// セル参照（例: "AB12"）を解析できない
    #[error("Malformed cell reference: '{0}'")]
    MalformedReference(String),

    /// 共有文字列インデックスが範囲外
    #[error("Shared string index {index} out of range (table size: {len})")]
    UnresolvedSharedStringIndex {
        /// 要求されたインデックス
        index: u32,
        /// 共有文字列テーブルの要素数
        len: usize,
    },

    /// 共有文字列インデックスが整数として解析できない
    #[error("Shared string index is not an integer: '{0}'")]
    SharedStringIndexParse(String),

    /// 共有数式をインデックスのみで参照するセル（数式テキストは取得不可）
    #[error("Shared formula use without definition at cell {cell}")]
    UnsupportedSharedFormulaUse {
        /// セル座標（A1記法）
        cell: String,
    },

    /// 書式文字列を日付とも数値とも確定できない
    #[error("Ambiguous numeric format: '{0}'")]
    AmbiguousNumericFormat(String),

    /// 未知のセル型（`t`属性）
    #[error("Unknown cell type: '{0}'")]
    UnknownCellType(String),

    /// 数値リテラルの解析エラー
    #[error("Number parse error: '{0}'")]
    NumberParse(String),

    /// シリアル値が日付として表現できない範囲
    #[error("Date serial value out of range: {0}")]
    DateOutOfRange(f64),

    /// 設定の検証に失敗したエラー
    ///
    /// `SheetParserBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust
    /// use xlsxstream::{DateFormat, SharedStrings, SheetParserBuilder, StyleTable, XlsxStreamError};
    /// # use xlsxstream::{CellRecord, SheetSink};
    /// # struct Nop;
    /// # impl SheetSink for Nop { fn cell(&mut self, _cell: CellRecord) {} }
    ///
    /// let strings = SharedStrings::default();
    /// let styles = StyleTable::default();
    /// let result = SheetParserBuilder::new(&strings, &styles)
    ///     .with_date_format(DateFormat::Custom(String::new()))
    ///     .build(Nop);
    ///
    /// assert!(matches!(result, Err(XlsxStreamError::Config(_))));
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl XlsxStreamError {
    /// quick-xmlのエラーを変換するヘルパー
    pub(crate) fn xml<E: std::fmt::Display>(err: E) -> Self {
        XlsxStreamError::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: XlsxStreamError = io_err.into();

        match error {
            XlsxStreamError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_shared_string_index_display() {
        let error = XlsxStreamError::UnresolvedSharedStringIndex { index: 7, len: 3 };
        let msg = error.to_string();
        assert!(msg.contains("7"));
        assert!(msg.contains("3"));
    }

    #[test]
    fn test_unsupported_shared_formula_display() {
        let error = XlsxStreamError::UnsupportedSharedFormulaUse {
            cell: "B5".to_string(),
        };
        assert!(error.to_string().contains("B5"));
    }

    // ?演算子による変換の確認
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn utf8_operation() -> Result<(), XlsxStreamError> {
            let bytes = [0xff_u8, 0xfe];
            let _s = std::str::from_utf8(&bytes)?;
            Ok(())
        }

        match utf8_operation() {
            Err(XlsxStreamError::Utf8(_)) => {}
            _ => panic!("Expected Utf8 error from ? operator"),
        }
    }

    #[test]
    fn test_all_error_formats() {
        assert!(XlsxStreamError::Xml("x".to_string())
            .to_string()
            .starts_with("XML parse error"));
        assert!(XlsxStreamError::Config("x".to_string())
            .to_string()
            .starts_with("Configuration error"));
        assert!(XlsxStreamError::MalformedReference("x".to_string())
            .to_string()
            .starts_with("Malformed cell reference"));
        assert!(XlsxStreamError::UnknownCellType("q".to_string())
            .to_string()
            .starts_with("Unknown cell type"));
        assert!(XlsxStreamError::DateOutOfRange(-1.0)
            .to_string()
            .starts_with("Date serial value out of range"));
    }
}
