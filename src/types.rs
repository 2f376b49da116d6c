//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::NaiveDateTime;

/// 日付値を文字列化する際のデフォルトパターン
pub(crate) const DEFAULT_DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// セルの型付き値
///
/// `CellRecord::typed_value`に格納されます。
/// 空セルの場合は`CellRecord::typed_value`自体が`None`になります。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CellValue {
    /// 文字列（共有文字列、インライン文字列、エラー値、数式テキストなど）
    Text(String),

    /// 数値（f64）
    Number(f64),

    /// 論理値
    Bool(bool),

    /// 日付・時刻（日付書式が適用された数値セル）
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// 値を文字列として取得
    ///
    /// # 引数
    ///
    /// * `pattern` - 日付値の場合に使用するchrono互換パターン
    ///   （`None`の場合は`%Y-%m-%d %H:%M:%S`）
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxstream::CellValue;
    ///
    /// assert_eq!(CellValue::Bool(true).to_text(None), "true");
    /// assert_eq!(CellValue::Number(1.5).to_text(None), "1.5");
    /// ```
    pub fn to_text(&self, pattern: Option<&str>) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => {
                let pattern = pattern
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .unwrap_or(DEFAULT_DATETIME_PATTERN);
                dt.format(pattern).to_string()
            }
        }
    }
}

/// セル座標（0始まり）
///
/// 行優先で順序付けされます（`(row, col)`の辞書順）。
/// コメントキューのソートと比較はこの順序に従います。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    pub fn to_a1(&self) -> String {
        crate::address::format(self.row, self.col)
    }
}

impl std::fmt::Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// セル範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// 新しい範囲を生成
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// 範囲の列数（`end.col - start.col + 1`）
    ///
    /// 終了列が開始列より小さい場合は1を返します。
    pub fn column_count(&self) -> u32 {
        self.end.col.saturating_sub(self.start.col) + 1
    }
}

/// セルのコメント（ノート）
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Comment {
    /// 作成者（`authors`テーブルから解決）
    pub author: Option<String>,

    /// コメント本文（リッチテキストの全ランを連結したもの）
    pub text: String,
}

impl Comment {
    /// 新しいコメントを生成
    pub fn new(author: Option<String>, text: impl Into<String>) -> Self {
        Self {
            author,
            text: text.into(),
        }
    }
}

/// シンクに渡される1セル分のレコード
///
/// # 不変条件
///
/// - `string_value`は常に存在する（空文字列の場合あり）
/// - `typed_value`が`None`になるのは空セルの場合のみ
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellRecord {
    /// 列インデックス（0始まり）
    pub column_index: u32,

    /// セル座標（A1記法、例: "B3"）
    pub reference: String,

    /// 文字列値
    pub string_value: String,

    /// 型付き値
    pub typed_value: Option<CellValue>,

    /// コメント
    pub comment: Option<Comment>,
}

impl CellRecord {
    /// 空セル（ギャップ埋め・コメントのみのセル）を生成
    pub(crate) fn empty(address: CellAddress, comment: Option<Comment>) -> Self {
        Self {
            column_index: address.col,
            reference: address.to_a1(),
            string_value: String::new(),
            typed_value: None,
            comment,
        }
    }

    /// 値を持たないセルかどうかを判定
    pub fn is_blank(&self) -> bool {
        self.typed_value.is_none() && self.string_value.is_empty()
    }
}

/// `c`要素の`t`属性から決定されるセル型
///
/// `v`/`is`要素の終了時に、取り込んだ文字データの解釈方法を決定します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CellType {
    /// `t="b"`
    Boolean,
    /// `t="e"`
    Error,
    /// `t="inlineStr"`
    InlineString,
    /// `t="s"`
    SharedStringRef,
    /// `t`属性なし、または`t="n"`
    Number,
    /// `t="str"`、または数値セル内の`f`要素
    Formula,
    /// `t="d"`（ISO 8601形式の日付リテラル）
    IsoDate,
    /// 未知の`t`属性
    Unknown(String),
}

impl CellType {
    /// `t`属性の値からセル型を決定
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            None | Some("n") => CellType::Number,
            Some("b") => CellType::Boolean,
            Some("e") => CellType::Error,
            Some("inlineStr") => CellType::InlineString,
            Some("s") => CellType::SharedStringRef,
            Some("str") => CellType::Formula,
            Some("d") => CellType::IsoDate,
            Some(other) => CellType::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_address_ordering() {
        let a1 = CellAddress::new(0, 0);
        let b1 = CellAddress::new(0, 1);
        let a2 = CellAddress::new(1, 0);
        assert!(a1 < b1);
        assert!(b1 < a2);

        let mut list = vec![a2, b1, a1];
        list.sort();
        assert_eq!(list, vec![a1, b1, a2]);
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(11, 27).to_string(), "AB12");
    }

    #[test]
    fn test_range_column_count() {
        let range = CellRange::new(CellAddress::new(0, 1), CellAddress::new(9, 3));
        assert_eq!(range.column_count(), 3);

        let single = CellRange::new(CellAddress::new(0, 0), CellAddress::new(0, 0));
        assert_eq!(single.column_count(), 1);
    }

    #[test]
    fn test_cell_type_from_attribute() {
        assert_eq!(CellType::from_attribute(None), CellType::Number);
        assert_eq!(CellType::from_attribute(Some("n")), CellType::Number);
        assert_eq!(CellType::from_attribute(Some("b")), CellType::Boolean);
        assert_eq!(CellType::from_attribute(Some("e")), CellType::Error);
        assert_eq!(
            CellType::from_attribute(Some("inlineStr")),
            CellType::InlineString
        );
        assert_eq!(
            CellType::from_attribute(Some("s")),
            CellType::SharedStringRef
        );
        assert_eq!(CellType::from_attribute(Some("str")), CellType::Formula);
        assert_eq!(CellType::from_attribute(Some("d")), CellType::IsoDate);
        assert_eq!(
            CellType::from_attribute(Some("zz")),
            CellType::Unknown("zz".to_string())
        );
    }

    #[test]
    fn test_value_to_text() {
        let dt = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(
            CellValue::DateTime(dt).to_text(None),
            "2021-01-01 08:30:00"
        );
        assert_eq!(
            CellValue::DateTime(dt).to_text(Some("%Y/%m/%d")),
            "2021/01/01"
        );
        // 空白のみのパターンはデフォルトにフォールバック
        assert_eq!(
            CellValue::DateTime(dt).to_text(Some("  ")),
            "2021-01-01 08:30:00"
        );
        assert_eq!(CellValue::Text("abc".to_string()).to_text(None), "abc");
    }

    #[test]
    fn test_empty_record() {
        let record = CellRecord::empty(CellAddress::new(2, 3), None);
        assert_eq!(record.column_index, 3);
        assert_eq!(record.reference, "D3");
        assert!(record.is_blank());
    }
}
