//! Parser State
//!
//! シートパーサーの可変状態。要素ごとの遷移は`Phase`に対する全域関数として
//! `SheetParser`側で記述されます。

use crate::types::{CellType, CellValue};

/// パーサーの局面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// 行・セル・ヘッダー/フッターの外
    Idle,
    /// ヘッダー/フッター要素の内部
    InHeaderFooter { tag: &'static str },
    /// `row`要素の内部（セルの外）
    InRow,
    /// `c`要素の内部
    InCell,
    /// `v`要素の文字データを取り込み中
    CapturingValue,
    /// `f`要素の文字データを取り込み中
    CapturingFormula,
    /// `is`要素の内部
    InInlineString {
        /// `t`要素が開いている
        text_open: bool,
        /// `rPh`（ふりがな）要素の内部
        phonetic: bool,
    },
}

/// 処理中のセル
#[derive(Debug)]
pub(crate) struct CellState<'a> {
    /// 列インデックス
    pub column_index: u32,

    /// 出力するセル参照（`r`属性の値、またはギャップ位置から合成した参照）
    pub reference: String,

    /// `r`属性が不正だった
    pub malformed: bool,

    /// `t`属性から決定したセル型（`f`要素で`Formula`に変わる場合あり）
    pub cell_type: CellType,

    /// 数値書式ID
    pub format_id: u16,

    /// 数値書式文字列
    pub format_pattern: Option<&'a str>,

    /// 共有数式をインデックスのみで参照している
    pub shared_formula_use: bool,

    /// 解決済みの値（`v`/`is`要素の終了時に設定）
    pub resolved: Option<(String, Option<CellValue>)>,

    /// 文字バッファの上限超過を報告済み
    pub truncated: bool,
}

/// 処理中の行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowState {
    /// 行インデックス（0始まり）
    pub index: u32,

    /// 最後に出力したセルの列インデックス
    pub last_emitted: Option<u32>,
}

impl RowState {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            last_emitted: None,
        }
    }

    /// 次に出力すべき列インデックス
    pub fn next_column(&self) -> u32 {
        self.last_emitted.map_or(0, |col| col.saturating_add(1))
    }
}

/// シート全体の解析状態
#[derive(Debug)]
pub(crate) struct ParserState<'a> {
    pub phase: Phase,

    pub row: Option<RowState>,

    pub cell: Option<CellState<'a>>,

    pub value_buffer: String,

    pub formula_buffer: String,

    pub header_footer_buffer: String,

    /// ヘッダー/フッターのバッファ上限超過を報告済み
    pub header_footer_truncated: bool,

    /// `dimension`から求めた列数
    pub expected_columns: Option<u32>,

    /// `r`属性のない行に割り当てる行インデックス
    pub next_row_index: u32,

    /// 最後に終了した行のインデックス
    pub last_row_index: Option<u32>,

    /// コメントキューをすべて出力済み
    pub comments_flushed: bool,

    /// `sheet_end`を通知済み
    pub sheet_ended: bool,
}

impl Default for ParserState<'_> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            row: None,
            cell: None,
            value_buffer: String::new(),
            formula_buffer: String::new(),
            header_footer_buffer: String::new(),
            header_footer_truncated: false,
            expected_columns: None,
            next_row_index: 0,
            last_row_index: None,
            comments_flushed: false,
            sheet_ended: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_column() {
        let mut row = RowState::new(3);
        assert_eq!(row.next_column(), 0);
        row.last_emitted = Some(4);
        assert_eq!(row.next_column(), 5);
    }

    #[test]
    fn test_default_state() {
        let state = ParserState::default();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.row.is_none());
        assert_eq!(state.next_row_index, 0);
        assert!(!state.sheet_ended);
    }
}
