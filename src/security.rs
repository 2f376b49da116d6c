//! Security Module
//!
//! ストリーミング解析時のリソース制限を定義するモジュール。
//! 不正な`dimension`やセル参照による巨大なギャップ埋め、
//! 終端のない文字データによるバッファ肥大化を防ぎます。

use crate::error::XlsxStreamError;

/// Excelの最大列数（A..XFD）
pub const MAX_COLUMNS: u32 = 16_384;

/// Excelの最大行数
pub const MAX_ROWS: u32 = 1_048_576;

/// セキュリティ制限
///
/// シートパーサーが受け付ける座標範囲とバッファサイズの上限です。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityLimits {
    /// 列数の上限
    /// デフォルト: 16,384 (XFD)
    pub max_columns: u32,
    /// 行数の上限
    /// デフォルト: 1,048,576
    pub max_rows: u32,
    /// 1セル（または1ヘッダー/フッター）あたりの文字バッファ上限（バイト）
    /// デフォルト: 1MiB (1_048_576 bytes)
    pub max_buffer_len: usize,
}

impl Default for SecurityLimits {
    fn default() -> Self {
        Self {
            max_columns: MAX_COLUMNS,
            max_rows: MAX_ROWS,
            max_buffer_len: 1_048_576,
        }
    }
}

impl SecurityLimits {
    /// 設定値の検証
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - すべての上限が1以上の場合
    /// * `Err(XlsxStreamError::Config)` - 0が指定された場合
    pub(crate) fn validate(&self) -> Result<(), XlsxStreamError> {
        if self.max_columns == 0 || self.max_rows == 0 || self.max_buffer_len == 0 {
            return Err(XlsxStreamError::Config(format!(
                "Security limits must be non-zero: {:?}",
                self
            )));
        }
        Ok(())
    }

    /// 座標が上限内かどうかを検証
    ///
    /// # 引数
    ///
    /// * `row` - 行インデックス（0始まり）
    /// * `col` - 列インデックス（0始まり）
    pub(crate) fn check_coordinate(&self, row: u32, col: u32) -> Result<(), XlsxStreamError> {
        if col >= self.max_columns {
            return Err(XlsxStreamError::SecurityViolation(format!(
                "Column index {} exceeds maximum ({})",
                col, self.max_columns
            )));
        }
        if row >= self.max_rows {
            return Err(XlsxStreamError::SecurityViolation(format!(
                "Row index {} exceeds maximum ({})",
                row, self.max_rows
            )));
        }
        Ok(())
    }
}

/// 上限付きで文字バッファへ追記
///
/// # 戻り値
///
/// * `true` - 追記内容がすべて格納された場合
/// * `false` - 上限に達し、追記内容が切り詰められた場合
pub(crate) fn append_bounded(buffer: &mut String, text: &str, max_len: usize) -> bool {
    let remaining = max_len.saturating_sub(buffer.len());
    if text.len() <= remaining {
        buffer.push_str(text);
        return true;
    }

    // UTF-8の文字境界で切り詰める
    let mut cut = remaining;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    buffer.push_str(&text[..cut]);
    false
}
