//! Cell Address Codec
//!
//! A1形式のセル参照文字列（例: "AB12"）と0始まりの`(row, col)`の相互変換。

use crate::error::XlsxStreamError;
use crate::types::{CellAddress, CellRange};

/// セル参照文字列を座標に変換（例: "A1" -> (0, 0)）
///
/// 先頭の英字部分を26進数（A=1）の列番号、末尾の数字部分を10進数の行番号として
/// 解釈し、それぞれ0始まりに変換します。絶対参照記号`$`は無視されます。
///
/// # 戻り値
///
/// * `Ok(CellAddress)` - 解析成功
/// * `Err(XlsxStreamError::MalformedReference)` - 英字部分・数字部分の欠落、
///   順序の誤り、不正な文字、オーバーフロー
///
/// # 使用例
///
/// ```rust
/// use xlsxstream::address;
///
/// let addr = address::parse("AB12").unwrap();
/// assert_eq!((addr.row, addr.col), (11, 27));
/// ```
pub fn parse(reference: &str) -> Result<CellAddress, XlsxStreamError> {
    let malformed = || XlsxStreamError::MalformedReference(reference.to_string());

    let bytes = reference.trim().as_bytes();
    let mut pos = 0;

    if bytes.get(pos) == Some(&b'$') {
        pos += 1;
    }

    // 列部分（A=1, ..., Z=26, AA=27, ...）
    let mut col: u32 = 0;
    let col_start = pos;
    while let Some(&b) = bytes.get(pos) {
        if !b.is_ascii_alphabetic() {
            break;
        }
        let digit = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(digit))
            .ok_or_else(malformed)?;
        pos += 1;
    }
    if pos == col_start {
        return Err(malformed());
    }

    if bytes.get(pos) == Some(&b'$') {
        pos += 1;
    }

    // 行部分（1始まり）
    let row_part = &bytes[pos..];
    if row_part.is_empty() || !row_part.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    let row_str = std::str::from_utf8(row_part).map_err(|_| malformed())?;
    let row: u32 = row_str.parse().map_err(|_| malformed())?;
    if row == 0 {
        return Err(malformed());
    }

    Ok(CellAddress::new(row - 1, col - 1))
}

/// 座標をセル参照文字列に変換（例: (0, 0) -> "A1"）
///
/// ギャップ埋めで空セルの参照を合成する場合に使用します。
pub fn format(row: u32, col: u32) -> String {
    let mut result = column_to_letters(col);
    result.push_str(&(u64::from(row) + 1).to_string());
    result
}

/// 列インデックスを英字に変換（0 -> "A", 25 -> "Z", 26 -> "AA"）
pub fn column_to_letters(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        let remainder = ((n - 1) % 26) as u8;
        letters.push((b'A' + remainder) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// セル範囲文字列を解析（例: "A1:C10"）
///
/// `:`を含まない場合は、開始・終了の両方が同じ単一セルになります。
pub fn parse_range(reference: &str) -> Result<CellRange, XlsxStreamError> {
    match reference.split_once(':') {
        Some((begin, end)) => Ok(CellRange::new(parse(begin)?, parse(end)?)),
        None => {
            let single = parse(reference)?;
            Ok(CellRange::new(single, single))
        }
    }
}
