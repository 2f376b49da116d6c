//! Read-only Lookup Stores
//!
//! シートパーサーが参照する共有文字列・スタイル・コメントのストア。
//! パーサーは解析中これらを読み取り専用で借用します。
//!
//! 各トレイトにはXMLパーツから構築するインメモリ実装が付属します。
//! アーカイブ（ZIP）からのパーツの取り出しは呼び出し側の責務です。

mod comments;
mod shared_strings;
mod styles;

pub use comments::CommentTable;
pub use shared_strings::SharedStrings;
pub use styles::StyleTable;

use quick_xml::events::BytesStart;

use crate::error::XlsxStreamError;
use crate::types::{CellAddress, Comment};

/// 共有文字列ストア（インデックス → 文字列）
pub trait SharedStringStore {
    /// インデックスから文字列を取得
    ///
    /// # 戻り値
    ///
    /// * `Ok(&str)` - 取得成功
    /// * `Err(XlsxStreamError::UnresolvedSharedStringIndex)` - インデックスが範囲外
    fn get(&self, index: u32) -> Result<&str, XlsxStreamError>;
}

/// スタイルストア（スタイルID → 数値書式）
pub trait StyleStore {
    /// スタイルID（`c`要素の`s`属性）から数値書式IDと書式文字列を取得
    ///
    /// 未知のスタイルIDの場合は`None`を返します。
    fn get(&self, style_id: u32) -> Option<(u16, Option<&str>)>;
}

/// コメントストア（セル座標 → コメント）
pub trait CommentStore {
    /// 指定座標のコメントを取得
    fn find(&self, address: CellAddress) -> Option<Comment>;

    /// すべてのコメントを行優先でソートして取得
    ///
    /// シートパーサーの初期化時に1度だけ呼び出されます。
    fn all_sorted(&self) -> Vec<(CellAddress, Comment)>;
}

/// 要素から属性値を取得（エスケープ解除済み）
pub(crate) fn attribute(
    element: &BytesStart<'_>,
    name: &[u8],
) -> Result<Option<String>, XlsxStreamError> {
    for attr in element.attributes() {
        let attr = attr.map_err(XlsxStreamError::xml)?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(XlsxStreamError::xml)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// 属性値を数値として解析
pub(crate) fn parse_id<T: std::str::FromStr>(
    value: &str,
    what: &str,
) -> Result<T, XlsxStreamError> {
    value
        .trim()
        .parse()
        .map_err(|_| XlsxStreamError::Xml(format!("Invalid {}: '{}'", what, value)))
}
