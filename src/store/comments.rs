//! Comment Table
//!
//! `xl/commentsN.xml`から構築するコメント（ノート）テーブル。

use std::collections::BTreeMap;
use std::io::BufRead;

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{attribute, parse_id, CommentStore};
use crate::address;
use crate::error::XlsxStreamError;
use crate::types::{CellAddress, Comment};

/// コメントテーブル
///
/// セル座標の行優先順で保持します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentTable {
    comments: BTreeMap<CellAddress, Comment>,
}

impl CommentTable {
    /// 空のコメントテーブルを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// `commentsN.xml`の内容から構築
    ///
    /// 作成者は`authors`テーブルから`authorId`で解決されます。
    /// コメント本文はリッチテキストの全ランを連結したものです。
    /// `ref`属性が不正なコメントは警告を出力して読み飛ばします。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Self)` - 構築成功
    /// * `Err(XlsxStreamError::Xml)` - XMLが不正な場合
    pub fn from_xml<R: BufRead>(reader: R) -> Result<Self, XlsxStreamError> {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(false);

        let mut table = Self::new();
        let mut buf = Vec::new();
        let mut authors: Vec<String> = Vec::new();
        let mut in_author = false;
        let mut in_t = false;
        let mut in_phonetic = false;
        let mut text = String::new();
        // 解析中のコメント（座標と作成者ID）
        let mut current: Option<(Option<CellAddress>, Option<usize>)> = None;

        loop {
            match reader.read_event_into(&mut buf).map_err(XlsxStreamError::xml)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"author" => {
                        in_author = true;
                        text.clear();
                    }
                    b"comment" => {
                        let reference = attribute(&e, b"ref")?.unwrap_or_default();
                        let address = match address::parse(&reference) {
                            Ok(address) => Some(address),
                            Err(err) => {
                                warn!("Skipping comment: {}", err);
                                None
                            }
                        };
                        let author_id = match attribute(&e, b"authorId")? {
                            Some(id) => Some(parse_id::<usize>(&id, "authorId")?),
                            None => None,
                        };
                        current = Some((address, author_id));
                        text.clear();
                    }
                    b"rPh" if current.is_some() => in_phonetic = true,
                    b"t" if current.is_some() && !in_phonetic => in_t = true,
                    _ => {}
                },
                Event::Empty(e) => {
                    if e.local_name().as_ref() == b"author" {
                        authors.push(String::new());
                    }
                }
                Event::Text(e) if in_t || in_author => {
                    text.push_str(&e.unescape().map_err(XlsxStreamError::xml)?);
                }
                Event::CData(e) if in_t || in_author => {
                    text.push_str(std::str::from_utf8(&e.into_inner())?);
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"author" if in_author => {
                        authors.push(std::mem::take(&mut text));
                        in_author = false;
                    }
                    b"t" => in_t = false,
                    b"rPh" => in_phonetic = false,
                    b"comment" => {
                        if let Some((Some(address), author_id)) = current.take() {
                            let author = author_id.and_then(|id| authors.get(id).cloned());
                            table.insert(address, Comment::new(author, std::mem::take(&mut text)));
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        debug!("Loaded {} comments", table.len());
        Ok(table)
    }

    /// コメントを追加（同じ座標は上書き）
    pub fn insert(&mut self, address: CellAddress, comment: Comment) {
        self.comments.insert(address, comment);
    }

    /// コメント数
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

impl CommentStore for CommentTable {
    fn find(&self, address: CellAddress) -> Option<Comment> {
        self.comments.get(&address).cloned()
    }

    fn all_sorted(&self) -> Vec<(CellAddress, Comment)> {
        self.comments
            .iter()
            .map(|(address, comment)| (*address, comment.clone()))
            .collect()
    }
}
