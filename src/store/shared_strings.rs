//! Shared String Table
//!
//! `xl/sharedStrings.xml`から構築する共有文字列テーブル。

use std::io::BufRead;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::SharedStringStore;
use crate::error::XlsxStreamError;

/// 共有文字列テーブル
///
/// `si`要素1つにつき1インデックスを割り当てます（空の`si`も含む）。
/// リッチテキストのランは連結され、ふりがな（`rPh`）は除外されます。
///
/// # 使用例
///
/// ```rust
/// use xlsxstream::{SharedStrings, SharedStringStore};
///
/// let xml = r#"<sst><si><t>Hello</t></si><si><r><t>Wor</t></r><r><t>ld</t></r></si></sst>"#;
/// let strings = SharedStrings::from_xml(xml.as_bytes()).unwrap();
/// assert_eq!(strings.get(1).unwrap(), "World");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// `sharedStrings.xml`の内容から構築
    ///
    /// # 戻り値
    ///
    /// * `Ok(Self)` - 構築成功
    /// * `Err(XlsxStreamError::Xml)` - XMLが不正な場合
    pub fn from_xml<R: BufRead>(reader: R) -> Result<Self, XlsxStreamError> {
        let mut reader = Reader::from_reader(reader);
        // xml:space="preserve"の空白を保持する
        reader.trim_text(false);

        let mut buf = Vec::new();
        let mut strings = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match reader.read_event_into(&mut buf).map_err(XlsxStreamError::xml)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" if in_si => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Event::Empty(e) => {
                    if e.local_name().as_ref() == b"si" {
                        strings.push(String::new());
                    }
                }
                Event::Text(e) if in_t => {
                    current.push_str(&e.unescape().map_err(XlsxStreamError::xml)?);
                }
                Event::CData(e) if in_t => {
                    current.push_str(std::str::from_utf8(&e.into_inner())?);
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"t" => in_t = false,
                    b"rPh" => in_phonetic = false,
                    b"si" if in_si => {
                        strings.push(std::mem::take(&mut current));
                        in_si = false;
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        debug!("Loaded {} shared strings", strings.len());
        Ok(Self { strings })
    }

    /// 要素数
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl From<Vec<String>> for SharedStrings {
    fn from(strings: Vec<String>) -> Self {
        Self { strings }
    }
}

impl SharedStringStore for SharedStrings {
    fn get(&self, index: u32) -> Result<&str, XlsxStreamError> {
        self.strings
            .get(index as usize)
            .map(String::as_str)
            .ok_or(XlsxStreamError::UnresolvedSharedStringIndex {
                index,
                len: self.strings.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_rich_text() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
  <si><t>Name</t></si>
  <si><r><rPr><b/></rPr><t>Bold</t></r><r><t xml:space="preserve"> and plain</t></r></si>
  <si><t>A &amp; B</t></si>
</sst>"#;
        let strings = SharedStrings::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(strings.len(), 3);
        assert_eq!(strings.get(0).unwrap(), "Name");
        assert_eq!(strings.get(1).unwrap(), "Bold and plain");
        assert_eq!(strings.get(2).unwrap(), "A & B");
    }

    #[test]
    fn test_empty_items_keep_indices() {
        let xml = r#"<sst><si><t>a</t></si><si/><si><t></t></si><si><t>d</t></si></sst>"#;
        let strings = SharedStrings::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(strings.len(), 4);
        assert_eq!(strings.get(1).unwrap(), "");
        assert_eq!(strings.get(2).unwrap(), "");
        assert_eq!(strings.get(3).unwrap(), "d");
    }

    #[test]
    fn test_phonetic_runs_skipped() {
        let xml = r#"<sst><si><t>東京</t><rPh sb="0" eb="2"><t>トウキョウ</t></rPh><phoneticPr fontId="1"/></si></sst>"#;
        let strings = SharedStrings::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(strings.get(0).unwrap(), "東京");
    }

    #[test]
    fn test_whitespace_preserved() {
        let xml = r#"<sst><si><t xml:space="preserve">  padded  </t></si></sst>"#;
        let strings = SharedStrings::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(strings.get(0).unwrap(), "  padded  ");
    }

    #[test]
    fn test_out_of_range() {
        let strings = SharedStrings::from(vec!["x".to_string()]);
        match strings.get(5) {
            Err(XlsxStreamError::UnresolvedSharedStringIndex { index, len }) => {
                assert_eq!(index, 5);
                assert_eq!(len, 1);
            }
            other => panic!("Expected UnresolvedSharedStringIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<sst><si><t>a</si></sst>"#;
        assert!(matches!(
            SharedStrings::from_xml(xml.as_bytes()),
            Err(XlsxStreamError::Xml(_))
        ));
    }
}
