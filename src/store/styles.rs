//! Style Table
//!
//! `xl/styles.xml`の`numFmts`と`cellXfs`から構築するスタイルテーブル。

use std::collections::HashMap;
use std::io::BufRead;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{attribute, parse_id, StyleStore};
use crate::error::XlsxStreamError;
use crate::format::builtin_format;

/// スタイルテーブル
///
/// セルの`s`属性（`cellXfs`のインデックス）から数値書式IDと書式文字列を解決します。
/// `numFmts`に定義がない書式IDは組み込み書式（0〜49）から解決されます。
///
/// # 使用例
///
/// ```rust
/// use xlsxstream::{StyleStore, StyleTable};
///
/// let xml = r#"<styleSheet>
///   <numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/></numFmts>
///   <cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="164" applyNumberFormat="1"/></cellXfs>
/// </styleSheet>"#;
/// let styles = StyleTable::from_xml(xml.as_bytes()).unwrap();
/// assert_eq!(styles.get(1), Some((164, Some("yyyy-mm-dd"))));
/// assert_eq!(styles.get(0), Some((0, Some("General"))));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    /// 数値書式ID → 書式文字列（`numFmts`で定義されたもの）
    num_formats: HashMap<u16, String>,

    /// `cellXfs`の各要素の数値書式ID
    cell_xfs: Vec<u16>,
}

impl StyleTable {
    /// 空のスタイルテーブルを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// `styles.xml`の内容から構築
    ///
    /// # 戻り値
    ///
    /// * `Ok(Self)` - 構築成功
    /// * `Err(XlsxStreamError::Xml)` - XMLが不正、または書式IDが数値でない場合
    pub fn from_xml<R: BufRead>(reader: R) -> Result<Self, XlsxStreamError> {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);

        let mut table = Self::new();
        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf).map_err(XlsxStreamError::xml)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    _ => table.read_element(&e, in_num_fmts, in_cell_xfs)?,
                },
                // <numFmt .../>や<xf .../>は自己終了要素になることが多い
                Event::Empty(e) => table.read_element(&e, in_num_fmts, in_cell_xfs)?,
                Event::End(e) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        debug!(
            "Loaded {} number formats and {} cell formats",
            table.num_formats.len(),
            table.cell_xfs.len()
        );
        Ok(table)
    }

    /// `numFmt`要素または`xf`要素を読み取る
    fn read_element(
        &mut self,
        element: &BytesStart<'_>,
        in_num_fmts: bool,
        in_cell_xfs: bool,
    ) -> Result<(), XlsxStreamError> {
        match element.local_name().as_ref() {
            b"numFmt" if in_num_fmts => {
                // <numFmt numFmtId="165" formatCode="0.000"/>
                let id = attribute(element, b"numFmtId")?;
                let code = attribute(element, b"formatCode")?;
                if let (Some(id), Some(code)) = (id, code) {
                    self.add_number_format(parse_id(&id, "numFmtId")?, code);
                }
            }
            b"xf" if in_cell_xfs => {
                // <xf numFmtId="165" fontId="0" fillId="0" borderId="0"/>
                let num_fmt_id = match attribute(element, b"numFmtId")? {
                    Some(id) => parse_id(&id, "numFmtId")?,
                    None => 0,
                };
                self.push_cell_format(num_fmt_id);
            }
            _ => {}
        }
        Ok(())
    }

    /// 数値書式を追加（同じIDは上書き）
    pub fn add_number_format(&mut self, id: u16, format_code: impl Into<String>) {
        self.num_formats.insert(id, format_code.into());
    }

    /// セル書式を追加し、そのスタイルID（`s`属性の値）を返す
    pub fn push_cell_format(&mut self, num_fmt_id: u16) -> u32 {
        self.cell_xfs.push(num_fmt_id);
        (self.cell_xfs.len() - 1) as u32
    }

    /// セル書式の数
    pub fn len(&self) -> usize {
        self.cell_xfs.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.cell_xfs.is_empty()
    }
}

impl StyleStore for StyleTable {
    fn get(&self, style_id: u32) -> Option<(u16, Option<&str>)> {
        let num_fmt_id = *self.cell_xfs.get(style_id as usize)?;
        let pattern = self
            .num_formats
            .get(&num_fmt_id)
            .map(String::as_str)
            .or_else(|| builtin_format(num_fmt_id));
        Some((num_fmt_id, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="2">
    <numFmt numFmtId="164" formatCode="yyyy/mm/dd"/>
    <numFmt numFmtId="165" formatCode="&quot;$&quot;#,##0.00"/>
  </numFmts>
  <cellStyleXfs count="1"><xf numFmtId="99"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1">
      <alignment horizontal="center"/>
    </xf>
    <xf numFmtId="165" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
  </cellXfs>
</styleSheet>"#;

    #[test]
    fn test_parse_styles() {
        let styles = StyleTable::from_xml(STYLES_XML.as_bytes()).unwrap();
        // cellStyleXfsのxfは含まれない
        assert_eq!(styles.len(), 4);
        assert_eq!(styles.get(0), Some((0, Some("General"))));
        assert_eq!(styles.get(1), Some((164, Some("yyyy/mm/dd"))));
        assert_eq!(styles.get(2), Some((14, Some("m/d/yy"))));
        assert_eq!(styles.get(3), Some((165, Some("\"$\"#,##0.00"))));
        assert_eq!(styles.get(4), None);
    }

    #[test]
    fn test_unknown_builtin_has_no_pattern() {
        let mut styles = StyleTable::new();
        let id = styles.push_cell_format(30);
        assert_eq!(styles.get(id), Some((30, None)));
    }

    #[test]
    fn test_custom_overrides_builtin() {
        let mut styles = StyleTable::new();
        styles.add_number_format(14, "yyyy-mm-dd");
        let id = styles.push_cell_format(14);
        assert_eq!(styles.get(id), Some((14, Some("yyyy-mm-dd"))));
    }

    #[test]
    fn test_invalid_format_id() {
        let xml = r#"<styleSheet><cellXfs><xf numFmtId="abc"/></cellXfs></styleSheet>"#;
        assert!(matches!(
            StyleTable::from_xml(xml.as_bytes()),
            Err(XlsxStreamError::Xml(_))
        ));
    }
}
