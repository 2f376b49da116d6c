//! Comment Queue
//!
//! コメントストアから初期化される未出力コメントのキュー。
//! 行優先でソートされ、セル・行末・シート末の3箇所で取り出されます。

use std::collections::VecDeque;

use crate::types::{CellAddress, Comment};

#[derive(Debug, Default)]
pub(crate) struct CommentQueue {
    pending: VecDeque<(CellAddress, Comment)>,
}

impl CommentQueue {
    /// コメント一覧からキューを構築（座標順にソート）
    pub fn new(mut comments: Vec<(CellAddress, Comment)>) -> Self {
        comments.sort_by_key(|(address, _)| *address);
        Self {
            pending: comments.into(),
        }
    }

    /// 先頭が指定座標の場合に取り出す
    pub fn take_at(&mut self, address: CellAddress) -> Option<Comment> {
        match self.pending.front() {
            Some((head, _)) if *head == address => self.pending.pop_front().map(|(_, c)| c),
            _ => None,
        }
    }

    /// 指定座標より前にあるコメントを1件取り出す
    pub fn pop_before(&mut self, address: CellAddress) -> Option<(CellAddress, Comment)> {
        match self.pending.front() {
            Some((head, _)) if *head < address => self.pending.pop_front(),
            _ => None,
        }
    }

    /// 指定行以前のコメントを1件取り出す
    pub fn pop_through_row(&mut self, row: u32) -> Option<(CellAddress, Comment)> {
        match self.pending.front() {
            Some((head, _)) if head.row <= row => self.pending.pop_front(),
            _ => None,
        }
    }

    /// 残りのコメントを1件取り出す
    pub fn pop_any(&mut self) -> Option<(CellAddress, Comment)> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(addresses: &[(u32, u32)]) -> CommentQueue {
        CommentQueue::new(
            addresses
                .iter()
                .map(|&(row, col)| (CellAddress::new(row, col), Comment::new(None, "c")))
                .collect(),
        )
    }

    #[test]
    fn test_sorted_on_construction() {
        let mut q = queue(&[(2, 0), (0, 3), (0, 1)]);
        assert_eq!(q.pop_any().unwrap().0, CellAddress::new(0, 1));
        assert_eq!(q.pop_any().unwrap().0, CellAddress::new(0, 3));
        assert_eq!(q.pop_any().unwrap().0, CellAddress::new(2, 0));
        assert!(q.pop_any().is_none());
    }

    #[test]
    fn test_take_at_only_matches_head() {
        let mut q = queue(&[(0, 1), (0, 2)]);
        assert!(q.take_at(CellAddress::new(0, 2)).is_none());
        assert!(q.take_at(CellAddress::new(0, 1)).is_some());
        assert!(q.take_at(CellAddress::new(0, 2)).is_some());
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn test_pop_before() {
        let mut q = queue(&[(0, 0), (0, 4), (1, 0)]);
        let limit = CellAddress::new(0, 4);
        assert_eq!(q.pop_before(limit).unwrap().0, CellAddress::new(0, 0));
        assert!(q.pop_before(limit).is_none());
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_pop_through_row() {
        let mut q = queue(&[(0, 9), (1, 2), (3, 0)]);
        assert!(q.pop_through_row(1).is_some());
        assert!(q.pop_through_row(1).is_some());
        assert!(q.pop_through_row(1).is_none());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_duplicate_addresses_kept() {
        let mut q = queue(&[(0, 0), (0, 0)]);
        assert_eq!(q.len(), 2);
        assert!(q.take_at(CellAddress::new(0, 0)).is_some());
        assert!(q.pop_before(CellAddress::new(0, 1)).is_some());
    }
}
