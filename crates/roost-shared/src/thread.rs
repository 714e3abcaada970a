//! Comment-thread construction: a flat, creation-ordered comment list is
//! turned into a rooted forest once per refresh and discarded with the next
//! one. Nodes live in an arena indexed by position; parent/child links are
//! arena indices, so rebuilding never chases pointers and a malformed parent
//! reference can never cycle the walk.

use std::collections::HashMap;

use crate::models::Comment;

#[derive(Debug, Clone)]
pub struct CommentNode {
    pub comment: Comment,
    children: Vec<usize>,
}

impl CommentNode {
    pub fn reply_count(&self) -> usize {
        self.children.len()
    }

    pub fn has_replies(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A rooted forest over one post's comments.
///
/// Roots keep the first-occurrence order of top-level comments in the input;
/// every child list keeps the first-occurrence order of its members. A
/// comment whose parent id is absent from the input stays in the arena but is
/// reachable from no root, which drops it from every walk. That is a defined
/// policy, not an error: malformed input (unresolvable parents, cycles)
/// degrades to unreachable nodes.
#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    arena: Vec<CommentNode>,
    roots: Vec<usize>,
}

impl CommentThread {
    /// Build the forest in O(n): index every comment by id, then attach each
    /// one to its parent in a single left-to-right pass.
    pub fn build(comments: Vec<Comment>) -> Self {
        let mut by_id = HashMap::with_capacity(comments.len());
        let mut arena = Vec::with_capacity(comments.len());

        for comment in comments {
            by_id.insert(comment.id, arena.len());
            arena.push(CommentNode {
                comment,
                children: Vec::new(),
            });
        }

        let mut roots = Vec::new();
        for index in 0..arena.len() {
            match arena[index].comment.parent_comment_id {
                None => roots.push(index),
                Some(parent_id) => {
                    if let Some(&parent) = by_id.get(&parent_id) {
                        arena[parent].children.push(index);
                    }
                }
            }
        }

        Self { arena, roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Comments held in the arena, reachable or not.
    pub fn comment_count(&self) -> usize {
        self.arena.len()
    }

    pub fn node(&self, index: usize) -> &CommentNode {
        &self.arena[index]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn children(&self, index: usize) -> &[usize] {
        &self.arena[index].children
    }

    /// Depth-first walk of the reachable forest, yielding `(index, depth)`
    /// per node in render order. A node for which `collapsed` answers true is
    /// still yielded, but its subtree is left out of the walk entirely rather
    /// than marked hidden.
    pub fn visible_rows<F>(&self, collapsed: F) -> Vec<(usize, usize)>
    where
        F: Fn(&Comment) -> bool,
    {
        let mut rows = Vec::new();
        let mut stack: Vec<(usize, usize)> =
            self.roots.iter().rev().map(|&index| (index, 0)).collect();

        while let Some((index, depth)) = stack.pop() {
            rows.push((index, depth));
            let node = &self.arena[index];
            if node.children.is_empty() || collapsed(&node.comment) {
                continue;
            }
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn comment(id: i64, parent: Option<i64>) -> Comment {
        Comment {
            id,
            post_id: 7,
            user_id: Uuid::nil(),
            author: format!("user-{id}"),
            content: format!("comment {id}"),
            parent_comment_id: parent,
            created_at: Utc::now(),
        }
    }

    fn reachable_ids(thread: &CommentThread) -> Vec<i64> {
        thread
            .visible_rows(|_| false)
            .into_iter()
            .map(|(index, _)| thread.node(index).comment.id)
            .collect()
    }

    #[test]
    fn builds_nested_forest() {
        let thread = CommentThread::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(1)),
            comment(4, Some(2)),
        ]);

        assert_eq!(thread.roots().len(), 1);
        let root = thread.roots()[0];
        assert_eq!(thread.node(root).comment.id, 1);

        let children: Vec<i64> = thread
            .children(root)
            .iter()
            .map(|&i| thread.node(i).comment.id)
            .collect();
        assert_eq!(children, vec![2, 3]);

        let second = thread.children(root)[0];
        let grandchildren: Vec<i64> = thread
            .children(second)
            .iter()
            .map(|&i| thread.node(i).comment.id)
            .collect();
        assert_eq!(grandchildren, vec![4]);
    }

    #[test]
    fn every_comment_reachable_exactly_once() {
        let thread = CommentThread::build(vec![
            comment(10, None),
            comment(11, Some(10)),
            comment(12, None),
            comment(13, Some(11)),
            comment(14, Some(12)),
        ]);

        let mut ids = reachable_ids(&thread);
        ids.sort_unstable();
        assert_eq!(ids, vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn root_and_sibling_order_follows_input() {
        let thread = CommentThread::build(vec![
            comment(5, None),
            comment(3, None),
            comment(9, Some(3)),
            comment(8, None),
            comment(2, Some(3)),
        ]);

        let roots: Vec<i64> = thread
            .roots()
            .iter()
            .map(|&i| thread.node(i).comment.id)
            .collect();
        assert_eq!(roots, vec![5, 3, 8]);

        let depth_first = reachable_ids(&thread);
        assert_eq!(depth_first, vec![5, 3, 9, 2, 8]);
    }

    #[test]
    fn dangling_parent_drops_only_the_orphan() {
        let thread = CommentThread::build(vec![
            comment(1, None),
            comment(2, Some(99)),
            comment(3, Some(1)),
        ]);

        let ids = reachable_ids(&thread);
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn reply_cycle_degrades_to_unreachable() {
        let thread = CommentThread::build(vec![
            comment(1, None),
            comment(2, Some(3)),
            comment(3, Some(2)),
        ]);

        assert_eq!(reachable_ids(&thread), vec![1]);
    }

    #[test]
    fn collapsed_subtree_is_excluded_from_the_walk() {
        let thread = CommentThread::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(4, Some(2)),
            comment(3, None),
        ]);

        let rows = thread.visible_rows(|c| c.id == 2);
        let ids: Vec<i64> = rows
            .iter()
            .map(|&(index, _)| thread.node(index).comment.id)
            .collect();
        // 2 itself stays visible, its subtree does not.
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn walk_reports_depths() {
        let thread = CommentThread::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(4, Some(2)),
            comment(3, Some(1)),
        ]);

        let depths: Vec<(i64, usize)> = thread
            .visible_rows(|_| false)
            .into_iter()
            .map(|(index, depth)| (thread.node(index).comment.id, depth))
            .collect();
        assert_eq!(depths, vec![(1, 0), (2, 1), (4, 2), (3, 1)]);
    }

    #[test]
    fn empty_input_builds_empty_thread() {
        let thread = CommentThread::build(Vec::new());
        assert!(thread.is_empty());
        assert!(thread.visible_rows(|_| false).is_empty());
    }
}
