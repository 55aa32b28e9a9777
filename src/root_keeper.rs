//! The registry of known roots: an AVL tree ordered on the root spelling.
//!
//! Nodes live in an arena and refer to each other by index, so rotations only
//! relink indices. Slots freed by deletions are handed out again before the
//! arena grows.
use std::cmp::Ordering;
use std::sync::Arc;

use tracing::trace;

use crate::construct::RootNode;

type Link = Option<usize>;

#[derive(Debug)]
struct AvlNode {
    node: Arc<RootNode>,
    height: i32,
    left: Link,
    right: Link,
}

#[derive(Debug, Default)]
pub struct RootKeeper {
    arena: Vec<Option<AvlNode>>,
    released: Vec<usize>,
    top: Link,
    len: usize,
}

impl RootKeeper {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> i32 {
        self.height_of(self.top)
    }

    /// Keeps the node unless a root with the same spelling is already kept.
    pub fn insert(&mut self, node: RootNode) -> bool {
        let key = node.spelling().to_string();
        let mut inserted = false;
        let top = self.top;
        self.top = Some(self.insert_at(top, &key, node, &mut inserted));
        if inserted {
            self.len += 1;
            trace!(root = %key, height = self.height(), "root kept");
        }
        inserted
    }

    pub fn search(&self, spelling: &str) -> Option<Arc<RootNode>> {
        let key = spelling.trim();
        let mut cursor = self.top;
        while let Some(i) = cursor {
            let n = self.slot(i);
            cursor = match key.cmp(n.node.spelling()) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Some(Arc::clone(&n.node)),
            };
        }
        None
    }

    pub fn contains(&self, spelling: &str) -> bool {
        self.search(spelling).is_some()
    }

    pub fn delete(&mut self, spelling: &str) -> bool {
        let key = spelling.trim().to_string();
        let mut removed = false;
        let top = self.top;
        self.top = self.remove_at(top, &key, &mut removed);
        if removed {
            trace!(root = %key, height = self.height(), "root released");
        }
        removed
    }

    /// Spellings in lexicographic order.
    pub fn inorder(&self) -> Vec<String> {
        self.walk().map(|n| n.spelling().to_string()).collect()
    }

    /// Kept nodes in lexicographic order of their spelling.
    pub fn all_nodes(&self) -> Vec<Arc<RootNode>> {
        self.walk().map(Arc::clone).collect()
    }

    /// True when every node's subtrees differ in height by at most one and the
    /// stored heights are accurate.
    pub fn is_balanced(&self) -> bool {
        self.check(self.top).is_some()
    }

    fn walk(&self) -> InOrder<'_> {
        InOrder {
            keeper: self,
            stack: Vec::new(),
            cursor: self.top,
        }
    }

    fn check(&self, link: Link) -> Option<i32> {
        match link {
            None => Some(0),
            Some(i) => {
                let n = self.slot(i);
                let left = self.check(n.left)?;
                let right = self.check(n.right)?;
                let height = 1 + left.max(right);
                if (left - right).abs() <= 1 && height == n.height { Some(height) } else { None }
            }
        }
    }

    // ------------- arena plumbing -------------
    fn slot(&self, i: usize) -> &AvlNode {
        self.arena[i].as_ref().expect("linked slot is occupied")
    }
    fn slot_mut(&mut self, i: usize) -> &mut AvlNode {
        self.arena[i].as_mut().expect("linked slot is occupied")
    }
    fn allocate(&mut self, node: RootNode) -> usize {
        let fresh = AvlNode {
            node: Arc::new(node),
            height: 1,
            left: None,
            right: None,
        };
        match self.released.pop() {
            Some(i) => {
                self.arena[i] = Some(fresh);
                i
            }
            None => {
                self.arena.push(Some(fresh));
                self.arena.len() - 1
            }
        }
    }
    fn release(&mut self, i: usize) {
        self.arena[i] = None;
        self.released.push(i);
        self.len -= 1;
    }
    fn height_of(&self, link: Link) -> i32 {
        link.map_or(0, |i| self.slot(i).height)
    }
    fn balance_of(&self, i: usize) -> i32 {
        let n = self.slot(i);
        self.height_of(n.left) - self.height_of(n.right)
    }
    fn update_height(&mut self, i: usize) {
        let n = self.slot(i);
        let height = 1 + self.height_of(n.left).max(self.height_of(n.right));
        self.slot_mut(i).height = height;
    }

    // ------------- rotations -------------
    fn rotate_right(&mut self, i: usize) -> usize {
        let Some(pivot) = self.slot(i).left else {
            return i;
        };
        let moved = self.slot(pivot).right;
        self.slot_mut(i).left = moved;
        self.slot_mut(pivot).right = Some(i);
        self.update_height(i);
        self.update_height(pivot);
        pivot
    }
    fn rotate_left(&mut self, i: usize) -> usize {
        let Some(pivot) = self.slot(i).right else {
            return i;
        };
        let moved = self.slot(pivot).left;
        self.slot_mut(i).right = moved;
        self.slot_mut(pivot).left = Some(i);
        self.update_height(i);
        self.update_height(pivot);
        pivot
    }
    fn rebalance(&mut self, i: usize) -> usize {
        self.update_height(i);
        let balance = self.balance_of(i);
        if balance > 1 {
            if let Some(left) = self.slot(i).left {
                if self.balance_of(left) < 0 {
                    let rotated = self.rotate_left(left);
                    self.slot_mut(i).left = Some(rotated);
                }
            }
            return self.rotate_right(i);
        }
        if balance < -1 {
            if let Some(right) = self.slot(i).right {
                if self.balance_of(right) > 0 {
                    let rotated = self.rotate_right(right);
                    self.slot_mut(i).right = Some(rotated);
                }
            }
            return self.rotate_left(i);
        }
        i
    }

    // ------------- recursive insert and delete -------------
    fn insert_at(&mut self, link: Link, key: &str, node: RootNode, inserted: &mut bool) -> usize {
        let Some(i) = link else {
            *inserted = true;
            return self.allocate(node);
        };
        match key.cmp(self.slot(i).node.spelling()) {
            Ordering::Less => {
                let left = self.slot(i).left;
                let child = self.insert_at(left, key, node, inserted);
                self.slot_mut(i).left = Some(child);
            }
            Ordering::Greater => {
                let right = self.slot(i).right;
                let child = self.insert_at(right, key, node, inserted);
                self.slot_mut(i).right = Some(child);
            }
            Ordering::Equal => return i,
        }
        self.rebalance(i)
    }

    fn remove_at(&mut self, link: Link, key: &str, removed: &mut bool) -> Link {
        let i = link?;
        match key.cmp(self.slot(i).node.spelling()) {
            Ordering::Less => {
                let left = self.slot(i).left;
                let child = self.remove_at(left, key, removed);
                self.slot_mut(i).left = child;
            }
            Ordering::Greater => {
                let right = self.slot(i).right;
                let child = self.remove_at(right, key, removed);
                self.slot_mut(i).right = child;
            }
            Ordering::Equal => {
                *removed = true;
                let (left, right) = (self.slot(i).left, self.slot(i).right);
                match (left, right) {
                    (None, None) => {
                        self.release(i);
                        return None;
                    }
                    (Some(only), None) | (None, Some(only)) => {
                        self.release(i);
                        return Some(only);
                    }
                    (Some(_), Some(right)) => {
                        // promote the in-order successor, then drop its old position
                        let mut successor = right;
                        while let Some(next) = self.slot(successor).left {
                            successor = next;
                        }
                        let payload = Arc::clone(&self.slot(successor).node);
                        let successor_key = payload.spelling().to_string();
                        self.slot_mut(i).node = payload;
                        let mut ignored = false;
                        let child = self.remove_at(Some(right), &successor_key, &mut ignored);
                        self.slot_mut(i).right = child;
                    }
                }
            }
        }
        Some(self.rebalance(i))
    }
}

struct InOrder<'k> {
    keeper: &'k RootKeeper,
    stack: Vec<usize>,
    cursor: Link,
}

impl<'k> Iterator for InOrder<'k> {
    type Item = &'k Arc<RootNode>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(i) = self.cursor {
            self.stack.push(i);
            self.cursor = self.keeper.slot(i).left;
        }
        let i = self.stack.pop()?;
        let keeper = self.keeper;
        let n = keeper.slot(i);
        self.cursor = n.right;
        Some(&n.node)
    }
}
