use std::fmt;
use std::mem;

use crate::iter::Iter;

/// Binary tree storage shared by every balancing strategy.
///
/// `M` is the bookkeeping a strategy keeps on each branch (a cached height,
/// a color). All structural queries are written against [`Tree::analysis`],
/// so none of them needs to know which strategy built the tree.
#[derive(Clone, Debug)]
pub enum Tree<T, M> {
    Empty,
    Branch(Box<Branch<T, M>>),
}

#[derive(Clone, Debug)]
pub struct Branch<T, M> {
    pub(crate) left: Tree<T, M>,
    pub(crate) element: T,
    pub(crate) right: Tree<T, M>,
    pub(crate) meta: M,
}

impl<T, M> Branch<T, M> {
    pub fn left(&self) -> &Tree<T, M> {
        &self.left
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn right(&self) -> &Tree<T, M> {
        &self.right
    }

    pub fn meta(&self) -> &M {
        &self.meta
    }
}

impl<T, M> Default for Tree<T, M> {
    fn default() -> Self {
        Tree::Empty
    }
}

impl<T, M> Tree<T, M> {
    pub(crate) fn branch(left: Self, element: T, right: Self, meta: M) -> Self {
        Tree::Branch(Box::new(Branch {
            left,
            element,
            right,
            meta,
        }))
    }

    /// Dispatches on the variant: `branch(left, element, right)` for a branch,
    /// `empty()` for a terminator.
    pub fn analysis<'a, U>(
        &'a self,
        branch: impl FnOnce(&'a Self, &'a T, &'a Self) -> U,
        empty: impl FnOnce() -> U,
    ) -> U {
        match self {
            Tree::Branch(node) => branch(&node.left, &node.element, &node.right),
            Tree::Empty => empty(),
        }
    }

    pub fn as_branch(&self) -> Option<&Branch<T, M>> {
        match self {
            Tree::Branch(node) => Some(&**node),
            Tree::Empty => None,
        }
    }

    pub(crate) fn as_branch_mut(&mut self) -> Option<&mut Branch<T, M>> {
        match self {
            Tree::Branch(node) => Some(&mut **node),
            Tree::Empty => None,
        }
    }

    pub(crate) fn into_branch(self) -> Option<Box<Branch<T, M>>> {
        match self {
            Tree::Branch(node) => Some(node),
            Tree::Empty => None,
        }
    }

    /// Detaches the branch stored here, leaving a terminator behind.
    pub(crate) fn take_branch(&mut self) -> Option<Box<Branch<T, M>>> {
        mem::take(self).into_branch()
    }

    pub fn is_empty(&self) -> bool {
        self.analysis(|_, _, _| false, || true)
    }

    pub fn element(&self) -> Option<&T> {
        self.analysis(|_, element, _| Some(element), || None)
    }

    /// Left subtree, or `None` if this is a terminator or the left child is one.
    pub fn left(&self) -> Option<&Self> {
        self.analysis(|left, _, _| (!left.is_empty()).then_some(left), || None)
    }

    /// Right subtree, or `None` if this is a terminator or the right child is one.
    pub fn right(&self) -> Option<&Self> {
        self.analysis(|_, _, right| (!right.is_empty()).then_some(right), || None)
    }

    /// Number of branches on the longest root-to-terminator path. O(n).
    pub fn height(&self) -> usize {
        self.analysis(|left, _, right| 1 + left.height().max(right.height()), || 0)
    }

    /// `height(right) - height(left)`.
    pub fn balance(&self) -> isize {
        self.analysis(
            |left, _, right| right.height() as isize - left.height() as isize,
            || 0,
        )
    }

    pub fn count(&self) -> usize {
        self.analysis(|left, _, right| left.count() + 1 + right.count(), || 0)
    }

    pub fn preorder(&self, mut visit: impl FnMut(&T)) {
        self.walk_preorder(&mut visit);
    }

    pub fn inorder(&self, mut visit: impl FnMut(&T)) {
        self.walk_inorder(&mut visit);
    }

    pub fn postorder(&self, mut visit: impl FnMut(&T)) {
        self.walk_postorder(&mut visit);
    }

    fn walk_preorder<F: FnMut(&T)>(&self, visit: &mut F) {
        self.analysis(
            |left, element, right| {
                visit(element);
                left.walk_preorder(visit);
                right.walk_preorder(visit);
            },
            || {},
        )
    }

    fn walk_inorder<F: FnMut(&T)>(&self, visit: &mut F) {
        self.analysis(
            |left, element, right| {
                left.walk_inorder(visit);
                visit(element);
                right.walk_inorder(visit);
            },
            || {},
        )
    }

    fn walk_postorder<F: FnMut(&T)>(&self, visit: &mut F) {
        self.analysis(
            |left, element, right| {
                left.walk_postorder(visit);
                right.walk_postorder(visit);
                visit(element);
            },
            || {},
        )
    }

    /// Ascending iterator driven by an explicit stack.
    pub fn iter(&self) -> Iter<'_, T, M> {
        Iter::new(self, None)
    }

    /// Calls `visit` on every subtree along the left spine, terminator
    /// included, and returns that terminator.
    pub fn traverse_leftwards<'a>(&'a self, mut visit: impl FnMut(&'a Self)) -> &'a Self {
        let mut current = self;
        loop {
            visit(current);
            match current.analysis(|left, _, _| Some(left), || None) {
                Some(left) => current = left,
                None => return current,
            }
        }
    }

    pub fn traverse_rightwards<'a>(&'a self, mut visit: impl FnMut(&'a Self)) -> &'a Self {
        let mut current = self;
        loop {
            visit(current);
            match current.analysis(|_, _, right| Some(right), || None) {
                Some(right) => current = right,
                None => return current,
            }
        }
    }

    /// The branch holding the minimum element, or `self` when empty.
    pub fn leftmost_branch(&self) -> &Self {
        let mut found = self;
        self.traverse_leftwards(|tree| {
            if !tree.is_empty() {
                found = tree;
            }
        });
        found
    }

    /// The branch holding the maximum element, or `self` when empty.
    pub fn rightmost_branch(&self) -> &Self {
        let mut found = self;
        self.traverse_rightwards(|tree| {
            if !tree.is_empty() {
                found = tree;
            }
        });
        found
    }

    /// Renders the tree sideways: right subtrees above their parent, left
    /// subtrees below. Subtrees for which `label` returns `None` are skipped.
    pub fn render_with<F>(&self, label: F) -> String
    where
        F: Fn(&Self) -> Option<String>,
    {
        let mut out = String::new();
        self.render_into(&mut out, "", false, &label);
        out
    }

    /// Like the `Display` rendering, but terminators show up as `nil`.
    pub fn render_with_terminators(&self) -> String
    where
        T: fmt::Display,
    {
        self.render_with(|tree| {
            Some(tree.analysis(|_, element, _| element.to_string(), || "nil".to_string()))
        })
    }

    fn render_into<F>(&self, out: &mut String, prefix: &str, is_tail: bool, label: &F)
    where
        F: Fn(&Self) -> Option<String>,
    {
        let Some(text) = label(self) else {
            return;
        };
        let children = self.analysis(|left, _, right| Some((left, right)), || None);
        if let Some((_, right)) = children {
            let indent = if is_tail { "│  " } else { "   " };
            right.render_into(out, &format!("{prefix}{indent}"), false, label);
        }
        out.push_str(prefix);
        out.push_str(if is_tail { "└─ " } else { "┌─ " });
        out.push_str(&text);
        out.push('\n');
        if let Some((left, _)) = children {
            let indent = if is_tail { "   " } else { "│  " };
            left.render_into(out, &format!("{prefix}{indent}"), true, label);
        }
    }

    /// Builds a tree of minimal height from `len` ascending elements.
    ///
    /// `meta` receives the depth of the branch (root at 0) and its finished
    /// subtrees. Every terminator ends up at depth `h - 1` or `h`.
    pub(crate) fn build_balanced<I, F>(elements: &mut I, len: usize, depth: usize, meta: &mut F) -> Self
    where
        I: Iterator<Item = T>,
        F: FnMut(usize, &Self, &Self) -> M,
    {
        if len == 0 {
            return Tree::Empty;
        }
        let left_len = (len - 1) / 2;
        let left = Self::build_balanced(elements, left_len, depth + 1, meta);
        let Some(element) = elements.next() else {
            return left;
        };
        let right = Self::build_balanced(elements, len - 1 - left_len, depth + 1, meta);
        let meta = meta(depth, &left, &right);
        Self::branch(left, element, right, meta)
    }
}

impl<T: fmt::Display, M> fmt::Display for Tree<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|tree| tree.element().map(ToString::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;

    fn leaf(element: i32) -> Tree<i32, ()> {
        Tree::branch(Tree::Empty, element, Tree::Empty, ())
    }

    fn sample() -> Tree<i32, ()> {
        // 4(2(1, 3), 6(_, 7))
        Tree::branch(
            Tree::branch(leaf(1), 2, leaf(3), ()),
            4,
            Tree::branch(Tree::Empty, 6, leaf(7), ()),
            (),
        )
    }

    #[test]
    fn structural_queries() {
        let tree = sample();
        assert_eq!(tree.count(), 6);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.balance(), 0);
        assert_eq!(tree.element(), Some(&4));
        assert_eq!(tree.left().and_then(Tree::element), Some(&2));
        assert!(tree.right().and_then(Tree::left).is_none());
        assert!(Tree::<i32, ()>::Empty.is_empty());
        assert_eq!(Tree::<i32, ()>::Empty.height(), 0);
        assert_eq!(tree.right().map(Tree::balance), Some(1));
    }

    #[test]
    fn traversal_orders() {
        let tree = sample();
        let mut pre = Vec::new();
        let mut ino = Vec::new();
        let mut post = Vec::new();
        tree.preorder(|&e| pre.push(e));
        tree.inorder(|&e| ino.push(e));
        tree.postorder(|&e| post.push(e));
        assert_eq!(pre, [4, 2, 1, 3, 6, 7]);
        assert_eq!(ino, [1, 2, 3, 4, 6, 7]);
        assert_eq!(post, [1, 3, 2, 7, 6, 4]);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), ino);
    }

    #[test]
    fn extreme_branches() {
        let tree = sample();
        assert_eq!(tree.leftmost_branch().element(), Some(&1));
        assert_eq!(tree.rightmost_branch().element(), Some(&7));

        let mut spine = Vec::new();
        let end = tree.traverse_rightwards(|t| spine.push(t.element().copied()));
        assert!(end.is_empty());
        assert_eq!(spine, [Some(4), Some(6), Some(7), None]);

        let empty = Tree::<i32, ()>::Empty;
        assert!(empty.leftmost_branch().is_empty());
    }

    #[test]
    fn renders_sideways() {
        let tree = Tree::branch(leaf(1), 2, leaf(3), ());
        assert_eq!(tree.to_string(), "   ┌─ 3\n┌─ 2\n│  └─ 1\n");
        assert_eq!(Tree::<i32, ()>::Empty.to_string(), "");
        assert_eq!(
            leaf(5).render_with_terminators(),
            "   ┌─ nil\n┌─ 5\n│  └─ nil\n"
        );
    }

    #[test]
    fn build_balanced_is_minimal() {
        for len in 0..64usize {
            let tree: Tree<usize, ()> =
                Tree::build_balanced(&mut (0..len), len, 0, &mut |_, _, _| ());
            let expected = (usize::BITS - len.leading_zeros()) as usize;
            assert_eq!(tree.height(), expected, "len={len}");
            assert_eq!(tree.iter().copied().collect::<Vec<_>>(), (0..len).collect::<Vec<_>>());
        }
    }
}
