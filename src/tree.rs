//! Ancestor walks over the host's element tree.
//!
//! The walks are written against [`LayoutTree`] so the same code runs over
//! `web_sys::Element` in the browser and over an in-memory tree in tests.

use crate::geometry::Rect;

/// Read-only view of the element tree.
pub trait LayoutTree {
    type Node: Clone + PartialEq;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// The document body, where scroll-ancestor walks stop.
    fn body(&self) -> Option<Self::Node>;

    fn overflow(&self, node: &Self::Node) -> Overflow;
}

/// A tree that can also resolve element ids and measure elements.
pub trait LayoutHost: LayoutTree {
    fn find(&self, id: &str) -> Option<Self::Node>;

    fn bounding_rect(&self, node: &Self::Node) -> Rect;
}

/// Computed `overflow-x` / `overflow-y` of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overflow {
    pub x: String,
    pub y: String,
}

impl Overflow {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self { x: x.into(), y: y.into() }
    }

    pub fn is_scrollable(&self) -> bool {
        scrolls(&self.x) || scrolls(&self.y)
    }
}

fn scrolls(value: &str) -> bool {
    ["auto", "scroll", "overlay"]
        .iter()
        .any(|kw| value.contains(kw))
}

/// Something whose scroll position moves a node on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget<N> {
    Viewport,
    Element(N),
}

fn push_unique<T: PartialEq>(out: &mut Vec<T>, item: T) {
    if !out.contains(&item) {
        out.push(item);
    }
}

/// Scrollable ancestors of `element` (inclusive, body excluded) plus the viewport.
pub fn scroll_parents<T: LayoutTree>(
    tree: &T,
    element: Option<&T::Node>,
) -> Vec<ScrollTarget<T::Node>> {
    let body = tree.body();
    let mut out = Vec::new();
    let mut cur = element.cloned();
    while let Some(node) = cur {
        if body.as_ref() == Some(&node) {
            break;
        }
        if tree.overflow(&node).is_scrollable() {
            push_unique(&mut out, ScrollTarget::Element(node.clone()));
        }
        cur = tree.parent(&node);
    }
    push_unique(&mut out, ScrollTarget::Viewport);
    out
}

/// Merge two target lists, dropping duplicates and keeping first-seen order.
pub fn union_scroll_targets<N: PartialEq>(
    a: Vec<ScrollTarget<N>>,
    b: Vec<ScrollTarget<N>>,
) -> Vec<ScrollTarget<N>> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    for t in a.into_iter().chain(b) {
        push_unique(&mut out, t);
    }
    out
}

/// Lowest shared ancestor (inclusive) of `a` and `b`, falling back to body.
pub fn lowest_common_ancestor<T: LayoutTree>(
    tree: &T,
    a: Option<&T::Node>,
    b: Option<&T::Node>,
) -> Option<T::Node> {
    let (a, b) = (a?, b?);

    let mut chain = Vec::new();
    let mut cur = Some(a.clone());
    while let Some(node) = cur {
        cur = tree.parent(&node);
        chain.push(node);
    }

    let mut cur = Some(b.clone());
    while let Some(node) = cur {
        if chain.contains(&node) {
            return Some(node);
        }
        cur = tree.parent(&node);
    }
    tree.body()
}

/// Everything one arrow watches for layout changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet<N> {
    /// Elements observed for size changes: start, end and their common ancestor.
    pub resize: Vec<N>,
    pub scroll: Vec<ScrollTarget<N>>,
}

impl<N: Clone + PartialEq> ObservationSet<N> {
    pub fn collect<T>(tree: &T, start: Option<&N>, end: Option<&N>) -> Self
    where
        T: LayoutTree<Node = N>,
    {
        let mut resize = Vec::new();
        let lca = lowest_common_ancestor(tree, start, end);
        for node in [start.cloned(), end.cloned(), lca].into_iter().flatten() {
            push_unique(&mut resize, node);
        }

        let scroll = union_scroll_targets(
            scroll_parents(tree, start),
            scroll_parents(tree, end),
        );

        Self { resize, scroll }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory element tree used by the unit tests.

    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Debug, Clone)]
    struct FakeNode {
        parent: Option<usize>,
        overflow: Overflow,
        rect: Rect,
        attached: bool,
    }

    /// Nodes are indices; index 0 is the body, which hangs off `html` at 1.
    #[derive(Debug, Default)]
    pub struct FakeTree {
        nodes: RefCell<Vec<FakeNode>>,
        by_id: RefCell<HashMap<String, usize>>,
    }

    pub const BODY: usize = 0;
    pub const HTML: usize = 1;

    impl FakeTree {
        pub fn new() -> Self {
            let tree = Self::default();
            tree.nodes.borrow_mut().push(FakeNode {
                parent: Some(HTML),
                overflow: Overflow::default(),
                rect: Rect::default(),
                attached: true,
            });
            tree.nodes.borrow_mut().push(FakeNode {
                parent: None,
                overflow: Overflow::new("auto", "auto"),
                rect: Rect::default(),
                attached: true,
            });
            tree
        }

        pub fn add(&self, parent: usize) -> usize {
            let mut nodes = self.nodes.borrow_mut();
            nodes.push(FakeNode {
                parent: Some(parent),
                overflow: Overflow::new("visible", "visible"),
                rect: Rect::default(),
                attached: true,
            });
            nodes.len() - 1
        }

        pub fn add_with_id(&self, parent: usize, id: &str, rect: Rect) -> usize {
            let idx = self.add(parent);
            self.nodes.borrow_mut()[idx].rect = rect;
            self.by_id.borrow_mut().insert(id.to_owned(), idx);
            idx
        }

        pub fn set_overflow(&self, node: usize, x: &str, y: &str) {
            self.nodes.borrow_mut()[node].overflow = Overflow::new(x, y);
        }

        pub fn set_rect(&self, node: usize, rect: Rect) {
            self.nodes.borrow_mut()[node].rect = rect;
        }

        pub fn detach(&self, node: usize) {
            self.nodes.borrow_mut()[node].attached = false;
        }

        pub fn orphan(&self) -> usize {
            let mut nodes = self.nodes.borrow_mut();
            nodes.push(FakeNode {
                parent: None,
                overflow: Overflow::default(),
                rect: Rect::default(),
                attached: true,
            });
            nodes.len() - 1
        }
    }

    impl LayoutTree for FakeTree {
        type Node = usize;

        fn parent(&self, node: &usize) -> Option<usize> {
            self.nodes.borrow()[*node].parent
        }

        fn body(&self) -> Option<usize> {
            Some(BODY)
        }

        fn overflow(&self, node: &usize) -> Overflow {
            self.nodes.borrow()[*node].overflow.clone()
        }
    }

    impl LayoutHost for FakeTree {
        fn find(&self, id: &str) -> Option<usize> {
            let idx = *self.by_id.borrow().get(id)?;
            self.nodes.borrow()[idx].attached.then_some(idx)
        }

        fn bounding_rect(&self, node: &usize) -> Rect {
            self.nodes.borrow()[*node].rect
        }
    }
}
