//! Rectangles, anchor directions and the relation picker.

use std::fmt;

/// Fraction of the shorter node height within which two tops count as one row.
pub const SAME_ROW_FACTOR: f64 = 0.6;

/// Axis-aligned bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }
}

/// Edge midpoint (or centroid) of a node an arrow attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorDirection {
    Top,
    Right,
    Bottom,
    Left,
    Center,
}

impl AnchorDirection {
    /// Directions that have a dedicated marker element on the page.
    pub const EDGES: [AnchorDirection; 4] = [
        AnchorDirection::Top,
        AnchorDirection::Right,
        AnchorDirection::Bottom,
        AnchorDirection::Left,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorDirection::Top => "top",
            AnchorDirection::Right => "right",
            AnchorDirection::Bottom => "bottom",
            AnchorDirection::Left => "left",
            AnchorDirection::Center => "center",
        }
    }
}

impl fmt::Display for AnchorDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the renderer should draw the connecting path.
///
/// `Straight` is never chosen by [`pick_relation`] but stays part of the
/// published vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathKind {
    #[default]
    Smooth,
    Straight,
}

impl PathKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PathKind::Smooth => "smooth",
            PathKind::Straight => "straight",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub start: AnchorDirection,
    pub end: AnchorDirection,
    pub path: PathKind,
}

impl Relation {
    const fn smooth(start: AnchorDirection, end: AnchorDirection) -> Self {
        Self { start, end, path: PathKind::Smooth }
    }
}

/// Pick anchors for an arrow from `a` to `b` using [`SAME_ROW_FACTOR`].
pub fn pick_relation(a: &Rect, b: &Rect) -> Relation {
    pick_relation_with(a, b, SAME_ROW_FACTOR)
}

/// Same as [`pick_relation`] with an explicit same-row tolerance factor.
///
/// Pairs whose tops differ by less than `factor * min(height)` are a row and
/// connect side to side; anything else has wrapped and connects vertically.
pub fn pick_relation_with(a: &Rect, b: &Rect, factor: f64) -> Relation {
    use AnchorDirection::*;

    let tolerance = a.height.min(b.height) * factor;
    let same_row = (a.top - b.top).abs() < tolerance;

    if same_row {
        if b.left >= a.left {
            Relation::smooth(Right, Left)
        } else {
            Relation::smooth(Left, Right)
        }
    } else if b.top > a.top {
        Relation::smooth(Bottom, Top)
    } else {
        Relation::smooth(Top, Bottom)
    }
}

/// Element id of the marker for `dir` on the node `base`.
pub fn anchor_id(base: &str, dir: AnchorDirection) -> String {
    match dir {
        AnchorDirection::Center => base.to_owned(),
        _ => format!("{base}--{dir}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use AnchorDirection::*;

    fn node(top: f64, left: f64) -> Rect {
        Rect::new(top, left, 180.0, 180.0)
    }

    #[test]
    fn neighbour_on_same_row_connects_sideways() {
        let rel = pick_relation(&node(100.0, 50.0), &node(110.0, 260.0));
        assert_eq!(rel, Relation { start: Right, end: Left, path: PathKind::Smooth });
    }

    #[test]
    fn wrapped_neighbour_connects_vertically() {
        let rel = pick_relation(&node(100.0, 50.0), &node(400.0, 50.0));
        assert_eq!(rel, Relation { start: Bottom, end: Top, path: PathKind::Smooth });
    }

    #[test]
    fn reversed_directions() {
        let left_of = pick_relation(&node(100.0, 260.0), &node(100.0, 50.0));
        assert_eq!((left_of.start, left_of.end), (Left, Right));

        let above = pick_relation(&node(400.0, 50.0), &node(100.0, 50.0));
        assert_eq!((above.start, above.end), (Top, Bottom));
    }

    #[test]
    fn tolerance_uses_shorter_node() {
        let tall = Rect::new(0.0, 0.0, 100.0, 500.0);
        let short = Rect::new(50.0, 200.0, 100.0, 100.0);
        // 0.6 * 100 = 60 > 50
        assert_eq!(pick_relation(&tall, &short).start, Right);

        let lower = Rect::new(60.0, 200.0, 100.0, 100.0);
        // |0 - 60| is not strictly below 60
        assert_eq!(pick_relation(&tall, &lower).start, Bottom);
    }

    #[test]
    fn identical_rects_pick_right_to_left() {
        let r = node(100.0, 50.0);
        assert_eq!(pick_relation(&r, &r), Relation::smooth(Right, Left));
    }

    #[test]
    fn zero_sized_rects_are_deterministic() {
        let z = Rect::default();
        // zero tolerance, equal tops: not below each other, so top -> bottom
        assert_eq!(pick_relation(&z, &z), Relation::smooth(Top, Bottom));
        let below = Rect::new(10.0, 0.0, 0.0, 0.0);
        assert_eq!(pick_relation(&z, &below), Relation::smooth(Bottom, Top));
    }

    #[test]
    fn custom_factor() {
        let a = node(0.0, 0.0);
        let b = node(100.0, 300.0);
        assert_eq!(pick_relation(&a, &b).start, Right);
        assert_eq!(pick_relation_with(&a, &b, 0.5).start, Bottom);
    }

    #[test]
    fn anchor_ids() {
        assert_eq!(anchor_id("wf-2", Center), "wf-2");
        assert_eq!(anchor_id("wf-2", Right), "wf-2--right");
        assert_eq!(anchor_id("wf-3", Top), "wf-3--top");
    }

    #[test]
    fn path_names() {
        assert_eq!(PathKind::Smooth.to_string(), "smooth");
        assert_eq!(PathKind::Straight.as_str(), "straight");
    }
}
