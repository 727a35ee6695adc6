//! Element position and size

use super::DomError;

/// Computed CSS `position` of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// `static`, also used for unknown values
    #[default]
    Static,
    /// `relative`
    Relative,
    /// `absolute`
    Absolute,
    /// `fixed`
    Fixed,
    /// `sticky`
    Sticky,
}

impl Position {
    /// Parse a computed `position` value.
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "relative" => Position::Relative,
            "absolute" => Position::Absolute,
            "fixed" => Position::Fixed,
            "sticky" => Position::Sticky,
            _ => Position::Static,
        }
    }

    /// CSS keyword.
    pub fn as_css(&self) -> &'static str {
        match self {
            Position::Static => "static",
            Position::Relative => "relative",
            Position::Absolute => "absolute",
            Position::Fixed => "fixed",
            Position::Sticky => "sticky",
        }
    }
}

/// Layout box of an element, in CSS pixels.
pub trait LayoutNode: Sized {
    /// `offsetLeft`
    fn offset_left(&self) -> i32;
    /// `offsetTop`
    fn offset_top(&self) -> i32;
    /// `offsetWidth`
    fn offset_width(&self) -> i32;
    /// `offsetHeight`
    fn offset_height(&self) -> i32;
    /// `scrollWidth`
    fn scroll_width(&self) -> i32;
    /// `scrollHeight`
    fn scroll_height(&self) -> i32;
    /// `offsetParent`
    fn offset_parent(&self) -> Option<Self>;
    /// Computed `position`
    fn position(&self) -> Position;

    /// Legacy `x` coordinate, for hosts without `offsetParent`.
    fn legacy_x(&self) -> Option<i32> {
        None
    }

    /// Legacy `y` coordinate, for hosts without `offsetParent`.
    fn legacy_y(&self) -> Option<i32> {
        None
    }
}

fn sum_offsets<N: LayoutNode>(
    node: &N,
    offset: impl Fn(&N) -> i32,
    legacy: impl Fn(&N) -> Option<i32>,
) -> i32 {
    let own = |n: &N| {
        if n.position() == Position::Relative {
            0
        } else {
            offset(n)
        }
    };

    let Some(mut ancestor) = node.offset_parent() else {
        return legacy(node).unwrap_or(0);
    };
    let mut total = own(node);
    loop {
        total += own(&ancestor);
        match ancestor.offset_parent() {
            Some(next) => ancestor = next,
            None => return total,
        }
    }
}

/// Distance of `node` from the left edge of the page.
///
/// Nodes positioned `relative` are skipped; their offsets are already
/// counted by a positioned ancestor.
pub fn find_pos_x<N: LayoutNode>(node: &N) -> i32 {
    sum_offsets(node, N::offset_left, N::legacy_x)
}

/// Distance of `node` from the top of the page.
pub fn find_pos_y<N: LayoutNode>(node: &N) -> i32 {
    sum_offsets(node, N::offset_top, N::legacy_y)
}

/// Height including any content scrolled out of view.
pub fn full_height<N: LayoutNode>(node: &N) -> i32 {
    node.scroll_height().max(node.offset_height())
}

/// Width including any content scrolled out of view.
pub fn full_width<N: LayoutNode>(node: &N) -> i32 {
    node.scroll_width().max(node.offset_width())
}

/// Inline style writes.
pub trait StyleTarget {
    /// Set one inline style property, e.g. `("z-index", "999")`.
    fn set_style_property(&self, name: &str, value: &str) -> Result<(), DomError>;
}

/// z-index given to overlays.
pub const OVERLAY_Z_INDEX: i32 = 999;

/// Where [`overlay_below`] put the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPlacement {
    /// `left` in pixels
    pub left: i32,
    /// `top` in pixels
    pub top: i32,
    /// `z-index`
    pub z_index: i32,
}

/// Place `item` directly below `parent`, on top of anything underneath.
pub fn overlay_below<T, N>(item: &T, parent: &N) -> Result<OverlayPlacement, DomError>
where
    T: StyleTarget,
    N: LayoutNode,
{
    let placement = OverlayPlacement {
        left: find_pos_x(parent),
        top: find_pos_y(parent) + parent.offset_height() + 1,
        z_index: OVERLAY_Z_INDEX,
    };

    item.set_style_property("position", "absolute")?;
    item.set_style_property("left", &format!("{}px", placement.left))?;
    item.set_style_property("top", &format!("{}px", placement.top))?;
    item.set_style_property("z-index", &placement.z_index.to_string())?;
    Ok(placement)
}
