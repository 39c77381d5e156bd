//! Primitives for working with geometries.
//!
//! This module contains the core types [`Point`], [`Size`], [`Rectangle`] and [`Margins`],
//! which are what the decoration code uses to reason about window extents.
//!
//! All coordinates are logical, integral and take their reference from the top left
//! corner of the global coordinate space: any increase is an offset to the right or
//! downwards.

/// A type for representing a point on a display or screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// The x coordinate of the point.
    pub x: i32,
    /// The y coordinate of the point.
    pub y: i32,
}

impl Point {
    /// Creates a new Point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A type for representing a 2D rectangular space, without
/// respect to its position on the coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// The width of the size.
    pub width: i32,
    /// The height of the size.
    pub height: i32,
}

impl Size {
    /// Creates a new Size.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Check whether the size has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// A type for representing a 2D rectangular space, anchored to a
/// Point on the coordinate space.
///
/// _Note:_ The Default impl returns Rectangle {0, 0, 0, 0}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rectangle {
    /// The point that the Rectangle is anchored to.
    pub point: Point,
    /// The size of the Rectangle.
    pub size: Size,
}

impl Rectangle {
    /// Constructs a new `Rectangle`.
    ///
    /// Note the order of the dimensions: height comes before width.
    pub fn new(x: i32, y: i32, h: i32, w: i32) -> Self {
        Rectangle {
            point: Point::new(x, y),
            size: Size::new(w, h),
        }
    }

    /// Checks whether the Rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// The x coordinate one past the Rectangle's right edge.
    pub fn right(&self) -> i32 {
        self.point.x + self.size.width
    }

    /// The y coordinate one past the Rectangle's bottom edge.
    pub fn bottom(&self) -> i32 {
        self.point.y + self.size.height
    }

    /// Check whether this Rectangle encloses another Rectangle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use toaru_decor::types::Rectangle;
    ///
    /// let original = Rectangle::new(0, 0, 100, 200);
    ///
    /// let new = Rectangle::new(2, 2, 50, 75);
    ///
    /// assert!(original.contains(&new));
    /// ```
    pub fn contains(&self, other: &Self) -> bool {
        other.point.x >= self.point.x
            && other.point.y >= self.point.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grows the Rectangle outward by `margins` on each side.
    ///
    /// This is the geometry a window occupies once its decoration
    /// is wrapped around the original content area.
    ///
    /// # Example
    ///
    /// ```rust
    /// use toaru_decor::types::{Rectangle, Margins};
    ///
    /// let content = Rectangle::new(100, 100, 300, 400);
    /// let margins = Margins::new(4, 4, 34, 4);
    ///
    /// assert_eq!(content.expand_by_margins(margins), Rectangle::new(96, 66, 338, 408));
    /// ```
    #[must_use]
    pub fn expand_by_margins(&self, margins: Margins) -> Self {
        Rectangle::new(
            self.point.x - margins.left,
            self.point.y - margins.top,
            self.size.height + margins.top + margins.bottom,
            self.size.width + margins.left + margins.right,
        )
    }

    /// Shrinks the Rectangle inward by `margins` on each side.
    ///
    /// This is the inverse of [`expand_by_margins`](Self::expand_by_margins).
    #[must_use]
    pub fn shrink_by_margins(&self, margins: Margins) -> Self {
        Rectangle::new(
            self.point.x + margins.left,
            self.point.y + margins.top,
            self.size.height - margins.top - margins.bottom,
            self.size.width - margins.left - margins.right,
        )
    }

    /// Clamps the Rectangle so that it fits inside `bounds`.
    ///
    /// The size is first reduced so it is no larger than `bounds`, and the
    /// Rectangle is then moved the minimum distance needed to lie entirely
    /// inside `bounds`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use toaru_decor::types::Rectangle;
    ///
    /// let workarea = Rectangle::new(0, 30, 1050, 1920);
    /// let window = Rectangle::new(-10, 10, 200, 300);
    ///
    /// assert_eq!(window.clamp(workarea), Rectangle::new(0, 30, 200, 300));
    /// ```
    #[must_use]
    pub fn clamp(&self, bounds: Rectangle) -> Self {
        let width = self.size.width.min(bounds.size.width);
        let height = self.size.height.min(bounds.size.height);

        let x = self.point.x.clamp(bounds.point.x, bounds.right() - width);
        let y = self.point.y.clamp(bounds.point.y, bounds.bottom() - height);

        Rectangle::new(x, y, height, width)
    }

    /// Splits a Rectangle _horizontally_ into two Rectangles
    /// at a given height.
    ///
    /// Returns (top, bottom), where top has the given height.
    #[must_use]
    pub fn split_at_height(&self, height: i32) -> (Self, Self) {
        let height = height.clamp(0, self.size.height);
        (
            // top
            Rectangle::new(self.point.x, self.point.y, height, self.size.width),
            // bottom
            Rectangle::new(
                self.point.x,
                self.point.y + height,
                self.size.height - height,
                self.size.width,
            ),
        )
    }
}

/// Extra space reserved around a window's content for its decoration.
///
/// The Default impl returns zero margins on all sides, which is what
/// an undecorated window has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Margins {
    /// Space reserved on the left edge.
    pub left: i32,
    /// Space reserved on the right edge.
    pub right: i32,
    /// Space reserved on the top edge (usually titlebar plus border).
    pub top: i32,
    /// Space reserved on the bottom edge.
    pub bottom: i32,
}

impl Margins {
    /// Creates a new set of Margins.
    pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Margins of zero on all sides.
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Whether all sides are zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::zeroed()
    }
}
