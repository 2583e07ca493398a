//! Page geometry for side-by-side composition.
//!
//! All values are PDF points with the PDF origin at the bottom-left corner
//! of the page. Pages are never scaled: every placement carries the source
//! page's own width and height.
//!
//! ```text
//!  y = height ┌──────────────┬───────────────────────┐
//!             │              │                       │
//!             │    left      │        right          │
//!             │  (wA × hA)   │      (wB × hB)        │
//!             │              ├───────────────────────┘  y = height - hB
//!             │              │
//!  y = 0      └──────────────┘
//!           x = 0          x = wA                x = wA + wB
//! ```

use lopdf::Object;

/// US Letter, used when a page carries no media box at all.
pub const DEFAULT_PAGE_SIZE: PageSize = PageSize::new(612.0, 792.0);

/// Width and height of a page in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A page's `/MediaBox`, normalised so that `llx <= urx` and `lly <= ury`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl MediaBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    /// Parse a four-number PDF array. Returns `None` for anything else.
    pub fn from_array(arr: &[Object]) -> Option<Self> {
        let [x0, y0, x1, y1] = arr else {
            return None;
        };
        Some(Self::new(
            extract_number(x0)?,
            extract_number(y0)?,
            extract_number(x1)?,
            extract_number(y1)?,
        ))
    }

    pub fn size(&self) -> PageSize {
        PageSize::new(self.urx - self.llx, self.ury - self.lly)
    }

    pub fn to_array(self) -> Vec<Object> {
        vec![
            Object::Real(self.llx),
            Object::Real(self.lly),
            Object::Real(self.urx),
            Object::Real(self.ury),
        ]
    }
}

impl Default for MediaBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_PAGE_SIZE.width, DEFAULT_PAGE_SIZE.height)
    }
}

/// Where one source page is drawn on the output page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Empty space between the top of the placed page and the canvas top.
    pub fn top_gap(&self, canvas: PageSize) -> f32 {
        canvas.height - (self.y + self.height)
    }

    /// Empty space below the placed page.
    pub const fn bottom_gap(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Output canvas and the two placements for one page pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairLayout {
    pub canvas: PageSize,
    pub left: Placement,
    pub right: Placement,
}

impl PairLayout {
    /// Lay two pages out next to each other, top-aligned, at native size.
    pub fn side_by_side(left: PageSize, right: PageSize) -> Self {
        let height = left.height.max(right.height);
        let width = left.width + right.width;

        Self {
            canvas: PageSize::new(width, height),
            left: Placement {
                x: 0.0,
                y: height - left.height,
                width: left.width,
                height: left.height,
            },
            right: Placement {
                x: left.width,
                y: height - right.height,
                width: right.width,
                height: right.height,
            },
        }
    }
}

/// Extract numeric value from a PDF object
pub(crate) fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        #[allow(clippy::cast_precision_loss)]
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
