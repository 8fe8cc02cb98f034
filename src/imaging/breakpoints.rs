//! Named size constraints WordPress resizes uploads against.
//!
//! | Name | Box | Policy |
//! |---|---|---|
//! | `thumbnail` | 150×150 | zoom crop |
//! | `medium` | 300×300 | scale to fit |
//! | `medium_large` | 768 wide | fixed width, not configurable |
//! | `large` | 1024×1024 | scale to fit |
//! | `1536x1536`, `2048x2048` | | scale to fit, WordPress 5.3+ |
//! | `2560x2560` | | big-image threshold, WordPress 5.3+ |
//!
//! The thumbnail, medium and large boxes are editable in the WordPress media
//! settings, so [`SizeTable`] carries them explicitly. Which extra breakpoints
//! apply depends on the platform version, selected with [`PlatformVersion`].

use serde::{Deserialize, Serialize};

/// Fixed width of the `medium_large` size.
pub const MEDIUM_LARGE_WIDTH: u32 = 768;

/// A maximum width and height that a scaled size must fit within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct BoundingBox {
    pub max_width: u32,
    pub max_height: u32,
}

impl BoundingBox {
    pub const fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

impl From<[u32; 2]> for BoundingBox {
    fn from([w, h]: [u32; 2]) -> Self {
        Self::new(w, h)
    }
}

impl From<BoundingBox> for [u32; 2] {
    fn from(b: BoundingBox) -> Self {
        [b.max_width, b.max_height]
    }
}

/// WordPress release line, deciding which large breakpoints exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformVersion {
    /// Before 5.3: only thumbnail, medium, medium_large and large.
    #[serde(rename = "legacy")]
    Legacy,
    /// 5.3 and later: adds `1536x1536`, `2048x2048` and `2560x2560`.
    #[default]
    #[serde(rename = "5.3")]
    V5_3,
}

impl PlatformVersion {
    /// Extra scale-to-fit boxes this version generates beyond medium and large.
    pub fn extra_breakpoints(self) -> &'static [BoundingBox] {
        const WP_5_3: &[BoundingBox] = &[
            BoundingBox::square(1536),
            BoundingBox::square(2048),
            BoundingBox::square(2560),
        ];
        match self {
            Self::Legacy => &[],
            Self::V5_3 => WP_5_3,
        }
    }
}

/// The full set of size constraints for one platform configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeTable {
    pub platform: PlatformVersion,
    pub medium: BoundingBox,
    pub large: BoundingBox,
    pub thumbnail: BoundingBox,
}

impl Default for SizeTable {
    fn default() -> Self {
        Self {
            platform: PlatformVersion::default(),
            medium: BoundingBox::square(300),
            large: BoundingBox::square(1024),
            thumbnail: BoundingBox::square(150),
        }
    }
}

impl SizeTable {
    /// Scale-to-fit boxes in application order: medium, large, then the
    /// platform's extra breakpoints.
    pub fn scaled_boxes(&self) -> Vec<BoundingBox> {
        let mut boxes = vec![self.medium, self.large];
        boxes.extend_from_slice(self.platform.extra_breakpoints());
        boxes
    }
}
