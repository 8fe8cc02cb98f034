//! Pure calculation functions for WordPress image sizes.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! WordPress rounds the "traditional" way: exact halves go up, so a height
//! of `520.5` becomes `521`. Binary floats cannot represent most of these
//! quotients exactly, so every division below is carried out on integer
//! numerators and denominators and rounded once at the end.

use super::breakpoints::{BoundingBox, MEDIUM_LARGE_WIDTH, SizeTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width and height of an image, in pixels.
///
/// Ordering is `(width, height)` tuple ordering, which is the order
/// WordPress lists its generated sizes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if both axes are no larger than `bounds`.
    pub fn fits_within(self, bounds: BoundingBox) -> bool {
        self.width <= bounds.max_width && self.height <= bounds.max_height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected WIDTHxHEIGHT with positive integers, got {0:?}")]
pub struct ParseDimensionsError(String);

impl FromStr for Dimensions {
    type Err = ParseDimensionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDimensionsError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width: u32 = w.parse().map_err(|_| err())?;
        let height: u32 = h.parse().map_err(|_| err())?;
        if width == 0 || height == 0 {
            return Err(err());
        }
        Ok(Self { width, height })
    }
}

/// Round `numerator / denominator` half-up.
///
/// # Examples
/// ```
/// # use media_squeeze::imaging::round_half_up;
/// assert_eq!(round_half_up(1, 2), 1); // 0.5
/// assert_eq!(round_half_up(5, 2), 3); // 2.5
/// assert_eq!(round_half_up(1041, 2), 521); // 520.5
/// assert_eq!(round_half_up(499, 1000), 0); // 0.499
/// ```
pub fn round_half_up(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// `round(a * b / c)` for pixel quantities.
fn scaled(a: u32, b: u32, c: u32) -> u32 {
    round_half_up(a as u64 * b as u64, c as u64) as u32
}

/// Scale to a fixed width, deriving the height from the source aspect ratio.
pub fn fix_width(source: Dimensions, fixed_width: u32) -> Dimensions {
    Dimensions::new(fixed_width, scaled(source.height, fixed_width, source.width))
}

/// Scale to a fixed height, deriving the width from the source aspect ratio.
pub fn fix_height(source: Dimensions, fixed_height: u32) -> Dimensions {
    Dimensions::new(scaled(source.width, fixed_height, source.height), fixed_height)
}

/// Shrink `source` to fit inside `bounds`, preserving aspect ratio.
///
/// Returns `None` when the source already fits: WordPress never upscales.
/// Otherwise the axis that overflows its bound by the larger ratio decides
/// the scale, and both components are rounded independently.
pub fn scale_to_fit(source: Dimensions, bounds: BoundingBox) -> Option<Dimensions> {
    if source.fits_within(bounds) {
        return None;
    }

    // sw / max_w >= sh / max_h, cross-multiplied.
    let width_binds = source.width as u64 * bounds.max_height as u64
        >= source.height as u64 * bounds.max_width as u64;

    Some(if width_binds {
        fix_width(source, bounds.max_width)
    } else {
        fix_height(source, bounds.max_height)
    })
}

/// Thumbnail crop target.
///
/// Unlike the other sizes this is a zoom crop, not a proportional resize. No
/// thumbnail is made when the source is smaller than the box on both axes;
/// when it is smaller on one axis, that axis is clamped to the source.
pub fn crop_thumbnail(source: Dimensions, thumbnail: BoundingBox) -> Option<Dimensions> {
    let too_narrow = source.width < thumbnail.max_width;
    let too_short = source.height < thumbnail.max_height;
    if too_narrow && too_short {
        return None;
    }
    Some(Dimensions::new(
        if too_narrow { source.width } else { thumbnail.max_width },
        if too_short { source.height } else { thumbnail.max_height },
    ))
}

/// The sizes WordPress generates for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedSizes {
    /// Scaled sizes, sorted by `(width, height)`. Thumbnail excluded.
    pub sizes: Vec<Dimensions>,
    /// Zoom-cropped thumbnail, if the source is large enough for one.
    pub thumbnail: Option<Dimensions>,
}

impl DerivedSizes {
    /// All sizes including the thumbnail, sorted.
    pub fn combined(&self) -> Vec<Dimensions> {
        let mut all = self.sizes.clone();
        all.extend(self.thumbnail);
        all.sort();
        all
    }
}

/// Compute every size WordPress derives from an upload of `source`.
///
/// Coincidentally equal sizes from different boxes are kept; WordPress keys
/// its sizes by name, so both entries exist on the platform.
///
/// # Examples
/// ```
/// # use media_squeeze::imaging::{Dimensions, SizeTable, derive_sizes};
/// let derived = derive_sizes(Dimensions::new(1080, 424), &SizeTable::default());
/// let sizes: Vec<String> = derived.combined().iter().map(|d| d.to_string()).collect();
/// assert_eq!(sizes, ["150x150", "300x118", "768x302", "1024x402"]);
/// ```
pub fn derive_sizes(source: Dimensions, table: &SizeTable) -> DerivedSizes {
    let mut sizes = Vec::new();

    // medium_large is not configurable in WordPress.
    if source.width > MEDIUM_LARGE_WIDTH {
        sizes.push(fix_width(source, MEDIUM_LARGE_WIDTH));
    }

    let thumbnail = crop_thumbnail(source, table.thumbnail);

    sizes.extend(
        table
            .scaled_boxes()
            .into_iter()
            .filter_map(|bounds| scale_to_fit(source, bounds)),
    );
    sizes.sort();

    DerivedSizes { sizes, thumbnail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::PlatformVersion;

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h)
    }

    fn bbox(w: u32, h: u32) -> BoundingBox {
        BoundingBox::new(w, h)
    }

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn rounds_halves_away_from_zero() {
        assert_eq!(round_half_up(1, 2), 1);
        assert_eq!(round_half_up(3, 2), 2);
        assert_eq!(round_half_up(5, 2), 3);
        assert_eq!(round_half_up(25, 2), 13);
        assert_eq!(round_half_up(203, 2), 102);
    }

    #[test]
    fn rounds_either_side_of_half() {
        assert_eq!(round_half_up(499, 1000), 0);
        assert_eq!(round_half_up(501, 1000), 1);
        assert_eq!(round_half_up(1499, 1000), 1);
        assert_eq!(round_half_up(1501, 1000), 2);
        assert_eq!(round_half_up(2499, 1000), 2);
        assert_eq!(round_half_up(2501, 1000), 3);
        assert_eq!(round_half_up(3499, 1000), 3);
        assert_eq!(round_half_up(3501, 1000), 4);
    }

    #[test]
    fn exact_quotients_are_unchanged() {
        assert_eq!(round_half_up(0, 7), 0);
        assert_eq!(round_half_up(1536, 2), 768);
    }

    // =========================================================================
    // fix_width / fix_height tests
    // =========================================================================

    #[test]
    fn fix_width_rounds_half_up() {
        // 694 * 768 / 1024 = 520.5
        assert_eq!(fix_width(dims(1024, 694), 768), dims(768, 521));
    }

    #[test]
    fn fix_height_derives_width() {
        // 1200 * 300 / 900 = 400
        assert_eq!(fix_height(dims(1200, 900), 300), dims(400, 300));
        // 200 * 300 / 1024 = 58.59
        assert_eq!(fix_height(dims(200, 1024), 300), dims(59, 300));
    }

    // =========================================================================
    // scale_to_fit tests
    // =========================================================================

    #[test]
    fn scale_to_fit_skips_sources_that_fit() {
        assert_eq!(scale_to_fit(dims(300, 300), bbox(300, 300)), None);
        assert_eq!(scale_to_fit(dims(100, 250), bbox(300, 300)), None);
    }

    #[test]
    fn scale_to_fit_width_bound() {
        // 1440 * 300 / 2560 = 168.75
        assert_eq!(scale_to_fit(dims(2560, 1440), bbox(300, 300)), Some(dims(300, 169)));
    }

    #[test]
    fn scale_to_fit_height_bound() {
        // 900 * 1024 / 1080 = 853.33
        assert_eq!(scale_to_fit(dims(900, 1080), bbox(1024, 1024)), Some(dims(853, 1024)));
    }

    #[test]
    fn scale_to_fit_overflow_on_one_axis_only() {
        assert_eq!(scale_to_fit(dims(300, 400), bbox(300, 300)), Some(dims(225, 300)));
    }

    #[test]
    fn scale_to_fit_non_square_box_picks_larger_ratio() {
        // w ratio 2.0, h ratio 2.5 → height binds
        assert_eq!(scale_to_fit(dims(800, 500), bbox(400, 200)), Some(dims(320, 200)));
        // w ratio 4.0, h ratio 2.5 → width binds
        assert_eq!(scale_to_fit(dims(1600, 500), bbox(400, 200)), Some(dims(400, 125)));
    }

    #[test]
    fn scale_to_fit_equal_ratios_hit_box_exactly() {
        assert_eq!(scale_to_fit(dims(2000, 1000), bbox(600, 300)), Some(dims(600, 300)));
    }

    // =========================================================================
    // crop_thumbnail tests
    // =========================================================================

    #[test]
    fn thumbnail_none_when_smaller_on_both_axes() {
        assert_eq!(crop_thumbnail(dims(100, 100), bbox(150, 150)), None);
        assert_eq!(crop_thumbnail(dims(149, 149), bbox(150, 150)), None);
    }

    #[test]
    fn thumbnail_full_box_when_large_enough() {
        assert_eq!(crop_thumbnail(dims(200, 300), bbox(150, 150)), Some(dims(150, 150)));
        assert_eq!(crop_thumbnail(dims(150, 150), bbox(150, 150)), Some(dims(150, 150)));
    }

    #[test]
    fn thumbnail_clamps_short_axis() {
        assert_eq!(crop_thumbnail(dims(768, 100), bbox(150, 150)), Some(dims(150, 100)));
        assert_eq!(crop_thumbnail(dims(100, 768), bbox(150, 150)), Some(dims(100, 150)));
    }

    // =========================================================================
    // derive_sizes tests
    // =========================================================================

    #[test]
    fn derive_tiny_source_yields_nothing() {
        let derived = derive_sizes(dims(100, 100), &SizeTable::default());
        assert!(derived.sizes.is_empty());
        assert_eq!(derived.thumbnail, None);
        assert!(derived.combined().is_empty());
    }

    #[test]
    fn derive_medium_fitting_source_yields_only_thumbnail() {
        let derived = derive_sizes(dims(200, 300), &SizeTable::default());
        assert!(derived.sizes.is_empty());
        assert_eq!(derived.thumbnail, Some(dims(150, 150)));
        assert_eq!(derived.combined(), vec![dims(150, 150)]);
    }

    #[test]
    fn derive_medium_large_threshold_is_strict() {
        let derived = derive_sizes(dims(768, 100), &SizeTable::default());
        assert_eq!(derived.sizes, vec![dims(300, 39)]);
        assert_eq!(derived.combined(), vec![dims(150, 100), dims(300, 39)]);
    }

    #[test]
    fn derive_widescreen_uses_all_breakpoints() {
        let derived = derive_sizes(dims(2560, 1440), &SizeTable::default());
        assert_eq!(
            derived.combined(),
            vec![
                dims(150, 150),
                dims(300, 169),
                dims(768, 432),
                dims(1024, 576),
                dims(1536, 864),
                dims(2048, 1152),
            ]
        );
    }

    #[test]
    fn derive_legacy_platform_omits_large_breakpoints() {
        let table = SizeTable {
            platform: PlatformVersion::Legacy,
            ..SizeTable::default()
        };
        let derived = derive_sizes(dims(2560, 1440), &table);
        assert_eq!(
            derived.sizes,
            vec![dims(300, 169), dims(768, 432), dims(1024, 576)]
        );
    }

    #[test]
    fn derive_honours_custom_boxes() {
        let table = SizeTable {
            medium: bbox(400, 400),
            large: bbox(800, 800),
            thumbnail: bbox(100, 100),
            platform: PlatformVersion::Legacy,
        };
        let derived = derive_sizes(dims(1600, 1200), &table);
        assert_eq!(
            derived.sizes,
            vec![dims(400, 300), dims(768, 576), dims(800, 600)]
        );
        assert_eq!(derived.thumbnail, Some(dims(100, 100)));
    }

    #[test]
    fn derive_keeps_coincident_duplicates() {
        // medium and large boxes configured identically
        let table = SizeTable {
            medium: bbox(500, 500),
            large: bbox(500, 500),
            ..SizeTable::default()
        };
        let derived = derive_sizes(dims(1000, 600), &table);
        assert_eq!(
            derived.sizes,
            vec![dims(500, 300), dims(500, 300), dims(768, 461)]
        );
    }

    #[test]
    fn derived_sizes_never_exceed_source() {
        let table = SizeTable::default();
        for w in (1..3000).step_by(97) {
            for h in (1..3000).step_by(89) {
                let derived = derive_sizes(dims(w, h), &table);
                for size in &derived.sizes {
                    assert!(size.width <= w && size.height <= h, "{size} from {w}x{h}");
                }
                assert!(derived.sizes.windows(2).all(|p| p[0] <= p[1]));
                if w <= 300 && h <= 300 {
                    assert!(derived.sizes.is_empty());
                }
                assert_eq!(derived.thumbnail.is_none(), w < 150 && h < 150);
            }
        }
    }

    // =========================================================================
    // Dimensions parsing / display
    // =========================================================================

    #[test]
    fn dimensions_parse_and_display() {
        let d: Dimensions = "1024x694".parse().unwrap();
        assert_eq!(d, dims(1024, 694));
        assert_eq!(d.to_string(), "1024x694");
        assert_eq!(" 20X30 ".parse::<Dimensions>().unwrap(), dims(20, 30));
    }

    #[test]
    fn dimensions_parse_rejects_garbage() {
        assert!("1024".parse::<Dimensions>().is_err());
        assert!("0x10".parse::<Dimensions>().is_err());
        assert!("axb".parse::<Dimensions>().is_err());
        assert!("photo.png".parse::<Dimensions>().is_err());
    }
}
