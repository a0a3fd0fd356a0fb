//! Binary morphology for boundary cleanup.
//!
//! Segmentation masks arrive with single-pixel spikes and notches along the
//! object boundary. An opening (erode then dilate) removes protrusions thinner
//! than the structuring radius; a closing (dilate then erode) with the same
//! element fills notches and pinholes of the same scale. Both use an isotropic
//! disk element so the cleanup has no directional bias.

use crate::mask::BinaryMask;

/// Offsets of a disk structuring element inscribed in a (2r+1)×(2r+1)
/// neighborhood: every `(dx, dy)` with `dx² + dy² <= r²`.
#[must_use]
pub fn disk_offsets(radius: u32) -> Vec<(i64, i64)> {
    let r = i64::from(radius);
    let r2 = r * r;
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

/// Erode `mask` by the given element: a pixel survives only if every
/// in-bounds neighbor under the element is set.
///
/// Out-of-bounds neighbors are ignored, so erosion does not eat into the
/// object at the image frame.
#[must_use]
pub fn erode(mask: &BinaryMask, offsets: &[(i64, i64)]) -> BinaryMask {
    transform(mask, offsets, true)
}

/// Dilate `mask` by the given element: a pixel is set if any in-bounds
/// neighbor under the element is set.
#[must_use]
pub fn dilate(mask: &BinaryMask, offsets: &[(i64, i64)]) -> BinaryMask {
    transform(mask, offsets, false)
}

fn transform(mask: &BinaryMask, offsets: &[(i64, i64)], require_all: bool) -> BinaryMask {
    let (width, height) = mask.dimensions();
    let mut out = mask.clone();
    for y in 0..height {
        for x in 0..width {
            let mut value = require_all;
            for &(dx, dy) in offsets {
                let nx = i64::from(x) + dx;
                let ny = i64::from(y) + dy;
                if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                    continue;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let neighbor = mask.get(nx as u32, ny as u32);
                if require_all {
                    if !neighbor {
                        value = false;
                        break;
                    }
                } else if neighbor {
                    value = true;
                    break;
                }
            }
            out.set(x, y, value);
        }
    }
    out
}

/// Smooth a mask boundary: opening removes outward spikes thinner than
/// `radius`, then closing fills inward notches of the same scale.
///
/// Radius 0 is the identity. All-false and all-true masks pass through
/// unchanged.
#[must_use]
pub fn clean(mask: &BinaryMask, radius: u32) -> BinaryMask {
    if radius == 0 || !mask.any() || mask.all() {
        return mask.clone();
    }
    let element = disk_offsets(radius);
    let opened = dilate(&erode(mask, &element), &element);
    erode(&dilate(&opened, &element), &element)
}
