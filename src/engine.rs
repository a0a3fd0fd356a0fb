//! Core mask refinement engine.

use std::path::{Path, PathBuf};

use image::GrayImage;

use crate::distance;
use crate::error::{Error, Result};
use crate::mask::{BinaryMask, OpacityMatte};
use crate::morphology;
use crate::profile::{ProfileFn, ProfileRegistry, METHOD_NONE};

/// Configuration for one feathering pass.
///
/// Passed explicitly to every [`FeatherEngine::generate_alpha`] call rather
/// than living in process-wide state, so the engine stays pure and testable.
#[derive(Debug, Clone)]
pub struct FeatherConfig {
    /// Identifier of the opacity profile to apply (see [`ProfileRegistry`]).
    pub method: String,
    /// Feather width in pixels; the ramp runs from the boundary to this
    /// distance. Must be positive and finite.
    pub width: f32,
    /// Radius of the disk element used for boundary cleanup before
    /// feathering. 0 disables cleanup. Independent of `width`.
    pub clean_radius: u32,
}

impl Default for FeatherConfig {
    fn default() -> Self {
        Self {
            method: "ease_out_power".to_string(),
            width: 10.0,
            clean_radius: 4,
        }
    }
}

/// The feathering engine: binary mask in, anti-aliased opacity matte out.
///
/// Create once with [`FeatherEngine::new()`] and reuse across masks; the
/// engine holds only the profile catalog and no per-call state, so a shared
/// reference may serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct FeatherEngine {
    registry: ProfileRegistry,
}

impl FeatherEngine {
    /// Create an engine with the built-in profile family.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over a custom profile catalog.
    #[must_use]
    pub fn with_registry(registry: ProfileRegistry) -> Self {
        Self { registry }
    }

    /// Register an additional opacity profile under `id`.
    pub fn register_profile(&mut self, id: impl Into<String>, profile: ProfileFn) {
        self.registry.register(id, profile);
    }

    /// The profile catalog this engine dispatches on.
    #[must_use]
    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Turn a raw binary mask into an opacity matte.
    ///
    /// The boundary is smoothed by a morphological open/close pass, then
    /// opacity ramps from exactly 1.0 on the object down to exactly 0.0 at
    /// `config.width` pixels out, shaped by the configured profile. The
    /// output always matches the input's dimensions and every value lies in
    /// `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWidth`] for a non-positive or non-finite
    /// width and [`Error::UnknownMethod`] for an unregistered method, both
    /// before any pixel work.
    pub fn generate_alpha(&self, raw: &BinaryMask, config: &FeatherConfig) -> Result<OpacityMatte> {
        if !(config.width.is_finite() && config.width > 0.0) {
            return Err(Error::InvalidWidth(config.width));
        }
        let profile = self.registry.lookup(&config.method)?;

        let cleaned = morphology::clean(raw, config.clean_radius);
        let (width, height) = cleaned.dimensions();

        // Degenerate masks short-circuit before the distance transform.
        if !cleaned.any() {
            return Ok(OpacityMatte::filled(width, height, 0.0));
        }
        if cleaned.all() {
            return Ok(OpacityMatte::filled(width, height, 1.0));
        }

        if config.method == METHOD_NONE {
            return Ok(hard_matte(&cleaned));
        }

        Ok(feather(&cleaned, profile, config.width))
    }
}

/// Cast a mask to a hard 0/1 matte with no ramp.
fn hard_matte(mask: &BinaryMask) -> OpacityMatte {
    let (width, height) = mask.dimensions();
    let mut matte = OpacityMatte::filled(width, height, 0.0);
    for y in 0..height {
        for x in 0..width {
            if mask.get(x, y) {
                matte.set(x, y, 1.0);
            }
        }
    }
    matte
}

/// Apply the profile ramp over the exterior distance field.
///
/// Interior pixels are pinned to exactly 1.0 and pixels at or beyond the
/// feather width to exactly 0.0, regardless of what the profile returns at
/// its endpoints. The sigmoid profile in particular never algebraically
/// reaches 0 or 1; this clamp is what keeps the matte endpoints exact.
fn feather(mask: &BinaryMask, profile: ProfileFn, feather_width: f32) -> OpacityMatte {
    let (width, height) = mask.dimensions();
    let dist = distance::exterior_distance(mask);
    let mut matte = OpacityMatte::filled(width, height, 0.0);

    for y in 0..height {
        for x in 0..width {
            if mask.get(x, y) {
                matte.set(x, y, 1.0);
                continue;
            }
            #[allow(clippy::cast_possible_truncation)]
            let d = dist[(y as usize) * (width as usize) + (x as usize)] as f32;
            if d < feather_width {
                let t = (d / feather_width).clamp(0.0, 1.0);
                matte.set(x, y, profile(t).clamp(0.0, 1.0));
            }
            // At or beyond the band the matte stays exactly 0.0.
        }
    }
    matte
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Load a mask image from disk and threshold it at 0.5.
///
/// # Errors
///
/// Returns an error if the file cannot be decoded or the image is
/// zero-sized.
pub fn load_mask(path: &Path) -> Result<BinaryMask> {
    let img = image::open(path)?.to_luma8();
    BinaryMask::from_gray(&img)
}

/// Save a matte as an 8-bit grayscale image.
///
/// # Errors
///
/// Returns an error if the target format is unsupported or writing fails.
pub fn save_matte(matte: &OpacityMatte, path: &Path) -> Result<()> {
    let format = image::ImageFormat::from_path(path)
        .map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
    match format {
        image::ImageFormat::Png | image::ImageFormat::Bmp => {
            let gray: GrayImage = matte.to_gray();
            gray.save(path)?;
            Ok(())
        }
        _ => Err(Error::UnsupportedFormat(format!("{format:?}"))),
    }
}

/// Generate a default output path from an input path.
///
/// Example: `"mask.png"` becomes `"mask_matte.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_matte.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(method: &str, width: f32, clean_radius: u32) -> FeatherConfig {
        FeatherConfig {
            method: method.to_string(),
            width,
            clean_radius,
        }
    }

    fn center_dot_mask() -> BinaryMask {
        let mut mask = BinaryMask::new(21, 21).unwrap();
        mask.set(10, 10, true);
        mask
    }

    #[test]
    fn default_config_values() {
        let cfg = FeatherConfig::default();
        assert_eq!(cfg.method, "ease_out_power");
        assert!((cfg.width - 10.0).abs() < f32::EPSILON);
        assert_eq!(cfg.clean_radius, 4);
    }

    #[test]
    fn output_shape_matches_input() {
        let engine = FeatherEngine::new();
        let mask = BinaryMask::from_fn(17, 9, |x, _| x < 5).unwrap();
        let matte = engine
            .generate_alpha(&mask, &FeatherConfig::default())
            .unwrap();
        assert_eq!(matte.dimensions(), (17, 9));
    }

    #[test]
    fn all_false_mask_gives_all_zero_matte() {
        // Scenario: 10x10 empty mask, linear, width 10.
        let engine = FeatherEngine::new();
        let mask = BinaryMask::new(10, 10).unwrap();
        let matte = engine
            .generate_alpha(&mask, &config("linear", 10.0, 4))
            .unwrap();
        assert_eq!(matte.dimensions(), (10, 10));
        assert!(matte.as_slice().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn all_true_mask_gives_all_one_matte() {
        let engine = FeatherEngine::new();
        let mask = BinaryMask::from_fn(10, 10, |_, _| true).unwrap();
        for method in ["none", "linear", "sigmoid", "ease_out_exp"] {
            let matte = engine
                .generate_alpha(&mask, &config(method, 10.0, 4))
                .unwrap();
            assert!(
                matte.as_slice().iter().all(|&a| a == 1.0),
                "method {method}"
            );
        }
    }

    #[test]
    fn linear_ramp_hits_half_at_half_width() {
        // Single center pixel, no cleanup, width 10: at distance 5 the
        // linear profile reads 1 - 5/10 = 0.5.
        let engine = FeatherEngine::new();
        let matte = engine
            .generate_alpha(&center_dot_mask(), &config("linear", 10.0, 0))
            .unwrap();
        assert!((matte.get(15, 10) - 0.5).abs() < 1e-3);
        assert!((matte.get(10, 15) - 0.5).abs() < 1e-3);
        assert!((matte.get(13, 14) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn exponential_ramp_is_one_percent_at_band_end() {
        // A pixel at the band cutoff itself is clamped to 0, so probe just
        // inside: distance 9 with width barely above 9 puts t within 1e-5
        // of 1, where alpha is exp(-ln 100) = 0.01.
        let engine = FeatherEngine::new();
        let mut mask = BinaryMask::new(41, 5).unwrap();
        mask.set(20, 2, true);
        let matte = engine
            .generate_alpha(&mask, &config("exponential", 9.0001, 0))
            .unwrap();
        assert!((matte.get(29, 2) - 0.01).abs() < 1e-3);
    }

    #[test]
    fn interior_is_exactly_one_for_every_method() {
        let engine = FeatherEngine::new();
        let mask = BinaryMask::from_fn(31, 31, |x, y| {
            let dx = i64::from(x) - 15;
            let dy = i64::from(y) - 15;
            dx * dx + dy * dy <= 100
        })
        .unwrap();
        for method in engine.registry().method_ids() {
            let matte = engine
                .generate_alpha(&mask, &config(method, 6.0, 2))
                .unwrap();
            assert_eq!(matte.get(15, 15), 1.0, "method {method}");
            assert_eq!(matte.get(12, 15), 1.0, "method {method}");
        }
    }

    #[test]
    fn far_exterior_is_exactly_zero_for_every_method() {
        let engine = FeatherEngine::new();
        let mut mask = BinaryMask::new(41, 41).unwrap();
        mask.set(20, 20, true);
        for method in engine.registry().method_ids() {
            if method == METHOD_NONE {
                continue;
            }
            let matte = engine
                .generate_alpha(&mask, &config(method, 5.0, 0))
                .unwrap();
            // Corner is at distance 20*sqrt(2), far outside the band.
            assert_eq!(matte.get(0, 0), 0.0, "method {method}");
            // Distance exactly equal to the width is already outside.
            assert_eq!(matte.get(25, 20), 0.0, "method {method}");
        }
    }

    #[test]
    fn sigmoid_band_edges_are_clamped_exact() {
        let engine = FeatherEngine::new();
        let mut mask = BinaryMask::new(31, 31).unwrap();
        for y in 13..18 {
            for x in 13..18 {
                mask.set(x, y, true);
            }
        }
        let matte = engine
            .generate_alpha(&mask, &config("sigmoid", 4.0, 0))
            .unwrap();
        // Interior exact 1 even though sigmoid(0) < 1.
        assert_eq!(matte.get(15, 15), 1.0);
        // Just inside the band: strictly between 0 and 1.
        let ramp = matte.get(19, 15);
        assert!(ramp > 0.0 && ramp < 1.0);
        // At and past the cutoff: exact 0 even though sigmoid(1) > 0.
        assert_eq!(matte.get(21, 15), 0.0);
        assert_eq!(matte.get(30, 15), 0.0);
    }

    #[test]
    fn method_none_casts_cleaned_mask() {
        let engine = FeatherEngine::new();
        let mask = BinaryMask::from_fn(20, 20, |x, y| (4..14).contains(&x) && (4..14).contains(&y))
            .unwrap();
        let matte = engine.generate_alpha(&mask, &config("none", 10.0, 2)).unwrap();
        let cleaned = crate::morphology::clean(&mask, 2);
        for y in 0..20 {
            for x in 0..20 {
                let expected = if cleaned.get(x, y) { 1.0 } else { 0.0 };
                assert_eq!(matte.get(x, y), expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn all_values_lie_in_unit_interval() {
        let engine = FeatherEngine::new();
        let mask = BinaryMask::from_fn(25, 25, |x, y| (x / 3 + y / 2) % 2 == 0).unwrap();
        for method in engine.registry().method_ids() {
            let matte = engine
                .generate_alpha(&mask, &config(method, 7.5, 1))
                .unwrap();
            for &a in matte.as_slice() {
                assert!((0.0..=1.0).contains(&a), "method {method}: alpha {a}");
            }
        }
    }

    #[test]
    fn identical_inputs_give_bit_identical_output() {
        let engine = FeatherEngine::new();
        let mask = BinaryMask::from_fn(19, 23, |x, y| (x * 7 + y * 3) % 5 < 2).unwrap();
        let cfg = config("cosine", 6.0, 2);
        let a = engine.generate_alpha(&mask, &cfg).unwrap();
        let b = engine.generate_alpha(&mask, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let engine = FeatherEngine::new();
        let mask = BinaryMask::new(5, 5).unwrap();
        let err = engine
            .generate_alpha(&mask, &config("gaussian", 10.0, 4))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMethod(_)));
    }

    #[test]
    fn non_positive_width_is_rejected() {
        let engine = FeatherEngine::new();
        let mask = BinaryMask::new(5, 5).unwrap();
        for width in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = engine
                .generate_alpha(&mask, &config("linear", width, 4))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidWidth(_)), "width {width}");
        }
    }

    #[test]
    fn registered_profile_is_dispatched() {
        let mut engine = FeatherEngine::new();
        engine.register_profile("half", |_| 0.5);
        let matte = engine
            .generate_alpha(&center_dot_mask(), &config("half", 10.0, 0))
            .unwrap();
        assert_eq!(matte.get(10, 10), 1.0);
        assert!((matte.get(13, 10) - 0.5).abs() < f32::EPSILON);
        assert_eq!(matte.get(0, 0), 0.0);
    }

    #[test]
    fn default_output_path_appends_matte_suffix() {
        let p = default_output_path(Path::new("/tmp/mask.png"));
        assert_eq!(p, PathBuf::from("/tmp/mask_matte.png"));

        let p = default_output_path(Path::new("person.jpg"));
        assert_eq!(p.file_name().unwrap().to_str().unwrap(), "person_matte.png");
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("mask.png")));
        assert!(is_supported_image(Path::new("mask.JPEG")));
        assert!(is_supported_image(Path::new("mask.bmp")));
        assert!(!is_supported_image(Path::new("mask.gif")));
        assert!(!is_supported_image(Path::new("mask")));
    }
}
