//! Turn binary segmentation masks into smooth anti-aliased opacity mattes.
//!
//! Segmentation models hand back hard 0/1 masks whose jagged boundary looks
//! pasted-on when composited. This crate refines such a mask in three steps:
//! a morphological open/close pass strips boundary noise, an exact Euclidean
//! distance transform measures how far each background pixel is from the
//! object, and a selectable opacity profile shapes that distance into a soft
//! feather band.
//!
//! # Quick Start
//!
//! ```
//! use feather_matte::{BinaryMask, FeatherConfig, FeatherEngine};
//!
//! let mask = BinaryMask::from_fn(64, 64, |x, y| {
//!     let (dx, dy) = (i64::from(x) - 32, i64::from(y) - 32);
//!     dx * dx + dy * dy <= 400
//! })
//! .unwrap();
//!
//! let engine = FeatherEngine::new();
//! let matte = engine.generate_alpha(&mask, &FeatherConfig::default()).unwrap();
//! assert_eq!(matte.dimensions(), (64, 64));
//! ```
//!
//! # Profiles
//!
//! The opacity ramp is chosen by name from a [`ProfileRegistry`]: `linear`,
//! `exponential`, `cosine`, `sigmoid`, `ease_out_power`, `ease_out_exp`, or
//! `none` for a hard cutout. Custom profiles can be registered on the engine
//! without touching its control flow.
//!
//! ```
//! use feather_matte::{BinaryMask, FeatherConfig, FeatherEngine};
//!
//! let mut engine = FeatherEngine::new();
//! engine.register_profile("quadratic", |t| (1.0 - t) * (1.0 - t));
//!
//! let mut mask = BinaryMask::new(32, 32).unwrap();
//! mask.set(16, 16, true);
//! let config = FeatherConfig {
//!     method: "quadratic".to_string(),
//!     width: 8.0,
//!     clean_radius: 0,
//! };
//! let matte = engine.generate_alpha(&mask, &config).unwrap();
//! assert_eq!(matte.get(16, 16), 1.0);
//! ```

#![deny(missing_docs)]

pub mod distance;
mod engine;
pub mod error;
pub mod mask;
pub mod morphology;
pub mod profile;

pub use engine::{
    default_output_path, is_supported_image, load_mask, save_matte, FeatherConfig, FeatherEngine,
};
pub use error::{Error, Result};
pub use mask::{BinaryMask, OpacityMatte};
pub use profile::{ProfileFn, ProfileRegistry, METHOD_NONE};
