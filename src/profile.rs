//! Opacity profile functions and their registry.
//!
//! A profile maps normalized feather distance `t` in `[0, 1]` to opacity:
//! `g(0) = 1` at the object boundary, `g(1) ≈ 0` one feather width out, and
//! `g` never increases in between. The engine clamps the interior to exactly
//! 1.0 and everything past the band to exactly 0.0, so a profile that only
//! approaches those endpoints (sigmoid) is still safe to register.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A pure opacity profile: normalized distance in `[0, 1]` to opacity in
/// `[0, 1]`, non-increasing.
pub type ProfileFn = fn(f32) -> f32;

/// Identifier of the passthrough method: no ramp, the cleaned mask is cast
/// straight to a hard 0/1 matte.
pub const METHOD_NONE: &str = "none";

/// Decay constant shared by the exponential profiles: `ln(100)`, chosen so
/// the ramp ends at 1% opacity.
const DECAY: f32 = 2.0 * std::f32::consts::LN_10;

/// Steepness of the logistic mid-ramp transition.
const SIGMOID_STEEPNESS: f32 = 12.0;

fn linear(t: f32) -> f32 {
    1.0 - t
}

fn exponential(t: f32) -> f32 {
    (-DECAY * t).exp()
}

fn cosine(t: f32) -> f32 {
    0.5 * (1.0 + (std::f32::consts::PI * t).cos())
}

fn sigmoid(t: f32) -> f32 {
    1.0 / (1.0 + (SIGMOID_STEEPNESS * (t - 0.5)).exp())
}

fn ease_out_power(t: f32) -> f32 {
    1.0 - t.powi(3)
}

fn ease_out_exp(t: f32) -> f32 {
    (-DECAY * t.powi(3)).exp()
}

fn passthrough(t: f32) -> f32 {
    t
}

/// Catalog of opacity profiles keyed by method identifier.
///
/// The default registry carries the built-in family below; additional
/// profiles can be registered without touching the engine.
///
/// | id | g(t) |
/// |---|---|
/// | `none` | passthrough (hard 0/1 matte, no ramp) |
/// | `linear` | 1 − t |
/// | `exponential` | exp(−k·t), k = ln 100 |
/// | `cosine` | (1 + cos πt) / 2 |
/// | `sigmoid` | 1 / (1 + exp(12·(t − ½))) |
/// | `ease_out_power` | 1 − t³ |
/// | `ease_out_exp` | exp(−k·t³), k = ln 100 |
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<String, ProfileFn>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        let mut registry = Self {
            profiles: HashMap::new(),
        };
        registry.register(METHOD_NONE, passthrough);
        registry.register("linear", linear);
        registry.register("exponential", exponential);
        registry.register("cosine", cosine);
        registry.register("sigmoid", sigmoid);
        registry.register("ease_out_power", ease_out_power);
        registry.register("ease_out_exp", ease_out_exp);
        registry
    }
}

impl ProfileRegistry {
    /// An empty registry with no profiles at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    /// Register (or replace) a profile under the given identifier.
    pub fn register(&mut self, id: impl Into<String>, profile: ProfileFn) {
        self.profiles.insert(id.into(), profile);
    }

    /// Look up a profile by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMethod`] if no profile is registered under
    /// `id`.
    pub fn lookup(&self, id: &str) -> Result<ProfileFn> {
        self.profiles
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownMethod(id.to_string()))
    }

    /// Identifiers of all registered profiles, sorted.
    #[must_use]
    pub fn method_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
