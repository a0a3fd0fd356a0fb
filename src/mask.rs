//! Pixel-grid types: binary masks and opacity mattes.
//!
//! Both types are flat row-major buffers with `u32` dimensions, matching the
//! convention of the `image` crate buffers they convert from and to.

use image::{GrayImage, Luma};

use crate::error::{Error, Result};

/// A W×H grid of booleans marking object (true) vs background (false) pixels.
///
/// Produced once by an upstream segmenter and treated as read-only by the
/// refinement pipeline; every transform returns a new mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl BinaryMask {
    /// Create an all-false mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMask`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyMask);
        }
        Ok(Self {
            width,
            height,
            data: vec![false; (width as usize) * (height as usize)],
        })
    }

    /// Create a mask from a row-major boolean buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMask`] for a zero-sized grid and
    /// [`Error::DimensionMismatch`] if `data.len() != width * height`.
    pub fn from_raw(width: u32, height: u32, data: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyMask);
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a mask by evaluating `f(x, y)` at every pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMask`] if either dimension is zero.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Result<Self> {
        let mut mask = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let v = f(x, y);
                mask.set(x, y, v);
            }
        }
        Ok(mask)
    }

    /// Threshold a grayscale image into a mask: luma >= 128 (0.5) is object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMask`] for a zero-sized image.
    pub fn from_gray(img: &GrayImage) -> Result<Self> {
        if img.width() == 0 || img.height() == 0 {
            return Err(Error::EmptyMask);
        }
        let data = img.pixels().map(|p| p[0] >= 128).collect();
        Self::from_raw(img.width(), img.height(), data)
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Value at `(x, y)`. Panics if out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[self.index(x, y)]
    }

    /// Set the value at `(x, y)`. Panics if out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// True if at least one pixel is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.data.iter().any(|&v| v)
    }

    /// True if every pixel is set.
    #[must_use]
    pub fn all(&self) -> bool {
        self.data.iter().all(|&v| v)
    }

    /// The underlying row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

/// A W×H grid of opacity values in `[0, 1]`.
///
/// The sole output of the refinement pipeline: 1.0 over the object interior,
/// a profile-shaped ramp across the feather band, 0.0 beyond it.
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityMatte {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl OpacityMatte {
    /// Create a matte filled with a constant opacity.
    pub(crate) fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; (width as usize) * (height as usize)],
        }
    }

    /// Matte width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Matte height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Opacity at `(x, y)`. Panics if out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    pub(crate) fn set(&mut self, x: u32, y: u32, value: f32) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = value;
    }

    /// The underlying row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Render the matte as an 8-bit grayscale image (0 = transparent,
    /// 255 = opaque), suitable as a standalone preview or an alpha channel.
    #[must_use]
    pub fn to_gray(&self) -> GrayImage {
        let mut img = GrayImage::new(self.width, self.height);
        for (pixel, &a) in img.pixels_mut().zip(&self.data) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                *pixel = Luma([(a.clamp(0.0, 1.0) * 255.0).round() as u8]);
            }
        }
        img
    }
}
