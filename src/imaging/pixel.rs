//! Owned pixel storage: true-color RGBA or indexed palette.
//!
//! A [`PixelBuffer`] never carries a hidden "blending mode". Every write
//! takes an explicit [`BlendMode`], so the order in which a canvas is filled
//! and then drawn onto is visible at the call site.
//!
//! Palette buffers store one index per pixel in a [`GrayImage`] plane so the
//! `image` crate's geometric operations work on them unchanged.

use super::error::{ImageError, Result};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;

/// Fully transparent black.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorMode {
    TrueColor,
    Palette,
}

/// How a draw combines with what is already on the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Overwrite the destination pixel, alpha included.
    Replace,
    /// Composite the source over the destination.
    Blend,
}

/// Colour table of an indexed buffer (at most 256 entries).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Rgba<u8>>,
}

impl Palette {
    pub const MAX_ENTRIES: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Rgba<u8>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Rgba<u8>> {
        self.entries.get(index as usize).copied()
    }

    /// Index of an entry equal to `color`, if any.
    pub fn find(&self, color: Rgba<u8>) -> Option<u8> {
        self.entries
            .iter()
            .position(|&c| c == color)
            .map(|i| i as u8)
    }

    /// Append a new entry. Returns `None` once the table is full.
    pub fn allocate(&mut self, color: Rgba<u8>) -> Option<u8> {
        if self.entries.len() >= Self::MAX_ENTRIES {
            return None;
        }
        self.entries.push(color);
        Some((self.entries.len() - 1) as u8)
    }

    /// Exact match, else a new entry, else the nearest existing one.
    pub fn resolve(&mut self, color: Rgba<u8>) -> u8 {
        if let Some(index) = self.find(color) {
            return index;
        }
        self.allocate(color)
            .unwrap_or_else(|| self.closest(color))
    }

    fn closest(&self, color: Rgba<u8>) -> u8 {
        let distance = |c: &Rgba<u8>| -> u32 {
            c.0.iter()
                .zip(color.0.iter())
                .map(|(&a, &b)| {
                    let d = a as i32 - b as i32;
                    (d * d) as u32
                })
                .sum()
        };
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| distance(c))
            .map(|(i, _)| i as u8)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PixelData {
    TrueColor(RgbaImage),
    Palette { palette: Palette, indices: GrayImage },
}

/// An owned 2D image in either colour representation.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: PixelData,
    save_alpha: bool,
    transparent_index: Option<u8>,
}

impl PixelBuffer {
    /// A true-color buffer of transparent black pixels.
    pub fn true_color(width: u32, height: u32) -> Self {
        Self::from_rgba(RgbaImage::new(width, height))
    }

    /// A palette buffer whose single entry `background` covers every pixel.
    pub fn indexed(width: u32, height: u32, background: Rgba<u8>) -> Self {
        let mut palette = Palette::new();
        palette.allocate(background);
        Self {
            data: PixelData::Palette {
                palette,
                indices: GrayImage::new(width, height),
            },
            save_alpha: false,
            transparent_index: None,
        }
    }

    /// Wrap decoded RGBA pixels. Alpha is kept on encode.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            data: PixelData::TrueColor(image),
            save_alpha: true,
            transparent_index: None,
        }
    }

    /// Build an indexed buffer, checking that every index and the
    /// transparent marker refer to allocated palette entries.
    pub fn from_indexed(
        palette: Palette,
        indices: GrayImage,
        transparent_index: Option<u8>,
    ) -> Result<Self> {
        let len = palette.len();
        if len == 0 || len > Palette::MAX_ENTRIES {
            return Err(ImageError::Decode(format!(
                "palette must have 1-256 entries, got {len}"
            )));
        }
        if let Some(bad) = indices.pixels().find(|p| p.0[0] as usize >= len) {
            return Err(ImageError::Decode(format!(
                "pixel index {} outside palette of {len} entries",
                bad.0[0]
            )));
        }
        if let Some(t) = transparent_index.filter(|&t| t as usize >= len) {
            return Err(ImageError::Decode(format!(
                "transparent index {t} outside palette of {len} entries"
            )));
        }
        Ok(Self {
            data: PixelData::Palette { palette, indices },
            save_alpha: transparent_index.is_some(),
            transparent_index,
        })
    }

    /// Index an RGBA image exactly, if it fits a 256-colour table with at
    /// most one fully transparent key. Partial alpha cannot be expressed by a
    /// single transparent index, so such images stay true-color.
    pub fn quantize(image: &RgbaImage) -> Option<Self> {
        let mut palette = Palette::new();
        let mut lookup: HashMap<[u8; 4], u8> = HashMap::new();
        let mut transparent_index = None;
        let mut indices = GrayImage::new(image.width(), image.height());

        for (x, y, px) in image.enumerate_pixels() {
            let index = match px.0[3] {
                0 => match transparent_index {
                    Some(t) => t,
                    None => {
                        let t = palette.allocate(*px)?;
                        transparent_index = Some(t);
                        t
                    }
                },
                255 => match lookup.get(&px.0) {
                    Some(&i) => i,
                    None => {
                        let i = palette.allocate(*px)?;
                        lookup.insert(px.0, i);
                        i
                    }
                },
                _ => return None,
            };
            indices.put_pixel(x, y, Luma([index]));
        }

        if palette.is_empty() {
            return None;
        }
        Self::from_indexed(palette, indices, transparent_index).ok()
    }

    pub fn width(&self) -> u32 {
        match &self.data {
            PixelData::TrueColor(img) => img.width(),
            PixelData::Palette { indices, .. } => indices.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match &self.data {
            PixelData::TrueColor(img) => img.height(),
            PixelData::Palette { indices, .. } => indices.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.data {
            PixelData::TrueColor(_) => ColorMode::TrueColor,
            PixelData::Palette { .. } => ColorMode::Palette,
        }
    }

    pub fn is_true_color(&self) -> bool {
        self.color_mode() == ColorMode::TrueColor
    }

    /// Whether encoders should keep the alpha channel.
    pub fn save_alpha(&self) -> bool {
        self.save_alpha
    }

    pub fn set_save_alpha(&mut self, enabled: bool) {
        self.save_alpha = enabled;
    }

    pub fn transparent_index(&self) -> Option<u8> {
        self.transparent_index
    }

    /// Mark a palette entry as the transparent key. Ignored for true-color
    /// buffers and for indices outside the palette.
    pub fn set_transparent_index(&mut self, index: Option<u8>) {
        if let PixelData::Palette { palette, .. } = &self.data {
            if index.is_none_or(|i| (i as usize) < palette.len()) {
                self.transparent_index = index;
            }
        }
    }

    /// Palette entry of the transparent key, as stored.
    pub fn transparent_color(&self) -> Option<Rgba<u8>> {
        let index = self.transparent_index?;
        self.palette().and_then(|p| p.get(index))
    }

    pub fn palette(&self) -> Option<&Palette> {
        match &self.data {
            PixelData::Palette { palette, .. } => Some(palette),
            PixelData::TrueColor(_) => None,
        }
    }

    /// Allocate a palette entry. `None` for true-color buffers or a full table.
    pub fn allocate_color(&mut self, color: Rgba<u8>) -> Option<u8> {
        match &mut self.data {
            PixelData::Palette { palette, .. } => palette.allocate(color),
            PixelData::TrueColor(_) => None,
        }
    }

    /// Palette index stored at a pixel; `None` for true-color buffers.
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        match &self.data {
            PixelData::Palette { indices, .. } => Some(indices.get_pixel(x, y).0[0]),
            PixelData::TrueColor(_) => None,
        }
    }

    /// Visible colour of a pixel. The transparent key reads as alpha 0.
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        match &self.data {
            PixelData::TrueColor(img) => *img.get_pixel(x, y),
            PixelData::Palette { palette, indices } => {
                let index = indices.get_pixel(x, y).0[0];
                let mut color = palette.get(index).unwrap_or(TRANSPARENT);
                if Some(index) == self.transparent_index {
                    color.0[3] = 0;
                }
                color
            }
        }
    }

    /// Write a colour into a pixel, resolving it into the palette if needed.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>, mode: BlendMode) {
        let color = match mode {
            BlendMode::Replace => color,
            BlendMode::Blend => {
                let mut base = self.get_pixel(x, y);
                base.blend(&color);
                base
            }
        };
        if let PixelData::TrueColor(img) = &mut self.data {
            img.put_pixel(x, y, color);
            return;
        }
        if let Some(index) = self.resolve_color(color) {
            self.set_index(x, y, index);
        }
    }

    /// Palette index `color` is stored as: the transparent key for alpha 0,
    /// otherwise an exact, new or nearest entry. `None` for true-color
    /// buffers.
    ///
    /// Once a colour has been resolved, later calls return the same index.
    pub fn resolve_color(&mut self, color: Rgba<u8>) -> Option<u8> {
        let key = self.transparent_index;
        match &mut self.data {
            PixelData::Palette { palette, .. } => Some(match key {
                Some(t) if color.0[3] == 0 => t,
                _ => palette.resolve(color),
            }),
            PixelData::TrueColor(_) => None,
        }
    }

    /// Store a palette index at a pixel. Ignored for true-color buffers and
    /// for indices outside the palette.
    pub fn set_index(&mut self, x: u32, y: u32, index: u8) {
        if let PixelData::Palette { palette, indices } = &mut self.data {
            if (index as usize) < palette.len() {
                indices.put_pixel(x, y, Luma([index]));
            }
        }
    }

    /// Set every pixel of the buffer to a palette index.
    pub fn fill_index(&mut self, index: u8) {
        if let PixelData::Palette { palette, indices } = &mut self.data {
            if (index as usize) < palette.len() {
                indices.pixels_mut().for_each(|p| *p = Luma([index]));
            }
        }
    }

    /// Paint `color` over the whole buffer.
    pub fn fill(&mut self, color: Rgba<u8>, mode: BlendMode) {
        if let PixelData::TrueColor(img) = &mut self.data {
            match mode {
                BlendMode::Replace => img.pixels_mut().for_each(|p| *p = color),
                BlendMode::Blend => img.pixels_mut().for_each(|p| p.blend(&color)),
            }
            return;
        }
        let (w, h) = self.dimensions();
        for y in 0..h {
            for x in 0..w {
                self.put_pixel(x, y, color, mode);
            }
        }
    }

    /// Visible RGBA pixels. Borrowed for true-color buffers, expanded for
    /// palette buffers.
    pub fn to_rgba(&self) -> Cow<'_, RgbaImage> {
        match &self.data {
            PixelData::TrueColor(img) => Cow::Borrowed(img),
            PixelData::Palette { indices, .. } => {
                Cow::Owned(RgbaImage::from_fn(indices.width(), indices.height(), |x, y| {
                    self.get_pixel(x, y)
                }))
            }
        }
    }

    pub(crate) fn data(&self) -> &PixelData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut PixelData {
        &mut self.data
    }

    /// Same flags, different pixels. Used by geometric transforms.
    pub(crate) fn with_data(&self, data: PixelData) -> Self {
        Self {
            data,
            save_alpha: self.save_alpha,
            transparent_index: self.transparent_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn true_color_starts_transparent() {
        let buf = PixelBuffer::true_color(3, 2);
        assert_eq!(buf.dimensions(), (3, 2));
        assert_eq!(buf.color_mode(), ColorMode::TrueColor);
        assert_eq!(buf.get_pixel(2, 1), TRANSPARENT);
    }

    #[test]
    fn palette_resolve_reuses_and_allocates() {
        let mut palette = Palette::new();
        assert_eq!(palette.resolve(RED), 0);
        assert_eq!(palette.resolve(BLUE), 1);
        assert_eq!(palette.resolve(RED), 0);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn full_palette_resolves_to_closest() {
        let mut palette = Palette::new();
        for i in 0..=255u8 {
            palette.allocate(Rgba([i, 0, 0, 255]));
        }
        assert_eq!(palette.allocate(BLUE), None);
        assert_eq!(palette.resolve(Rgba([200, 1, 0, 255])), 200);
    }

    #[test]
    fn from_indexed_rejects_out_of_range_index() {
        let mut palette = Palette::new();
        palette.allocate(RED);
        let indices = GrayImage::from_pixel(2, 2, Luma([1]));
        assert!(matches!(
            PixelBuffer::from_indexed(palette, indices, None),
            Err(ImageError::Decode(_))
        ));
    }

    #[test]
    fn from_indexed_rejects_bad_transparent_index() {
        let mut palette = Palette::new();
        palette.allocate(RED);
        let indices = GrayImage::new(2, 2);
        assert!(PixelBuffer::from_indexed(palette, indices, Some(4)).is_err());
    }

    #[test]
    fn transparent_key_reads_as_zero_alpha() {
        let mut palette = Palette::new();
        palette.allocate(RED);
        palette.allocate(Rgba([10, 20, 30, 255]));
        let mut indices = GrayImage::new(2, 1);
        indices.put_pixel(1, 0, Luma([1]));
        let buf = PixelBuffer::from_indexed(palette, indices, Some(1)).unwrap();

        assert_eq!(buf.get_pixel(0, 0), RED);
        assert_eq!(buf.get_pixel(1, 0), Rgba([10, 20, 30, 0]));
        assert_eq!(buf.transparent_color(), Some(Rgba([10, 20, 30, 255])));
        assert!(buf.save_alpha());
    }

    #[test]
    fn quantize_builds_exact_palette_with_transparent_key() {
        let img = RgbaImage::from_fn(4, 1, |x, _| match x {
            0 => RED,
            1 => BLUE,
            2 => Rgba([9, 9, 9, 0]),
            _ => RED,
        });
        let buf = PixelBuffer::quantize(&img).unwrap();
        assert_eq!(buf.color_mode(), ColorMode::Palette);
        assert_eq!(buf.palette().unwrap().len(), 3);
        assert_eq!(buf.transparent_index(), Some(2));
        assert_eq!(buf.get_pixel(0, 0), RED);
        assert_eq!(buf.get_pixel(2, 0).0[3], 0);
    }

    #[test]
    fn quantize_refuses_partial_alpha() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 128]));
        assert!(PixelBuffer::quantize(&img).is_none());
    }

    #[test]
    fn quantize_refuses_more_than_256_colors() {
        let img = RgbaImage::from_fn(300, 1, |x, _| Rgba([(x % 256) as u8, (x / 256) as u8, 0, 255]));
        assert!(PixelBuffer::quantize(&img).is_none());
    }

    #[test]
    fn replace_overwrites_alpha_blend_composites() {
        let mut buf = PixelBuffer::true_color(1, 1);
        buf.put_pixel(0, 0, RED, BlendMode::Replace);
        buf.put_pixel(0, 0, TRANSPARENT, BlendMode::Blend);
        assert_eq!(buf.get_pixel(0, 0), RED);

        buf.put_pixel(0, 0, TRANSPARENT, BlendMode::Replace);
        assert_eq!(buf.get_pixel(0, 0), TRANSPARENT);
    }

    #[test]
    fn fill_replace_sets_every_pixel() {
        let mut buf = PixelBuffer::true_color(2, 2);
        buf.fill(BLUE, BlendMode::Replace);
        assert!(buf.to_rgba().pixels().all(|p| *p == BLUE));
    }

    #[test]
    fn palette_put_pixel_resolves_new_colors() {
        let mut buf = PixelBuffer::indexed(2, 1, RED);
        buf.put_pixel(1, 0, BLUE, BlendMode::Replace);
        assert_eq!(buf.palette().unwrap().len(), 2);
        assert_eq!(buf.index_at(1, 0), Some(1));
        assert_eq!(buf.get_pixel(1, 0), BLUE);
    }

    #[test]
    fn set_transparent_index_ignored_for_true_color() {
        let mut buf = PixelBuffer::true_color(1, 1);
        buf.set_transparent_index(Some(0));
        assert_eq!(buf.transparent_index(), None);
    }

    #[test]
    fn indexed_constructor_and_palette_accessor() {
        let buf = PixelBuffer::indexed(2, 2, RED);
        assert_eq!(buf.palette().map(Palette::entries), Some(&[RED][..]));
        assert_eq!(PixelBuffer::true_color(2, 2).palette(), None);
    }

    #[test]
    fn allocate_color_appends_to_palette_only() {
        let mut buf = PixelBuffer::indexed(1, 1, RED);
        assert_eq!(buf.allocate_color(BLUE), Some(1));
        assert_eq!(buf.allocate_color(BLUE), Some(2));
        assert_eq!(PixelBuffer::true_color(1, 1).allocate_color(BLUE), None);
    }

    #[test]
    fn resolve_color_is_stable_and_maps_alpha_zero_to_key() {
        let mut palette = Palette::new();
        palette.allocate(RED);
        palette.allocate(Rgba([7, 7, 7, 255]));
        let mut buf = PixelBuffer::from_indexed(palette, GrayImage::new(2, 2), Some(1)).unwrap();

        assert_eq!(buf.resolve_color(Rgba([1, 1, 1, 0])), Some(1));
        let blue = buf.resolve_color(BLUE);
        assert_eq!(blue, Some(2));
        assert_eq!(buf.resolve_color(BLUE), blue);
        assert_eq!(PixelBuffer::true_color(1, 1).resolve_color(BLUE), None);
    }

    #[test]
    fn set_index_ignores_unallocated_entries() {
        let mut buf = PixelBuffer::indexed(2, 1, RED);
        buf.allocate_color(BLUE);
        buf.set_index(1, 0, 1);
        buf.set_index(0, 0, 9);
        assert_eq!(buf.index_at(0, 0), Some(0));
        assert_eq!(buf.get_pixel(1, 0), BLUE);
    }

    #[test]
    fn to_rgba_expands_palette() {
        let buf = PixelBuffer::indexed(2, 3, BLUE);
        let rgba = buf.to_rgba();
        assert_eq!(rgba.dimensions(), (2, 3));
        assert!(rgba.pixels().all(|p| *p == BLUE));
    }
}
