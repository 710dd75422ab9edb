//! Median-cut color quantization.

use image::DynamicImage;
use relief_types::HexColor;
use tracing::debug;

use crate::error::{PaletteError, PaletteResult};

/// A box of pixels in RGB space.
struct ColorBox {
    pixels: Vec<[u8; 3]>,
}

impl ColorBox {
    /// Widest channel and its extent.
    fn widest_channel(&self) -> (usize, u8) {
        let mut best = (0, 0u8);
        for ch in 0..3 {
            let (lo, hi) = self
                .pixels
                .iter()
                .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[ch]), hi.max(p[ch])));
            let range = hi.saturating_sub(lo);
            if range > best.1 {
                best = (ch, range);
            }
        }
        best
    }

    /// Split at the median of the widest channel.
    fn split(mut self, channel: usize) -> (Self, Self) {
        self.pixels.sort_by_key(|p| p[channel]);
        let upper = self.pixels.split_off(self.pixels.len() / 2);
        (self, Self { pixels: upper })
    }

    fn mean(&self) -> HexColor {
        let n = self.pixels.len().max(1) as f64;
        let mut sum = [0.0f64; 3];
        for p in &self.pixels {
            for ch in 0..3 {
                sum[ch] += f64::from(p[ch]);
            }
        }
        let channel = |ch: usize| (sum[ch] / n).round().clamp(0.0, 255.0) as u8;
        HexColor::new(channel(0), channel(1), channel(2))
    }
}

/// Quantize the image to exactly `count` colors by median cut.
///
/// Starting from one box holding every pixel, the box with the widest
/// channel range is repeatedly split at the median of that channel. Each
/// box contributes its mean color. Splits leave the lower half in place and
/// append the upper half, so the order is stable for a given image. If the
/// image has fewer distinct colors than requested, the last color is
/// repeated to fill the palette.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidCount`] if `count` is zero or the image has
/// no pixels.
pub fn median_cut_palette(image: &DynamicImage, count: usize) -> PaletteResult<Vec<HexColor>> {
    let pixels: Vec<[u8; 3]> = image.to_rgb8().pixels().map(|p| p.0).collect();
    if count == 0 || pixels.is_empty() {
        return Err(PaletteError::InvalidCount {
            requested: count,
            available: pixels.len(),
        });
    }

    let mut boxes = vec![ColorBox { pixels }];
    while boxes.len() < count {
        let candidate = boxes
            .iter()
            .enumerate()
            .map(|(i, b)| (i, b.widest_channel()))
            .filter(|(_, (_, range))| *range > 0)
            .max_by(|a, b| a.1.1.cmp(&b.1.1).then(b.0.cmp(&a.0)));
        let Some((index, (channel, _))) = candidate else {
            break;
        };
        let (lower, upper) = boxes.swap_remove(index).split(channel);
        boxes.push(lower);
        let last = boxes.len() - 1;
        boxes.swap(index, last);
        boxes.push(upper);
    }

    let mut palette: Vec<HexColor> = boxes.iter().map(ColorBox::mean).collect();
    debug!(requested = count, distinct_boxes = palette.len(), "Median cut finished");
    if let Some(&last) = palette.last() {
        palette.resize(count, last);
    }
    Ok(palette)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn stripes(colors: &[[u8; 3]]) -> DynamicImage {
        let n = colors.len() as u32;
        DynamicImage::ImageRgb8(RgbImage::from_fn(n * 8, 8, |x, _| Rgb(colors[(x / 8) as usize])))
    }

    #[test]
    fn exact_count() {
        let img = stripes(&[[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]]);
        for n in 1..=8 {
            assert_eq!(median_cut_palette(&img, n).unwrap().len(), n);
        }
    }

    #[test]
    fn stable_for_same_image() {
        let img = stripes(&[[10, 20, 30], [200, 100, 50], [90, 90, 200], [0, 255, 128]]);
        assert_eq!(
            median_cut_palette(&img, 4).unwrap(),
            median_cut_palette(&img, 4).unwrap()
        );
    }

    #[test]
    fn recovers_two_colors() {
        let img = stripes(&[[255, 0, 0], [0, 0, 255]]);
        let mut pal = median_cut_palette(&img, 2).unwrap();
        pal.sort_by_key(|c| c.rgb());
        assert_eq!(pal, vec![HexColor::new(0, 0, 255), HexColor::new(255, 0, 0)]);
    }

    #[test]
    fn pads_when_image_has_fewer_colors() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([7, 8, 9])));
        let pal = median_cut_palette(&img, 3).unwrap();
        assert_eq!(pal, vec![HexColor::new(7, 8, 9); 3]);
    }

    #[test]
    fn zero_count_rejected() {
        let img = stripes(&[[1, 2, 3]]);
        assert!(median_cut_palette(&img, 0).is_err());
    }
}
