use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::pixel::{CHANNELS, PixelBuffer};

/// Number of intensity levels per channel.
pub const LEVELS: usize = 256;

type Lut = [u8; LEVELS];

// =============================================================================
// Filter descriptions
// =============================================================================

/// Tile layout for adaptive equalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub rows: u32,
    pub cols: u32,
}

impl TileGrid {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(CoreError::invalid(format!(
                "tile grid must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(8, 8)
    }
}

/// A filter together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Grayscale,
    Negative,
    GlobalEqualize,
    AdaptiveEqualize { grid: TileGrid, clip_limit: f64 },
    ContrastBrightness { alpha: f64, beta: f64 },
}

impl Filter {
    /// Human-readable name, also used as the history label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Grayscale => "Grayscale",
            Self::Negative => "Negative",
            Self::GlobalEqualize => "Global equalization",
            Self::AdaptiveEqualize { .. } => "Adaptive equalization",
            Self::ContrastBrightness { .. } => "Contrast/brightness",
        }
    }

    /// Check parameters without touching any pixels.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Grayscale | Self::Negative | Self::GlobalEqualize => Ok(()),
            Self::AdaptiveEqualize { grid, clip_limit } => {
                grid.validate()?;
                if !(clip_limit.is_finite() && clip_limit > 0.0) {
                    return Err(CoreError::invalid(format!(
                        "clip limit must be a positive number, got {clip_limit}"
                    )));
                }
                Ok(())
            }
            Self::ContrastBrightness { alpha, beta } => {
                if !(alpha.is_finite() && alpha > 0.0) {
                    return Err(CoreError::invalid(format!(
                        "contrast alpha must be a positive number, got {alpha}"
                    )));
                }
                if !beta.is_finite() {
                    return Err(CoreError::invalid(format!(
                        "brightness beta must be finite, got {beta}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Run `filter` on `img`, returning a new buffer of identical dimensions.
pub fn apply(img: &PixelBuffer, filter: &Filter) -> Result<PixelBuffer> {
    filter.validate()?;
    let started = Instant::now();
    let out = match *filter {
        Filter::Grayscale => grayscale(img),
        Filter::Negative => negative(img),
        Filter::GlobalEqualize => global_equalize(img),
        Filter::AdaptiveEqualize { grid, clip_limit } => adaptive_equalize(img, grid, clip_limit)?,
        Filter::ContrastBrightness { alpha, beta } => {
            adjust_contrast_brightness(img, alpha, beta)?
        }
    };
    debug!(
        filter = filter.display_name(),
        width = img.width(),
        height = img.height(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "filter applied"
    );
    Ok(out)
}

// =============================================================================
// Point operations
// =============================================================================

/// Copy `img` and rewrite it row by row in parallel.
fn map_rows<F>(img: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(&mut [u8]) + Sync,
{
    let mut out = img.clone();
    let row_bytes = out.row_bytes();
    out.data_mut().par_chunks_exact_mut(row_bytes).for_each(&f);
    out
}

fn apply_luts(img: &PixelBuffer, luts: &[Lut; CHANNELS]) -> PixelBuffer {
    map_rows(img, |row| {
        for pixel in row.chunks_exact_mut(CHANNELS) {
            for (value, lut) in pixel.iter_mut().zip(luts) {
                *value = lut[*value as usize];
            }
        }
    })
}

fn identity_lut() -> Lut {
    std::array::from_fn(|v| v as u8)
}

/// Luma `0.299R + 0.587G + 0.114B`, rounded, written to all three channels.
pub fn grayscale(img: &PixelBuffer) -> PixelBuffer {
    map_rows(img, |row| {
        for pixel in row.chunks_exact_mut(CHANNELS) {
            let l = luma(pixel[0], pixel[1], pixel[2]);
            pixel.fill(l);
        }
    })
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// `255 - value` on every channel.
pub fn negative(img: &PixelBuffer) -> PixelBuffer {
    let lut: Lut = std::array::from_fn(|v| 255 - v as u8);
    apply_luts(img, &[lut; CHANNELS])
}

/// `clamp(round(alpha * value + beta), 0, 255)` on every channel.
pub fn adjust_contrast_brightness(img: &PixelBuffer, alpha: f64, beta: f64) -> Result<PixelBuffer> {
    Filter::ContrastBrightness { alpha, beta }.validate()?;
    let lut: Lut =
        std::array::from_fn(|v| (alpha * v as f64 + beta).round().clamp(0.0, 255.0) as u8);
    Ok(apply_luts(img, &[lut; CHANNELS]))
}

// =============================================================================
// Histogram equalization
// =============================================================================

/// Count values of channel `channel` over the pixels yielded by `pixels`.
fn histogram<'a>(pixels: impl Iterator<Item = &'a [u8]>, channel: usize) -> [u32; LEVELS] {
    let mut counts = [0u32; LEVELS];
    for pixel in pixels {
        counts[pixel[channel] as usize] += 1;
    }
    counts
}

fn is_single_valued(counts: &[u32; LEVELS]) -> bool {
    counts.iter().filter(|&&c| c > 0).count() <= 1
}

/// `round(255 * CDF(v) / total)` for every level.
fn equalization_lut(hist: &[f64; LEVELS], total: f64) -> Lut {
    let mut lut = [0u8; LEVELS];
    let mut cdf = 0.0;
    for (v, count) in hist.iter().enumerate() {
        cdf += count;
        lut[v] = (255.0 * cdf / total).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Equalization map for one histogram, optionally clipping each bin at
/// `clip_limit * total / 256` and spreading the excess evenly over all bins.
/// A histogram with a single occupied bin maps to the identity.
fn channel_lut(counts: &[u32; LEVELS], clip_limit: Option<f64>) -> Lut {
    if is_single_valued(counts) {
        return identity_lut();
    }
    let total: f64 = counts.iter().map(|&c| c as f64).sum();
    let mut hist: [f64; LEVELS] = std::array::from_fn(|v| counts[v] as f64);

    if let Some(clip) = clip_limit {
        let limit = clip * total / LEVELS as f64;
        let mut excess = 0.0;
        for bin in hist.iter_mut() {
            if *bin > limit {
                excess += *bin - limit;
                *bin = limit;
            }
        }
        if excess > 0.0 {
            let share = excess / LEVELS as f64;
            for bin in hist.iter_mut() {
                *bin += share;
            }
        }
    }

    equalization_lut(&hist, total)
}

/// Per-channel global histogram equalization. A channel holding a single
/// value is left unchanged.
pub fn global_equalize(img: &PixelBuffer) -> PixelBuffer {
    let luts: [Lut; CHANNELS] = std::array::from_fn(|c| {
        let counts = histogram(img.as_raw().chunks_exact(CHANNELS), c);
        channel_lut(&counts, None)
    });
    apply_luts(img, &luts)
}

// =============================================================================
// Contrast-limited adaptive equalization
// =============================================================================

/// Split `len` pixels into `n` spans of `len / n`, the first span taking half
/// of the remainder and the last span the rest. `n` is capped at `len`.
fn tile_spans(len: u32, n: u32) -> Vec<(usize, usize)> {
    let len = len as usize;
    let n = (n as usize).min(len);
    let base = len / n;
    let rem = len % n;
    let mut sizes = vec![base; n];
    sizes[0] += rem / 2;
    sizes[n - 1] += rem - rem / 2;

    let mut start = 0;
    sizes
        .into_iter()
        .map(|size| {
            let span = (start, start + size);
            start += size;
            span
        })
        .collect()
}

/// For every pixel along one axis: the two tiles whose centres bracket it and
/// the weight of the second. Pixels before the first or after the last centre
/// clamp to that tile.
fn axis_weights(len: u32, spans: &[(usize, usize)]) -> Vec<(usize, usize, f64)> {
    let centers: Vec<f64> = spans
        .iter()
        .map(|&(start, end)| (start + end) as f64 / 2.0)
        .collect();
    let last = centers.len() - 1;
    let mut j = 0;
    (0..len)
        .map(|i| {
            let p = i as f64 + 0.5;
            if p <= centers[0] {
                return (0, 0, 0.0);
            }
            if p >= centers[last] {
                return (last, last, 0.0);
            }
            while centers[j + 1] <= p {
                j += 1;
            }
            (j, j + 1, (p - centers[j]) / (centers[j + 1] - centers[j]))
        })
        .collect()
}

/// Contrast-limited adaptive histogram equalization, applied per channel.
///
/// The image is split into `grid.rows` x `grid.cols` tiles (capped at the
/// image dimensions). Each tile gets a clipped equalization map; each output
/// value is the bilinear blend of the maps of the four nearest tile centres.
/// With a 1x1 grid and a non-binding clip limit this equals
/// [`global_equalize`].
///
/// A tile whose channel holds a single value gets the identity map, not just
/// a fully flat image. Next to equalized tiles this can leave a faint seam that
/// the bilinear blend only partly hides.
pub fn adaptive_equalize(img: &PixelBuffer, grid: TileGrid, clip_limit: f64) -> Result<PixelBuffer> {
    Filter::AdaptiveEqualize { grid, clip_limit }.validate()?;

    let row_spans = tile_spans(img.height(), grid.rows);
    let col_spans = tile_spans(img.width(), grid.cols);
    let tile_cols = col_spans.len();
    let stride = img.row_bytes();
    let data = img.as_raw();

    let luts: Vec<[Lut; CHANNELS]> = (0..row_spans.len() * tile_cols)
        .into_par_iter()
        .map(|t| {
            let (y0, y1) = row_spans[t / tile_cols];
            let (x0, x1) = col_spans[t % tile_cols];
            std::array::from_fn(|c| {
                let pixels = (y0..y1).flat_map(|y| {
                    data[y * stride + x0 * CHANNELS..y * stride + x1 * CHANNELS]
                        .chunks_exact(CHANNELS)
                });
                channel_lut(&histogram(pixels, c), Some(clip_limit))
            })
        })
        .collect();

    let xw = axis_weights(img.width(), &col_spans);
    let yw = axis_weights(img.height(), &row_spans);

    let mut out = img.clone();
    out.data_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let (r0, r1, fy) = yw[y];
            for (x, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let (c0, c1, fx) = xw[x];
                let tl = &luts[r0 * tile_cols + c0];
                let tr = &luts[r0 * tile_cols + c1];
                let bl = &luts[r1 * tile_cols + c0];
                let br = &luts[r1 * tile_cols + c1];
                for (c, value) in pixel.iter_mut().enumerate() {
                    let v = *value as usize;
                    let top = (1.0 - fx) * tl[c][v] as f64 + fx * tr[c][v] as f64;
                    let bottom = (1.0 - fx) * bl[c][v] as f64 + fx * br[c][v] as f64;
                    *value = ((1.0 - fy) * top + fy * bottom).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    Ok(out)
}

// =============================================================================
// Tests
// =============================================================================
