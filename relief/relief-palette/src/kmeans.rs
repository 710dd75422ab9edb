//! Seeded k-means clustering in RGB space.

use image::DynamicImage;
use image::imageops::FilterType;
use rand::Rng;
use rand::seq::index;
use relief_types::HexColor;
use tracing::{debug, warn};

use crate::error::{PaletteError, PaletteResult};

/// Side length of the square working image clustered by k-means.
pub const KMEANS_WORKING_SIZE: u32 = 256;

/// Assign/update rounds per run.
pub const KMEANS_ITERATIONS: usize = 10;

type Rgb = [f64; 3];

fn dist_sq(a: &Rgb, b: &Rgb) -> f64 {
    let (dr, dg, db) = (a[0] - b[0], a[1] - b[1], a[2] - b[2]);
    dr * dr + dg * dg + db * db
}

/// Index of the closest center; ties go to the lower index.
fn nearest(p: &Rgb, centers: &[Rgb]) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centers.iter().enumerate() {
        let d = dist_sq(p, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best.0
}

fn to_hex(c: &Rgb) -> HexColor {
    let channel = |v: f64| v.clamp(0.0, 255.0).round() as u8;
    HexColor::new(channel(c[0]), channel(c[1]), channel(c[2]))
}

/// Cluster the image's colors into `k` centers.
///
/// The image is resampled to a fixed
/// [`KMEANS_WORKING_SIZE`]² grid, so results do not depend on the source
/// resolution. Initial centers are `k` distinct pixels drawn from `rng`
/// without replacement; the run is then exactly [`KMEANS_ITERATIONS`] rounds
/// of nearest-center assignment and mean update. A center that attracts no
/// pixels keeps its previous value. Centers are returned in seeding order.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidCount`] if `k` is zero or exceeds the
/// number of working pixels.
pub fn kmeans_palette<R: Rng + ?Sized>(
    image: &DynamicImage,
    k: usize,
    rng: &mut R,
) -> PaletteResult<Vec<HexColor>> {
    let working = image
        .resize_exact(KMEANS_WORKING_SIZE, KMEANS_WORKING_SIZE, FilterType::CatmullRom)
        .to_rgb8();
    let points: Vec<Rgb> = working
        .pixels()
        .map(|p| [f64::from(p[0]), f64::from(p[1]), f64::from(p[2])])
        .collect();

    if k == 0 || k > points.len() {
        return Err(PaletteError::InvalidCount {
            requested: k,
            available: points.len(),
        });
    }

    let mut centers: Vec<Rgb> = index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| points[i])
        .collect();

    let mut sums = vec![[0.0; 3]; k];
    let mut counts = vec![0usize; k];
    let mut empty_rounds = 0usize;
    for _ in 0..KMEANS_ITERATIONS {
        sums.fill([0.0; 3]);
        counts.fill(0);
        for p in &points {
            let c = nearest(p, &centers);
            counts[c] += 1;
            for ch in 0..3 {
                sums[c][ch] += p[ch];
            }
        }
        for ((center, sum), &n) in centers.iter_mut().zip(&sums).zip(&counts) {
            if n == 0 {
                empty_rounds += 1;
                continue;
            }
            let inv = 1.0 / n as f64;
            *center = [sum[0] * inv, sum[1] * inv, sum[2] * inv];
        }
    }
    if empty_rounds > 0 {
        warn!(k, empty_rounds, "k-means left empty clusters unchanged");
    }
    debug!(k, points = points.len(), "k-means converged");

    Ok(centers.iter().map(to_hex).collect())
}
