//! Point sampling for territory centres.

// Grid indexing uses intentional float/integer casts
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::config::{MapConfig, SamplerKind};
use crate::game::Point;

/// Rectangle points are sampled in, with a margin kept free along every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Full width.
    pub width: f64,
    /// Full height.
    pub height: f64,
    /// Free space along every edge.
    pub margin: f64,
}

impl Bounds {
    /// Create bounds.
    #[must_use]
    pub const fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Bounds of a map configuration.
    #[must_use]
    pub const fn from_config(config: &MapConfig) -> Self {
        Self::new(config.width, config.height, config.margin)
    }

    /// Width available for points.
    #[must_use]
    pub fn usable_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// Height available for points.
    #[must_use]
    pub fn usable_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    /// Whether the usable area is non-empty.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.usable_width() > 0.0 && self.usable_height() > 0.0
    }

    /// Whether `p` lies inside the usable area (edges included).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.margin
            && p.x <= self.width - self.margin
            && p.y >= self.margin
            && p.y <= self.height - self.margin
    }

    /// Clamp `p` into the usable area.
    #[must_use]
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.margin, self.width - self.margin),
            p.y.clamp(self.margin, self.height - self.margin),
        )
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Point {
        Point::new(
            self.margin + rng.random::<f64>() * self.usable_width(),
            self.margin + rng.random::<f64>() * self.usable_height(),
        )
    }
}

/// Minimum separation for `count` points: the radius of a disc with an equal
/// share of the usable area, scaled by `densification`.
#[must_use]
pub fn target_spacing(bounds: &Bounds, count: usize, densification: f64) -> f64 {
    let area = bounds.usable_width() * bounds.usable_height();
    (area / (count.max(1) as f64 * std::f64::consts::PI)).sqrt() * densification
}

/// A strategy for placing territory centres.
///
/// Implementations return at most `count` points, all inside `bounds` and
/// mutually separated by at least [`target_spacing`]. They may return fewer
/// when the area fills up, but at least one for `count >= 1` and usable bounds.
pub trait PointSampler {
    /// Sample up to `count` points.
    fn sample(&self, bounds: &Bounds, count: usize, rng: &mut dyn RngCore) -> Vec<Point>;
}

/// Bridson dart throwing accelerated by a background grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonDiscSampler {
    /// Spacing multiplier.
    pub densification: f64,
    /// Candidates tried around an active point before it retires.
    pub attempts: u32,
}

impl PoissonDiscSampler {
    /// Create a sampler.
    #[must_use]
    pub const fn new(densification: f64, attempts: u32) -> Self {
        Self {
            densification,
            attempts,
        }
    }
}

/// Background grid holding at most one point per cell.
struct Grid {
    cell: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Option<Point>>,
}

impl Grid {
    fn new(bounds: &Bounds, spacing: f64) -> Self {
        let cell = spacing / std::f64::consts::SQRT_2;
        let cols = ((bounds.width / cell).ceil() as usize).max(1);
        let rows = ((bounds.height / cell).ceil() as usize).max(1);
        Self {
            cell,
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    fn cell_of(&self, p: Point) -> (usize, usize) {
        let col = ((p.x / self.cell).floor().max(0.0) as usize).min(self.cols - 1);
        let row = ((p.y / self.cell).floor().max(0.0) as usize).min(self.rows - 1);
        (col, row)
    }

    fn insert(&mut self, p: Point) {
        let (col, row) = self.cell_of(p);
        self.cells[row * self.cols + col] = Some(p);
    }

    /// Whether any stored point is closer than `spacing` to `p`.
    ///
    /// A cell's diagonal equals the spacing, so conflicts lie within two cells.
    fn has_conflict(&self, p: Point, spacing: f64) -> bool {
        let (col, row) = self.cell_of(p);
        let spacing_sq = spacing * spacing;

        for r in row.saturating_sub(2)..=(row + 2).min(self.rows - 1) {
            for c in col.saturating_sub(2)..=(col + 2).min(self.cols - 1) {
                if let Some(q) = self.cells[r * self.cols + c]
                    && p.distance_sq(q) < spacing_sq
                {
                    return true;
                }
            }
        }
        false
    }
}

impl PointSampler for PoissonDiscSampler {
    fn sample(&self, bounds: &Bounds, count: usize, rng: &mut dyn RngCore) -> Vec<Point> {
        if count == 0 || !bounds.is_usable() {
            return Vec::new();
        }

        let spacing = target_spacing(bounds, count, self.densification);
        let mut grid = Grid::new(bounds, spacing);
        let mut points = Vec::with_capacity(count);
        let mut active = Vec::new();

        let first = bounds.random_point(rng);
        grid.insert(first);
        points.push(first);
        active.push(first);

        while !active.is_empty() && points.len() < count {
            let index = rng.random_range(0..active.len());
            let origin = active[index];

            let mut placed = false;
            for _ in 0..self.attempts {
                let angle = rng.random::<f64>() * std::f64::consts::TAU;
                let distance = spacing * (1.0 + rng.random::<f64>());
                let candidate = Point::new(
                    origin.x + distance * angle.cos(),
                    origin.y + distance * angle.sin(),
                );

                if bounds.contains(candidate) && !grid.has_conflict(candidate, spacing) {
                    grid.insert(candidate);
                    points.push(candidate);
                    active.push(candidate);
                    placed = true;
                    break;
                }
            }

            if !placed {
                active.swap_remove(index);
            }
        }

        points
    }
}

/// One jittered point per grid cell, relaxed apart and filtered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitteredGridSampler {
    /// Spacing multiplier.
    pub densification: f64,
    /// Fraction of a cell a point may be displaced from the cell centre.
    pub jitter: f64,
    /// Number of relaxation passes.
    pub relax_passes: u32,
}

impl JitteredGridSampler {
    /// Create a sampler with the default jitter and relaxation.
    #[must_use]
    pub const fn new(densification: f64) -> Self {
        Self {
            densification,
            jitter: 0.6,
            relax_passes: 8,
        }
    }

    /// Push pairs closer than `spacing` apart, each by half the overlap.
    fn relax(&self, points: &mut [Point], bounds: &Bounds, spacing: f64) {
        for _ in 0..self.relax_passes {
            let mut moved = false;
            for i in 0..points.len() {
                for j in (i + 1)..points.len() {
                    let distance = points[i].distance(points[j]);
                    if distance >= spacing || distance <= f64::EPSILON {
                        continue;
                    }
                    let push = (spacing - distance) / 2.0;
                    let dx = (points[j].x - points[i].x) / distance * push;
                    let dy = (points[j].y - points[i].y) / distance * push;
                    points[i] = bounds.clamp(Point::new(points[i].x - dx, points[i].y - dy));
                    points[j] = bounds.clamp(Point::new(points[j].x + dx, points[j].y + dy));
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }
    }
}

impl PointSampler for JitteredGridSampler {
    fn sample(&self, bounds: &Bounds, count: usize, rng: &mut dyn RngCore) -> Vec<Point> {
        if count == 0 || !bounds.is_usable() {
            return Vec::new();
        }

        let spacing = target_spacing(bounds, count, self.densification);
        let cols = ((bounds.usable_width() / spacing).floor() as usize).max(1);
        let rows = ((bounds.usable_height() / spacing).floor() as usize).max(1);
        let cell_w = bounds.usable_width() / cols as f64;
        let cell_h = bounds.usable_height() / rows as f64;

        let mut cells: Vec<(usize, usize)> = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (c, r)))
            .collect();
        cells.shuffle(rng);
        cells.truncate(count);

        let mut points: Vec<Point> = cells
            .into_iter()
            .map(|(c, r)| {
                let jx = (rng.random::<f64>() - 0.5) * self.jitter;
                let jy = (rng.random::<f64>() - 0.5) * self.jitter;
                bounds.clamp(Point::new(
                    bounds.margin + cell_w * (c as f64 + 0.5 + jx),
                    bounds.margin + cell_h * (r as f64 + 0.5 + jy),
                ))
            })
            .collect();

        self.relax(&mut points, bounds, spacing);

        let spacing_sq = spacing * spacing;
        let mut kept: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            if kept.iter().all(|q| p.distance_sq(*q) >= spacing_sq) {
                kept.push(p);
            }
        }
        kept
    }
}

impl SamplerKind {
    /// Sample territory centres for `config` with this strategy.
    pub fn sample(self, config: &MapConfig, count: usize, rng: &mut dyn RngCore) -> Vec<Point> {
        let bounds = Bounds::from_config(config);
        match self {
            Self::PoissonDisc => {
                PoissonDiscSampler::new(config.densification, config.placement_attempts)
                    .sample(&bounds, count, rng)
            }
            Self::JitteredGrid => {
                JitteredGridSampler::new(config.densification).sample(&bounds, count, rng)
            }
        }
    }
}
