#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Obstacle placement system that scatters pattern-shaped obstacles across the
//! board interior without splitting the remaining free cells.

mod pattern;

use std::collections::BTreeSet;

use cop_and_robber_core::{reachable_cells, CellCoord, ObstacleConfig};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, warn};

pub use pattern::{Offset, Pattern, PatternLibrary, Rotation};

const DEFAULT_MAX_ATTEMPTS: u32 = 2000;
const DEFAULT_ORIGINS_PER_VARIANT: u32 = 4;

/// A successfully placed pattern instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternPlacement {
    name: String,
    origin: CellCoord,
    cells: Vec<CellCoord>,
}

impl PatternPlacement {
    /// Name of the placed pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Origin the normalized variant was anchored at.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Cells covered by the placement.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }
}

/// Result of a placement run. May hold fewer placements than requested.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObstacleLayout {
    cells: BTreeSet<CellCoord>,
    placements: Vec<PatternPlacement>,
    requested: u32,
    attempts: u32,
}

impl ObstacleLayout {
    /// Every obstructed cell.
    #[must_use]
    pub fn cells(&self) -> &BTreeSet<CellCoord> {
        &self.cells
    }

    /// Placements in the order they succeeded.
    #[must_use]
    pub fn placements(&self) -> &[PatternPlacement] {
        &self.placements
    }

    /// Number of placements asked for.
    #[must_use]
    pub const fn requested(&self) -> u32 {
        self.requested
    }

    /// Outer iterations consumed.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Reports whether every requested placement succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.placements.len() >= usize::try_from(self.requested).unwrap_or(usize::MAX)
    }

    /// Consumes the layout, yielding the obstructed cells in order.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells.into_iter().collect()
    }
}

/// Randomized greedy placer with connectivity rollback.
#[derive(Clone, Debug)]
pub struct ObstaclePlacer {
    library: PatternLibrary,
    max_attempts: u32,
    origins_per_variant: u32,
}

impl ObstaclePlacer {
    /// Creates a placer drawing from `library` with the default attempt limits.
    #[must_use]
    pub fn new(library: PatternLibrary) -> Self {
        Self {
            library,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            origins_per_variant: DEFAULT_ORIGINS_PER_VARIANT,
        }
    }

    /// Creates a placer from configuration, choosing the standard or the
    /// single-cell library.
    #[must_use]
    pub fn from_config(config: &ObstacleConfig) -> Self {
        let library = if config.use_patterns {
            PatternLibrary::standard()
        } else {
            PatternLibrary::single_cells()
        };
        Self::new(library)
            .with_max_attempts(config.max_attempts)
            .with_origins_per_variant(config.origins_per_variant)
    }

    /// Overrides the outer iteration limit.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Overrides the number of origins tried per variant. At least one origin
    /// is always tried.
    #[must_use]
    pub fn with_origins_per_variant(mut self, origins: u32) -> Self {
        self.origins_per_variant = origins.max(1);
        self
    }

    /// Library the placer draws from.
    #[must_use]
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Places up to `count` patterns inside a `columns` x `rows` board.
    ///
    /// Placements never touch the wall or a cell in `avoid`, never overlap,
    /// and always leave at least one free interior cell with every free
    /// interior cell reachable from every other one.
    pub fn place<R>(
        &self,
        columns: u32,
        rows: u32,
        avoid: &BTreeSet<CellCoord>,
        count: u32,
        rng: &mut R,
    ) -> ObstacleLayout
    where
        R: Rng + ?Sized,
    {
        let mut layout = ObstacleLayout {
            requested: count,
            ..ObstacleLayout::default()
        };

        if columns < 3 || rows < 3 || count == 0 {
            return layout;
        }

        let target = usize::try_from(count).unwrap_or(usize::MAX);
        while layout.placements.len() < target && layout.attempts < self.max_attempts {
            layout.attempts += 1;

            let Some(pattern) = self.library.choose(rng) else {
                warn!("pattern library is empty, no obstacles placed");
                break;
            };

            let placed =
                self.try_pattern(pattern, columns, rows, avoid, &mut layout.cells, rng);
            if let Some(placement) = placed {
                debug!(
                    pattern = placement.name(),
                    column = placement.origin().column(),
                    row = placement.origin().row(),
                    "obstacle placed"
                );
                layout.placements.push(placement);
            }
        }

        if !layout.is_complete() {
            warn!(
                placed = layout.placements.len(),
                requested = count,
                attempts = layout.attempts,
                "obstacle placement stopped early"
            );
        }

        layout
    }

    fn try_pattern<R>(
        &self,
        pattern: &Pattern,
        columns: u32,
        rows: u32,
        avoid: &BTreeSet<CellCoord>,
        occupied: &mut BTreeSet<CellCoord>,
        rng: &mut R,
    ) -> Option<PatternPlacement>
    where
        R: Rng + ?Sized,
    {
        let mut variants = pattern.variants();
        variants.shuffle(rng);

        for variant in &variants {
            for _ in 0..self.origins_per_variant {
                let origin =
                    CellCoord::new(rng.gen_range(1..columns - 1), rng.gen_range(1..rows - 1));
                let Some(footprint) = project(origin, variant, columns, rows) else {
                    continue;
                };
                if footprint
                    .iter()
                    .any(|cell| occupied.contains(cell) || avoid.contains(cell))
                {
                    continue;
                }

                for cell in &footprint {
                    let _ = occupied.insert(*cell);
                }

                if free_interior_is_connected(columns, rows, occupied) {
                    return Some(PatternPlacement {
                        name: pattern.name().to_owned(),
                        origin,
                        cells: footprint,
                    });
                }

                for cell in &footprint {
                    let _ = occupied.remove(cell);
                }
            }
        }

        None
    }
}

impl Default for ObstaclePlacer {
    fn default() -> Self {
        Self::new(PatternLibrary::standard())
    }
}

fn project(
    origin: CellCoord,
    variant: &[Offset],
    columns: u32,
    rows: u32,
) -> Option<Vec<CellCoord>> {
    variant
        .iter()
        .map(|offset| {
            let column = u32::try_from(i64::from(origin.column()) + i64::from(offset.dx)).ok()?;
            let row = u32::try_from(i64::from(origin.row()) + i64::from(offset.dy)).ok()?;
            let cell = CellCoord::new(column, row);
            cell.is_interior_of(columns, rows).then_some(cell)
        })
        .collect()
}

/// Checks that at least one interior cell stays free and that a flood fill
/// from it reaches every other free interior cell.
fn free_interior_is_connected(columns: u32, rows: u32, occupied: &BTreeSet<CellCoord>) -> bool {
    let is_free = |cell: CellCoord| cell.is_interior_of(columns, rows) && !occupied.contains(&cell);

    let interior = u64::from(columns - 2) * u64::from(rows - 2);
    let free = interior.saturating_sub(occupied.len() as u64);
    if free == 0 {
        return false;
    }

    let seed = (1..rows - 1)
        .flat_map(|row| (1..columns - 1).map(move |column| CellCoord::new(column, row)))
        .find(|cell| is_free(*cell));
    let Some(seed) = seed else {
        return false;
    };

    reachable_cells(columns, rows, seed, is_free).len() as u64 == free
}
