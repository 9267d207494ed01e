#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system that chooses distinct starting cells for both players and
//! every treasure.

use std::collections::BTreeSet;

use cop_and_robber_core::{CellCoord, Role};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;
use tracing::{debug, warn};

/// Failures raised while planning spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The interior cannot hold both players.
    #[error("a {columns}x{rows} board has no room for both players")]
    InsufficientSpace {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

/// Distinct spawn cells for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnPlan {
    robber: CellCoord,
    cop: CellCoord,
    treasures: Vec<CellCoord>,
}

impl SpawnPlan {
    /// Spawn cell of the role.
    #[must_use]
    pub const fn spawn(&self, role: Role) -> CellCoord {
        match role {
            Role::Robber => self.robber,
            Role::Cop => self.cop,
        }
    }

    /// Treasure cells.
    #[must_use]
    pub fn treasures(&self) -> &[CellCoord] {
        &self.treasures
    }

    /// Every planned cell, which obstacle placement must keep clear.
    #[must_use]
    pub fn reserved_cells(&self) -> BTreeSet<CellCoord> {
        [self.robber, self.cop]
            .into_iter()
            .chain(self.treasures.iter().copied())
            .collect()
    }

    /// Consumes the plan, yielding the robber spawn, the cop spawn and the
    /// treasure cells.
    #[must_use]
    pub fn into_parts(self) -> (CellCoord, CellCoord, Vec<CellCoord>) {
        (self.robber, self.cop, self.treasures)
    }
}

/// Pure system that plans spawn cells.
#[derive(Clone, Copy, Debug)]
pub struct Spawning {
    treasure_count: u32,
}

impl Spawning {
    /// Creates a spawning system placing `treasure_count` treasures.
    #[must_use]
    pub const fn new(treasure_count: u32) -> Self {
        Self { treasure_count }
    }

    /// Shuffles the interior of a `columns` x `rows` board and deals distinct
    /// cells to the robber, the cop and the treasures.
    ///
    /// The treasure count is clamped to the cells left after both players.
    pub fn plan<R>(&self, columns: u32, rows: u32, rng: &mut R) -> Result<SpawnPlan, SpawnError>
    where
        R: Rng + ?Sized,
    {
        let mut cells: Vec<CellCoord> = (1..rows.saturating_sub(1))
            .flat_map(|row| {
                (1..columns.saturating_sub(1)).map(move |column| CellCoord::new(column, row))
            })
            .collect();

        if cells.len() < 2 {
            return Err(SpawnError::InsufficientSpace { columns, rows });
        }

        cells.shuffle(rng);
        let mut dealt = cells.into_iter();
        let (Some(robber), Some(cop)) = (dealt.next(), dealt.next()) else {
            return Err(SpawnError::InsufficientSpace { columns, rows });
        };

        let wanted = usize::try_from(self.treasure_count).unwrap_or(usize::MAX);
        let treasures: Vec<CellCoord> = dealt.take(wanted).collect();
        if treasures.len() < wanted {
            warn!(
                requested = self.treasure_count,
                placed = treasures.len(),
                "not enough room for every treasure"
            );
        }

        debug!(
            robber = ?robber,
            cop = ?cop,
            treasures = treasures.len(),
            "spawns planned"
        );

        Ok(SpawnPlan {
            robber,
            cop,
            treasures,
        })
    }
}
