//! Obstacle shapes and their rotated or mirrored variants.

use std::collections::BTreeSet;

use rand::{seq::SliceRandom, Rng};

/// Relative cell of a pattern, measured from the pattern origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    /// Column delta.
    pub dx: i32,
    /// Row delta.
    pub dy: i32,
}

impl Offset {
    /// Creates a new offset.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    fn mirrored(self) -> Self {
        Self::new(-self.dx, self.dy)
    }
}

/// Quarter-turn rotations a pattern may be placed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    /// Unrotated.
    Deg0,
    /// Quarter turn counter-clockwise.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three quarter turns counter-clockwise.
    Deg270,
}

impl Rotation {
    /// Every rotation.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotates an offset about the origin.
    #[must_use]
    pub const fn apply(self, offset: Offset) -> Offset {
        match self {
            Self::Deg0 => offset,
            Self::Deg90 => Offset::new(-offset.dy, offset.dx),
            Self::Deg180 => Offset::new(-offset.dx, -offset.dy),
            Self::Deg270 => Offset::new(offset.dy, -offset.dx),
        }
    }
}

/// Named obstacle shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    name: String,
    allow_mirror: bool,
    rotations: Vec<Rotation>,
    offsets: Vec<Offset>,
}

impl Pattern {
    /// Creates a pattern. An empty rotation list means unrotated only and an
    /// empty offset list means a single cell.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        allow_mirror: bool,
        rotations: impl IntoIterator<Item = Rotation>,
        offsets: impl IntoIterator<Item = (i32, i32)>,
    ) -> Self {
        let mut rotations: Vec<Rotation> = rotations.into_iter().collect();
        rotations.sort();
        rotations.dedup();
        if rotations.is_empty() {
            rotations.push(Rotation::Deg0);
        }

        let mut offsets: Vec<Offset> = offsets
            .into_iter()
            .map(|(dx, dy)| Offset::new(dx, dy))
            .collect();
        if offsets.is_empty() {
            offsets.push(Offset::new(0, 0));
        }

        Self {
            name: name.into(),
            allow_mirror,
            rotations,
            offsets,
        }
    }

    /// The trivial one-cell pattern.
    #[must_use]
    pub fn single_cell() -> Self {
        Self::new("single", false, [Rotation::Deg0], [(0, 0)])
    }

    /// Name of the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether horizontally mirrored variants are allowed.
    #[must_use]
    pub const fn allow_mirror(&self) -> bool {
        self.allow_mirror
    }

    /// Allowed rotations.
    #[must_use]
    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    /// Offsets of the unrotated shape.
    #[must_use]
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// Distinct placeable shapes: each allowed rotation, plus its horizontal
    /// mirror when permitted, normalized so the smallest offsets are zero.
    #[must_use]
    pub fn variants(&self) -> Vec<Vec<Offset>> {
        let mut unique = BTreeSet::new();
        for rotation in &self.rotations {
            let rotated: Vec<Offset> = self
                .offsets
                .iter()
                .map(|offset| rotation.apply(*offset))
                .collect();

            if self.allow_mirror {
                let mirrored = rotated.iter().map(|offset| offset.mirrored()).collect();
                let _ = unique.insert(normalize(mirrored));
            }
            let _ = unique.insert(normalize(rotated));
        }
        unique.into_iter().collect()
    }
}

fn normalize(mut offsets: Vec<Offset>) -> Vec<Offset> {
    let min_dx = offsets.iter().map(|offset| offset.dx).min().unwrap_or(0);
    let min_dy = offsets.iter().map(|offset| offset.dy).min().unwrap_or(0);
    for offset in &mut offsets {
        offset.dx -= min_dx;
        offset.dy -= min_dy;
    }
    offsets.sort();
    offsets.dedup();
    offsets
}

/// Set of patterns the placer draws from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
}

impl PatternLibrary {
    /// Creates a library from explicit patterns.
    #[must_use]
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// Lines, corners, an L, a box, a snake and a T.
    #[must_use]
    pub fn standard() -> Self {
        use Rotation::{Deg0, Deg90};

        Self::new(vec![
            Pattern::new("line2", false, [Deg0, Deg90], [(0, 0), (1, 0)]),
            Pattern::new("line3", false, [Deg0, Deg90], [(0, 0), (1, 0), (2, 0)]),
            Pattern::new("corner", false, Rotation::ALL, [(0, 0), (1, 0), (0, 1)]),
            Pattern::new("line4", false, [Deg0, Deg90], [(0, 0), (1, 0), (2, 0), (3, 0)]),
            Pattern::new("L", false, Rotation::ALL, [(0, 0), (1, 0), (0, 1), (0, 2)]),
            Pattern::new("box", false, [Deg0], [(0, 0), (1, 0), (0, 1), (1, 1)]),
            Pattern::new("snake", true, [Deg0, Deg90], [(0, 0), (1, 0), (1, 1), (2, 1)]),
            Pattern::new("T", false, Rotation::ALL, [(-1, 0), (0, 0), (1, 0), (0, 1)]),
        ])
    }

    /// Only the one-cell pattern.
    #[must_use]
    pub fn single_cells() -> Self {
        Self::new(vec![Pattern::single_cell()])
    }

    /// Patterns in the library.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Picks a pattern uniformly.
    pub fn choose<R>(&self, rng: &mut R) -> Option<&Pattern>
    where
        R: Rng + ?Sized,
    {
        self.patterns.choose(rng)
    }

    /// Looks a pattern up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant_count(name: &str) -> usize {
        PatternLibrary::standard()
            .get(name)
            .map(|pattern| pattern.variants().len())
            .unwrap_or_default()
    }

    #[test]
    fn standard_variant_counts() {
        assert_eq!(variant_count("box"), 1);
        assert_eq!(variant_count("line2"), 2);
        assert_eq!(variant_count("line3"), 2);
        assert_eq!(variant_count("line4"), 2);
        assert_eq!(variant_count("corner"), 4);
        assert_eq!(variant_count("L"), 4);
        assert_eq!(variant_count("T"), 4);
        assert_eq!(variant_count("snake"), 4);
    }

    #[test]
    fn variants_are_normalized() {
        for pattern in PatternLibrary::standard().patterns() {
            for variant in pattern.variants() {
                assert_eq!(variant.len(), pattern.offsets().len(), "{}", pattern.name());
                assert_eq!(variant.iter().map(|o| o.dx).min(), Some(0));
                assert_eq!(variant.iter().map(|o| o.dy).min(), Some(0));
            }
        }
    }

    #[test]
    fn rotations_follow_quarter_turns() {
        let offset = Offset::new(2, 1);
        assert_eq!(Rotation::Deg90.apply(offset), Offset::new(-1, 2));
        assert_eq!(Rotation::Deg180.apply(offset), Offset::new(-2, -1));
        assert_eq!(Rotation::Deg270.apply(offset), Offset::new(1, -2));
    }

    #[test]
    fn empty_definitions_fall_back_to_single_unrotated_cell() {
        let pattern = Pattern::new("empty", true, Vec::<Rotation>::new(), Vec::<(i32, i32)>::new());
        assert_eq!(pattern.rotations(), &[Rotation::Deg0]);
        assert_eq!(pattern.variants(), vec![vec![Offset::new(0, 0)]]);
    }
}
