//! Kick table - rotation-transition offsets
//!
//! Two families: `I` has its own table, `J/L/S/T/Z` share one. Entries are
//! keyed by the exact `(from, to)` pair; clockwise and counter-clockwise
//! transitions are listed separately rather than derived by negation.
//! Offsets are `(col, row)` with row-positive meaning *up*, so callers
//! subtract the row delta from a board row.
//!
//! Half-turn transitions (`0<->2`, `1<->3`) have no entries and are
//! unsupported: a lookup for them yields `None`.

use crate::types::{PieceKind, Rotation};

/// Candidate offsets in the order they are tried
pub type KickOffsets = [(i8, i8); 5];

type KickEntry = ((Rotation, Rotation), KickOffsets);

/// Which kick table a piece uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickFamily {
    I,
    Jlstz,
}

impl KickFamily {
    /// `None` for `O`, which never rotates
    pub fn of(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::O => None,
            PieceKind::I => Some(KickFamily::I),
            PieceKind::T | PieceKind::L | PieceKind::J | PieceKind::S | PieceKind::Z => {
                Some(KickFamily::Jlstz)
            }
        }
    }

    fn entries(self) -> &'static [KickEntry; 8] {
        match self {
            KickFamily::I => &I_KICKS,
            KickFamily::Jlstz => &JLSTZ_KICKS,
        }
    }
}

use Rotation::{East as E, North as N, South as S, West as W};

const JLSTZ_KICKS: [KickEntry; 8] = [
    ((N, E), [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]),
    ((E, N), [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]),
    ((E, S), [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)]),
    ((S, E), [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)]),
    ((S, W), [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)]),
    ((W, S), [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]),
    ((W, N), [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]),
    ((N, W), [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)]),
];

const I_KICKS: [KickEntry; 8] = [
    ((N, E), [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]),
    ((E, N), [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)]),
    ((E, S), [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)]),
    ((S, E), [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)]),
    ((S, W), [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)]),
    ((W, S), [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)]),
    ((W, N), [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)]),
    ((N, W), [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)]),
];

/// Ordered kick candidates for a transition, if the table lists it
pub fn kick_offsets(
    family: KickFamily,
    from: Rotation,
    to: Rotation,
) -> Option<&'static KickOffsets> {
    family
        .entries()
        .iter()
        .find(|(pair, _)| *pair == (from, to))
        .map(|(_, offsets)| offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_quarter_turn_is_listed() {
        for family in [KickFamily::I, KickFamily::Jlstz] {
            for from in Rotation::ALL {
                assert!(kick_offsets(family, from, from.rotate_cw()).is_some());
                assert!(kick_offsets(family, from, from.rotate_ccw()).is_some());
            }
        }
    }

    #[test]
    fn test_half_turns_unsupported() {
        for family in [KickFamily::I, KickFamily::Jlstz] {
            assert!(kick_offsets(family, N, S).is_none());
            assert!(kick_offsets(family, E, W).is_none());
            assert!(kick_offsets(family, S, N).is_none());
            assert!(kick_offsets(family, W, E).is_none());
        }
    }

    #[test]
    fn test_first_candidate_is_in_place() {
        for family in [KickFamily::I, KickFamily::Jlstz] {
            for (_, offsets) in family.entries() {
                assert_eq!(offsets[0], (0, 0));
            }
        }
    }

    #[test]
    fn test_family_lookup() {
        assert_eq!(KickFamily::of(PieceKind::O), None);
        assert_eq!(KickFamily::of(PieceKind::I), Some(KickFamily::I));
        assert_eq!(KickFamily::of(PieceKind::T), Some(KickFamily::Jlstz));
        assert_eq!(
            kick_offsets(KickFamily::I, N, E).map(|k| k[1]),
            Some((-2, 0))
        );
        assert_eq!(
            kick_offsets(KickFamily::Jlstz, N, W).map(|k| k[2]),
            Some((1, 1))
        );
    }
}
