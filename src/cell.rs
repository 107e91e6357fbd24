//! Hierarchical cell addressing.
//!
//! The trie never decodes cell identifiers itself. It only needs the face a
//! cell lives on, the level it was defined at, and the child position taken
//! at each level on the way down. [`CellAddress`] captures exactly that, and
//! is implemented for S2's [`CellID`].
//!
//! ```text
//! face 0..6          level 1             level 2
//! ┌──────────┐     ┌────┬────┐        ┌──┬──┬────┐
//! │          │     │ 0  │ 3  │        │00│01│    │
//! │   root   │ ──► ├────┼────┤  ──►   ├──┼──┤ 3  │
//! │          │     │ 1  │ 2  │        │..│..│    │
//! └──────────┘     └────┴────┘        └──┴──┴────┘
//! ```
//! (positions follow the Hilbert curve order of the addressing scheme)

use s2::cellid::CellID;

/// Number of top-level faces.
pub const FACE_COUNT: usize = 6;

/// Number of children of every cell.
pub const CHILD_COUNT: usize = 4;

/// Deepest level of the subdivision.
pub const MAX_LEVEL: u8 = 30;

/// A cell identifier as seen by the trie.
///
/// Implementations must return `face() < FACE_COUNT`, `level() <= MAX_LEVEL`
/// and `child_position(l) < CHILD_COUNT` for every `l` in `1..=MAX_LEVEL`.
/// For `l > level()` the position is the one taken by the identifier's
/// canonical descendant.
pub trait CellAddress {
    /// Face index in `[0, 6)`.
    fn face(&self) -> usize;

    /// Level the identifier was defined at, in `[0, 30]`.
    fn level(&self) -> u8;

    /// Child position in `[0, 4)` chosen at `level` (1-based).
    fn child_position(&self, level: u8) -> usize;
}

impl CellAddress for CellID {
    fn face(&self) -> usize {
        CellID::face(self) as usize
    }

    fn level(&self) -> u8 {
        CellID::level(self) as u8
    }

    fn child_position(&self, level: u8) -> usize {
        CellID::child_position(self, u64::from(level)) as usize
    }
}

impl<C: CellAddress + ?Sized> CellAddress for &C {
    fn face(&self) -> usize {
        (**self).face()
    }

    fn level(&self) -> u8 {
        (**self).level()
    }

    fn child_position(&self, level: u8) -> usize {
        (**self).child_position(level)
    }
}
