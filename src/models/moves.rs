// src/models/moves.rs

//! Move tokens in standard cube notation.

use std::fmt;

/// A single move token such as `R`, `U2`, `F'` or `R2'`.
///
/// The face is whatever remains after stripping the turn suffix, so wide
/// moves (`Rw`) and rotations (`y`) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Face, layer or axis identifier
    pub face: String,

    /// Quarter turns clockwise, always in `1..=3`
    pub amount: u8,

    /// Render a half turn as `2'` instead of `2`
    pub prime_double: bool,
}

impl Move {
    /// Parse a whitespace-free token.
    pub fn parse(token: &str) -> Self {
        let (face, amount, prime_double) = if let Some(rest) = token.strip_suffix("2'") {
            (rest, 2, true)
        } else if let Some(rest) = token.strip_suffix('\'') {
            (rest, 3, false)
        } else if let Some(rest) = token.strip_suffix('2') {
            (rest, 2, false)
        } else {
            (token, 1, false)
        };

        Self {
            face: face.to_string(),
            amount,
            prime_double,
        }
    }

    /// Build a move from a raw quarter-turn count.
    ///
    /// Returns `None` when the turns cancel out.
    pub fn from_turns(face: &str, turns: u8, prime_double: bool) -> Option<Self> {
        match turns % 4 {
            0 => None,
            amount => Some(Self {
                face: face.to_string(),
                amount,
                prime_double: amount == 2 && prime_double,
            }),
        }
    }

    /// An inverse quarter turn (`R'`), not a half turn.
    pub fn is_prime_quarter(&self) -> bool {
        self.amount == 3
    }

    pub fn same_face(&self, other: &Move) -> bool {
        self.face == other.face
    }

    /// Combine with the move that immediately follows on the same face.
    pub fn merge(&self, next: &Move) -> Option<Move> {
        let prime_double = self.is_prime_quarter() && next.is_prime_quarter();
        Self::from_turns(&next.face, self.amount + next.amount, prime_double)
    }

    /// Top-layer turn (`U`, `U'`, `U2`, `U2'`).
    pub fn is_top_layer(&self) -> bool {
        self.face == "U"
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.amount, self.prime_double) {
            (2, true) => write!(f, "{}2'", self.face),
            (2, false) => write!(f, "{}2", self.face),
            (3, _) => write!(f, "{}'", self.face),
            _ => f.write_str(&self.face),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(Move::parse("R").amount, 1);
        assert_eq!(Move::parse("R'").amount, 3);
        assert_eq!(Move::parse("R2").amount, 2);

        let alt = Move::parse("R2'");
        assert_eq!(alt.face, "R");
        assert_eq!(alt.amount, 2);
        assert!(alt.prime_double);
    }

    #[test]
    fn test_parse_keeps_wide_faces() {
        let m = Move::parse("Rw'");
        assert_eq!(m.face, "Rw");
        assert!(m.is_prime_quarter());
    }

    #[test]
    fn test_display_preserves_token_text() {
        for token in ["R", "U'", "F2", "D2'", "Rw", "y'", "(U)"] {
            assert_eq!(Move::parse(token).to_string(), token);
        }
    }

    #[test]
    fn test_merge_amounts() {
        let r = Move::parse("R");
        let r_prime = Move::parse("R'");
        assert_eq!(r.merge(&r).map(|m| m.to_string()), Some("R2".into()));
        assert_eq!(r.merge(&r_prime), None);
        assert_eq!(
            Move::parse("R2").merge(&r).map(|m| m.to_string()),
            Some("R'".into())
        );
        assert_eq!(
            r_prime.merge(&r_prime).map(|m| m.to_string()),
            Some("R2'".into())
        );
    }

    #[test]
    fn test_half_turn_is_not_prime_quarter() {
        assert!(!Move::parse("R2'").is_prime_quarter());
        assert_eq!(
            Move::parse("R2'")
                .merge(&Move::parse("R2'"))
                .map(|m| m.to_string()),
            None
        );
    }

    #[test]
    fn test_top_layer() {
        assert!(Move::parse("U2'").is_top_layer());
        assert!(!Move::parse("Uw").is_top_layer());
        assert!(!Move::parse("(U)").is_top_layer());
    }
}
