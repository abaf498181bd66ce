// src/services/normalizer.rs

//! ZBLL move-sequence normalization.
//!
//! Turns a transcribed move sequence into the canonical form stored in the
//! result files:
//!
//! 1. adjacent turns of the same face are merged into their net turn,
//! 2. leading top-layer turns are kept as parenthesized setup moves,
//! 3. trailing top-layer turns are dropped.

use crate::models::Move;

/// Normalize a whitespace-separated move sequence.
///
/// ```
/// use reco_zbll::services::normalize;
///
/// assert_eq!(normalize("U2 R U R' U'"), "(U2) R U R'");
/// ```
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut moves = merge_adjacent(raw.split_whitespace().map(Move::parse));

    let setup: Vec<Move> = {
        let leading = moves.iter().take_while(|m| m.is_top_layer()).count();
        moves.drain(..leading).collect()
    };
    while moves.last().is_some_and(Move::is_top_layer) {
        moves.pop();
    }

    let body = join(moves.iter().map(Move::to_string));
    let setup = join(setup.iter().map(|m| format!("({m})")));

    match (setup.is_empty(), body.is_empty()) {
        (true, _) => body,
        (false, true) => setup,
        (false, false) => format!("{setup} {body}"),
    }
}

/// Single left-to-right pass merging each move into the top of the stack.
fn merge_adjacent(moves: impl Iterator<Item = Move>) -> Vec<Move> {
    let mut stack: Vec<Move> = Vec::new();

    for next in moves {
        match stack.last() {
            Some(top) if top.same_face(&next) => {
                let merged = top.merge(&next);
                stack.pop();
                stack.extend(merged);
            }
            _ => stack.push(next),
        }
    }

    stack
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(None::<&str>.map(normalize), None);
    }

    #[test]
    fn test_merges_to_half_turn() {
        assert_eq!(normalize("R R"), "R2");
        assert_eq!(normalize("R2 R2'"), "");
        assert_eq!(normalize("R R2"), "R'");
    }

    #[test]
    fn test_two_primes_keep_prime_double() {
        assert_eq!(normalize("R' R'"), "R2'");
        assert_eq!(normalize("F R' R' F'"), "F R2' F'");
        // only direct prime quarters qualify
        assert_eq!(normalize("R2' R2' R"), "R");
        assert_eq!(normalize("R2 R'"), "R");
    }

    #[test]
    fn test_full_cancellation() {
        assert_eq!(normalize("R R'"), "");
        assert_eq!(normalize("R U U' R'"), "");
    }

    #[test]
    fn test_merge_after_cancellation() {
        // U U' vanishes, leaving the two R turns adjacent
        assert_eq!(normalize("F R U U' R"), "F R2");
    }

    #[test]
    fn test_non_adjacent_same_face_untouched() {
        assert_eq!(normalize("R U R'"), "R U R'");
        assert_eq!(normalize("R F R F'"), "R F R F'");
    }

    #[test]
    fn test_leading_top_layer_parenthesized() {
        assert_eq!(normalize("U2 R"), "(U2) R");
        assert_eq!(normalize("U R U"), "(U) R");
        assert_eq!(normalize("U R U2 U'"), "(U) R");
        assert_eq!(normalize("U' y U R"), "(U') y U R");
    }

    #[test]
    fn test_trailing_top_layer_dropped() {
        assert_eq!(normalize("R U2"), "R");
        assert_eq!(normalize("R U2' F U"), "R U2' F");
    }

    #[test]
    fn test_only_top_layer_moves() {
        assert_eq!(normalize("U"), "(U)");
        assert_eq!(normalize("U2'"), "(U2')");
        assert_eq!(normalize("U U"), "(U2)");
        assert_eq!(normalize("U U'"), "");
    }

    #[test]
    fn test_wide_top_layer_is_not_setup() {
        assert_eq!(normalize("Uw R Uw"), "Uw R Uw");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  R   U\tR'  U' "), "R U R'");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "U R U R' U R U2 R'",
            "U' R' R' U2 F R U R' U' F' U",
            "R U2' R' U' R U' R'",
            "U U2 y R U R' U'",
            "U",
            "R R' U U'",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input}");
        }
    }
}
