//! Hand-rolled error types for the two recoverable error kinds named in
//! spec.md §7: malformed FEN and malformed UCI move. No `thiserror` —
//! matching the teacher, these implement `Display`/`Error` directly.

use std::error::Error;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount { found: usize },
    BadBoardField(String),
    BadSideField(String),
    BadCastlingField(String),
    BadEnPassantField(String),
    BadCounterField(String),
    RankTooShort { rank: usize },
    RankTooLong { rank: usize },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount { found } => {
                write!(f, "FEN must have 6 space-separated fields, found {found}")
            }
            FenError::BadBoardField(s) => write!(f, "malformed board field: {s}"),
            FenError::BadSideField(s) => write!(f, "malformed side-to-move field: {s}"),
            FenError::BadCastlingField(s) => write!(f, "malformed castling field: {s}"),
            FenError::BadEnPassantField(s) => write!(f, "malformed en passant field: {s}"),
            FenError::BadCounterField(s) => write!(f, "malformed counter field: {s}"),
            FenError::RankTooShort { rank } => write!(f, "rank {rank} has fewer than 8 files"),
            FenError::RankTooLong { rank } => write!(f, "rank {rank} has more than 8 files"),
        }
    }
}
impl Error for FenError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    WrongLength(String),
    BadSquare(String),
    BadPromotionPiece(char),
    NotPseudoLegal(String),
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::WrongLength(s) => {
                write!(f, "UCI move must be 4 or 5 characters, got {s:?}")
            }
            MoveParseError::BadSquare(s) => write!(f, "not a valid square: {s}"),
            MoveParseError::BadPromotionPiece(c) => write!(f, "not a valid promotion piece: {c}"),
            MoveParseError::NotPseudoLegal(s) => {
                write!(f, "{s} does not match any pseudo-legal move in this position")
            }
        }
    }
}
impl Error for MoveParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_non_empty() {
        assert!(!FenError::WrongFieldCount { found: 3 }.to_string().is_empty());
        assert!(!MoveParseError::WrongLength("e2".into()).to_string().is_empty());
        assert!(!MoveParseError::BadSquare("z9".into()).to_string().is_empty());
        assert!(!MoveParseError::BadPromotionPiece('x').to_string().is_empty());
        assert!(!MoveParseError::NotPseudoLegal("e2e5".into()).to_string().is_empty());
    }
}
