//! Dice and rock-paper-scissors.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Roll an integer in `[minimum, maximum]`. `None` when the range is empty.
pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R, minimum: i64, maximum: i64) -> Option<i64> {
    (minimum <= maximum).then(|| rng.gen_range(minimum..=maximum))
}

/// A rock-paper-scissors hand.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Hand {
    /// Beats scissors
    Rock,
    /// Beats rock
    Paper,
    /// Beats paper
    Scissors,
}

/// Result of a round, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Outcome {
    /// Player wins
    Win,
    /// Player loses
    Lose,
    /// Same hand
    Draw,
}

impl Hand {
    /// The hand this one beats.
    pub fn beats(self) -> Hand {
        match self {
            Hand::Rock => Hand::Scissors,
            Hand::Paper => Hand::Rock,
            Hand::Scissors => Hand::Paper,
        }
    }

    /// Play `self` against `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use coven_core::{Hand, Outcome};
    ///
    /// assert_eq!(Hand::Rock.versus(Hand::Scissors), Outcome::Win);
    /// assert_eq!(Hand::Rock.versus(Hand::Paper), Outcome::Lose);
    /// assert_eq!(Hand::Rock.versus(Hand::Rock), Outcome::Draw);
    /// ```
    pub fn versus(self, other: Hand) -> Outcome {
        if self == other {
            Outcome::Draw
        } else if self.beats() == other {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }

    /// A uniformly random hand.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Hand {
        match rng.gen_range(0..3) {
            0 => Hand::Rock,
            1 => Hand::Paper,
            _ => Hand::Scissors,
        }
    }
}
