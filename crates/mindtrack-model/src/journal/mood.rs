use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("mood must be between {min} and {max}, got {0}", min = Mood::MIN, max = Mood::MAX)]
pub struct InvalidMood(pub i64);

/// Mood rating from 1 (very sad) to 5 (very happy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i64", into = "u8")]
#[schema(value_type = u8)]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn all() -> impl Iterator<Item = Mood> {
        (Self::MIN..=Self::MAX).map(Mood)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Very Sad",
            2 => "Sad",
            3 => "Neutral",
            4 => "Happy",
            _ => "Very Happy",
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self.0 {
            1 => "😢",
            2 => "😔",
            3 => "😐",
            4 => "😊",
            _ => "😄",
        }
    }
}

impl TryFrom<i64> for Mood {
    type Error = InvalidMood;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|mood| (Self::MIN..=Self::MAX).contains(mood))
            .map(Mood)
            .ok_or(InvalidMood(value))
    }
}

impl TryFrom<i16> for Mood {
    type Error = InvalidMood;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<Mood> for u8 {
    fn from(value: Mood) -> Self {
        value.0
    }
}

impl From<Mood> for i16 {
    fn from(value: Mood) -> Self {
        i16::from(value.0)
    }
}
