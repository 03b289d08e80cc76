//! Closed value sets for the categorical columns.
//!
//! The raw file encodes some of these differently from how they are shown
//! (`M`/`F`, `0`/`1`). Each type accepts both the raw code and its display
//! label, so a table that was already normalized loads unchanged.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw {
            "M" | "Male" => Some(Self::Male),
            "F" | "Female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaritalStatus {
    Married,
    Single,
}

impl MaritalStatus {
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw {
            "0" | "Single" => Some(Self::Single),
            "1" | "Married" => Some(Self::Married),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CityCategory {
    A,
    B,
    C,
}

impl CityCategory {
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

/// Age brackets as published in the dataset. Declaration order matches the
/// lexical order of the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBracket {
    UpTo17,
    From18To25,
    From26To35,
    From36To45,
    From46To50,
    From51To55,
    Over55,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 7] = [
        Self::UpTo17,
        Self::From18To25,
        Self::From26To35,
        Self::From36To45,
        Self::From46To50,
        Self::From51To55,
        Self::Over55,
    ];

    pub fn from_code(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UpTo17 => "0-17",
            Self::From18To25 => "18-25",
            Self::From26To35 => "26-35",
            Self::From36To45 => "36-45",
            Self::From46To50 => "46-50",
            Self::From51To55 => "51-55",
            Self::Over55 => "55+",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(Gender, MaritalStatus, CityCategory, AgeBracket);
