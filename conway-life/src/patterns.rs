use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use world_grid::Loc;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown pattern {name:?}")]
pub struct UnknownPatternError {
    pub name: String,
}

/// Named starting states for a `ConwayWorld`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Random,
    Glider,
    Pulsar,
    GosperGliderGun,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Random,
        Pattern::Glider,
        Pattern::Pulsar,
        Pattern::GosperGliderGun,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Random => "random",
            Pattern::Glider => "glider",
            Pattern::Pulsar => "pulsar",
            Pattern::GosperGliderGun => "gospergun",
        }
    }

    /// Live cells as `(row, col)` offsets from `origin()`. `None` for `Random`.
    pub fn cells(&self) -> Option<&'static [(u32, u32)]> {
        match self {
            Pattern::Random => None,
            Pattern::Glider => Some(GLIDER),
            Pattern::Pulsar => Some(PULSAR),
            Pattern::GosperGliderGun => Some(GOSPER_GLIDER_GUN),
        }
    }

    pub fn origin(&self) -> Loc {
        match self {
            Pattern::Pulsar => Loc::new(5, 10),
            _ => Loc::new(5, 5),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = UnknownPatternError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "random" => Ok(Pattern::Random),
            "glider" => Ok(Pattern::Glider),
            "pulsar" => Ok(Pattern::Pulsar),
            "gospergun" | "gosper-glider-gun" => Ok(Pattern::GosperGliderGun),
            _ => Err(UnknownPatternError {
                name: name.to_string(),
            }),
        }
    }
}

const GLIDER: &[(u32, u32)] = &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];

// Period 3.
#[rustfmt::skip]
const PULSAR: &[(u32, u32)] = &[
    (2, 4), (2, 5), (2, 6), (2, 10), (2, 11), (2, 12),
    (4, 2), (5, 2), (6, 2), (4, 7), (5, 7), (6, 7),
    (4, 9), (5, 9), (6, 9), (4, 14), (5, 14), (6, 14),
    (7, 4), (7, 5), (7, 6), (7, 10), (7, 11), (7, 12),
    (9, 4), (9, 5), (9, 6), (9, 10), (9, 11), (9, 12),
    (10, 2), (11, 2), (12, 2), (10, 7), (11, 7), (12, 7),
    (10, 9), (11, 9), (12, 9), (10, 14), (11, 14), (12, 14),
    (14, 4), (14, 5), (14, 6), (14, 10), (14, 11), (14, 12),
];

// Period 30, emits a glider heading down and right.
#[rustfmt::skip]
const GOSPER_GLIDER_GUN: &[(u32, u32)] = &[
    (5, 1), (5, 2), (6, 1), (6, 2),
    (5, 11), (6, 11), (7, 11), (4, 12), (8, 12),
    (3, 13), (9, 13), (3, 14), (9, 14), (6, 15),
    (4, 16), (8, 16), (5, 17), (6, 17), (7, 17), (6, 18),
    (3, 21), (4, 21), (5, 21), (3, 22), (4, 22), (5, 22),
    (2, 23), (6, 23), (1, 25), (2, 25), (6, 25), (7, 25),
    (3, 35), (4, 35), (3, 36), (4, 36),
];
