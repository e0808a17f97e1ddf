//! Library coordinates: the four-part address of a book slot.
//!
//! The hexagon axis is unbounded (it stands in for the infinite shelving);
//! wall, shelf and volume are small bounded axes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::library::error::{LibraryError, LibraryResult};

/// Number of walls per hexagon.
pub const WALLS: u32 = 6;
/// Number of shelves per wall.
pub const SHELVES: u32 = 5;
/// Number of volumes per shelf.
pub const VOLUMES: u32 = 32;

/// Address of one book slot: `hexagon.wall.shelf.volume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    pub hexagon: u64,
    pub wall: u32,
    pub shelf: u32,
    pub volume: u32,
}

/// Unchecked wire form; deserialization goes through [`Coordinate::new`].
#[derive(Deserialize)]
struct RawCoordinate {
    hexagon: u64,
    wall: u32,
    shelf: u32,
    volume: u32,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = LibraryError;

    fn try_from(raw: RawCoordinate) -> LibraryResult<Self> {
        Self::new(raw.hexagon, raw.wall, raw.shelf, raw.volume)
    }
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range bounded axes.
    pub fn new(hexagon: u64, wall: u32, shelf: u32, volume: u32) -> LibraryResult<Self> {
        let coord = Self {
            hexagon,
            wall,
            shelf,
            volume,
        };
        coord.validate()?;
        Ok(coord)
    }

    /// Build a coordinate by reducing each bounded axis modulo its size.
    ///
    /// Used wherever coordinates are derived arithmetically.
    pub fn wrapping(hexagon: u64, wall: u64, shelf: u64, volume: u64) -> Self {
        Self {
            hexagon,
            wall: (wall % u64::from(WALLS)) as u32,
            shelf: (shelf % u64::from(SHELVES)) as u32,
            volume: (volume % u64::from(VOLUMES)) as u32,
        }
    }

    /// Check the bounded axes.
    pub fn validate(&self) -> LibraryResult<()> {
        let check = |axis: &str, value: u32, bound: u32| {
            if value < bound {
                Ok(())
            } else {
                Err(LibraryError::InvalidCoordinate {
                    coordinate: self.to_string(),
                    message: format!("{axis} {value} must be below {bound}"),
                })
            }
        };
        check("wall", self.wall, WALLS)?;
        check("shelf", self.shelf, SHELVES)?;
        check("volume", self.volume, VOLUMES)
    }

    /// The same slot with its volume shifted by `offset`, wrapping around the shelf.
    pub fn with_volume_offset(&self, offset: i32) -> Self {
        let volume = (i64::from(self.volume) + i64::from(offset)).rem_euclid(i64::from(VOLUMES));
        Self {
            volume: volume as u32,
            ..*self
        }
    }

    /// Canonical identifier, `"hex.wall.shelf.vol"`.
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.hexagon, self.wall, self.shelf, self.volume
        )
    }
}

impl FromStr for Coordinate {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| LibraryError::InvalidCoordinate {
            coordinate: s.to_string(),
            message,
        };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 4 {
            return Err(invalid(format!(
                "expected 4 dot-separated parts, found {}",
                parts.len()
            )));
        }
        if parts[0].starts_with('-') {
            return Err(invalid("hexagon must not be negative".into()));
        }

        let hexagon: u64 = parts[0]
            .parse()
            .map_err(|e| invalid(format!("hexagon: {e}")))?;
        let mut axes = [0u32; 3];
        for (slot, (name, raw)) in axes
            .iter_mut()
            .zip(["wall", "shelf", "volume"].into_iter().zip(&parts[1..]))
        {
            *slot = raw.parse().map_err(|e| invalid(format!("{name}: {e}")))?;
        }

        Coordinate::new(hexagon, axes[0], axes[1], axes[2])
    }
}
