//! Type definitions for `aoe_core`.
//!
//! The decoded-match data model handed over by the external replay parser,
//! plus the resource types shared across the engine.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::MetricsError;

/// Stable small player identifier (1..N). The join key across all outputs.
pub type PlayerId = u8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub number: PlayerId,
    pub name: String,
    /// Palette index assigned by the game lobby, when known.
    pub color_id: Option<u8>,
}

/// One decoded event from the match command stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Time since match start.
    pub timestamp: Duration,
    /// Issuing player. Unattributed actions (chat, view, sync) carry `None`.
    pub player: Option<PlayerId>,
    /// Symbolic event-type name from the replay parser, e.g. `DE_QUEUE` or `ORDER`.
    pub kind: String,
    /// Event-type-specific data bag. Shapes vary across game and format versions.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Action {
    /// Timestamp as fractional seconds since match start.
    pub fn seconds(&self) -> f64 {
        self.timestamp.as_secs_f64()
    }
}

/// A fully decoded match. The engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub players: Vec<Player>,
    /// Ordered by occurrence; ties between equal timestamps are possible.
    pub actions: Vec<Action>,
    pub duration: Duration,
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// The closed set of stockpiled resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Food,
    Wood,
    Gold,
    Stone,
}

impl Resource {
    pub const ALL: [Resource; 4] = [Resource::Food, Resource::Wood, Resource::Gold, Resource::Stone];

    pub fn name(self) -> &'static str {
        match self {
            Resource::Food => "food",
            Resource::Wood => "wood",
            Resource::Gold => "gold",
            Resource::Stone => "stone",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Resource::Food),
            "wood" => Ok(Resource::Wood),
            "gold" => Ok(Resource::Gold),
            "stone" => Ok(Resource::Stone),
            _ => Err(MetricsError::UnsupportedResource(s.to_string())),
        }
    }
}

/// Amount required to produce one unit of a named entity.
/// Standard random-map values; civ and tech discounts not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub food: u32,
    pub wood: u32,
    pub gold: u32,
    pub stone: u32,
}

impl ResourceCost {
    pub const fn new(food: u32, wood: u32, gold: u32, stone: u32) -> Self {
        Self {
            food,
            wood,
            gold,
            stone,
        }
    }

    pub fn get(self, resource: Resource) -> u32 {
        match resource {
            Resource::Food => self.food,
            Resource::Wood => self.wood,
            Resource::Gold => self.gold,
            Resource::Stone => self.stone,
        }
    }
}

/// Signed per-action stock change. Spend is negative, market buys positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceDelta {
    pub food: f64,
    pub wood: f64,
    pub gold: f64,
    pub stone: f64,
}

impl ResourceDelta {
    /// Delta for producing `count` units at `cost` each. Always non-positive.
    pub fn spend(cost: ResourceCost, count: u32) -> Self {
        let count = f64::from(count);
        Self {
            food: -f64::from(cost.food) * count,
            wood: -f64::from(cost.wood) * count,
            gold: -f64::from(cost.gold) * count,
            stone: -f64::from(cost.stone) * count,
        }
    }

    /// Delta touching exactly one resource, e.g. a market transaction.
    pub fn market(resource: Resource, amount: f64) -> Self {
        let mut delta = Self::default();
        delta.set(resource, amount);
        delta
    }

    pub fn get(self, resource: Resource) -> f64 {
        match resource {
            Resource::Food => self.food,
            Resource::Wood => self.wood,
            Resource::Gold => self.gold,
            Resource::Stone => self.stone,
        }
    }

    pub fn set(&mut self, resource: Resource, value: f64) {
        match resource {
            Resource::Food => self.food = value,
            Resource::Wood => self.wood = value,
            Resource::Gold => self.gold = value,
            Resource::Stone => self.stone = value,
        }
    }

    /// Sum over all four resources, keeping signs.
    pub fn total(self) -> f64 {
        self.food + self.wood + self.gold + self.stone
    }

    /// Sum of the magnitudes of the negative components only.
    pub fn spend_magnitude(self) -> f64 {
        Resource::ALL
            .iter()
            .map(|&r| {
                let v = self.get(r);
                if v < 0.0 {
                    -v
                } else {
                    0.0
                }
            })
            .sum()
    }
}

/// Authoritative end-of-game totals for one player, from postgame data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceTotals {
    pub food: f64,
    pub wood: f64,
    pub gold: f64,
    pub stone: f64,
}

impl ResourceTotals {
    pub fn get(self, resource: Resource) -> f64 {
        match resource {
            Resource::Food => self.food,
            Resource::Wood => self.wood,
            Resource::Gold => self.gold,
            Resource::Stone => self.stone,
        }
    }

    pub fn set(&mut self, resource: Resource, value: f64) {
        match resource {
            Resource::Food => self.food = value,
            Resource::Wood => self.wood = value,
            Resource::Gold => self.gold = value,
            Resource::Stone => self.stone = value,
        }
    }
}
