use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use coolie_core::{CoreError, CoreResult};

use crate::roster::Roster;

/// Outcome of assigning a helper to a booking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub helper: String,
    /// Set when no helper is stationed in the requested city.
    pub fallback: Option<String>,
}

/// How helpers are picked for a booking.
#[derive(Debug, Clone, Default)]
pub enum AssignmentStrategy {
    /// `"Assigned Helper "` followed by the upper-cased first two characters of the city.
    #[default]
    CityCode,
    /// Random pick from the roster, preferring helpers stationed in the city.
    Roster(Roster),
}

impl AssignmentStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            AssignmentStrategy::CityCode => "city_code",
            AssignmentStrategy::Roster(_) => "roster",
        }
    }

    pub fn assign<R: Rng + ?Sized>(&self, city: &str, rng: &mut R) -> CoreResult<Assignment> {
        match self {
            AssignmentStrategy::CityCode => Ok(Assignment {
                helper: city_code_helper(city),
                fallback: None,
            }),
            AssignmentStrategy::Roster(roster) => assign_from_roster(roster, city, rng),
        }
    }
}

fn city_code_helper(city: &str) -> String {
    let code: String = city.chars().take(2).collect();
    format!("Assigned Helper {}", code.to_uppercase())
}

fn assign_from_roster<R: Rng + ?Sized>(
    roster: &Roster,
    city: &str,
    rng: &mut R,
) -> CoreResult<Assignment> {
    let local = roster.at_station(city);
    if let Some(helper) = local.choose(rng) {
        return Ok(Assignment {
            helper: helper.name.clone(),
            fallback: None,
        });
    }

    let helper = roster
        .helpers()
        .choose(rng)
        .ok_or_else(|| CoreError::InternalError("helper roster is empty".to_string()))?;

    Ok(Assignment {
        helper: helper.name.clone(),
        fallback: Some(format!("No local helper at {}, assigned {}", city, helper.name)),
    })
}
