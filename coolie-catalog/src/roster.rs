use serde::{Deserialize, Serialize};

/// A porter that can be assigned to bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Helper {
    pub name: String,
    pub rating: f64,
    pub station: String,
}

impl Helper {
    pub fn new(name: &str, rating: f64, station: &str) -> Self {
        Self {
            name: name.to_string(),
            rating,
            station: station.to_string(),
        }
    }
}

/// Immutable, non-empty list of helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    helpers: Vec<Helper>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            helpers: vec![
                Helper::new("Raju", 4.5, "Gwalior"),
                Helper::new("Sita", 4.2, "Jaipur"),
                Helper::new("Amit", 4.8, "Udaipur"),
                Helper::new("Pooja", 4.7, "Delhi"),
                Helper::new("Rahul", 4.6, "Mumbai"),
            ],
        }
    }
}

impl Roster {
    pub fn new(helpers: Vec<Helper>) -> Result<Self, RosterError> {
        if helpers.is_empty() {
            return Err(RosterError::Empty);
        }
        if let Some(h) = helpers.iter().find(|h| h.name.trim().is_empty()) {
            return Err(RosterError::UnnamedHelper { station: h.station.clone() });
        }
        Ok(Self { helpers })
    }

    pub fn helpers(&self) -> &[Helper] {
        &self.helpers
    }

    /// Helpers whose station equals `city` exactly (case-sensitive).
    pub fn at_station(&self, city: &str) -> Vec<&Helper> {
        self.helpers.iter().filter(|h| h.station == city).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.iter().any(|h| h.name == name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Helper roster must contain at least one helper")]
    Empty,

    #[error("Helper at station {station} has no name")]
    UnnamedHelper {
        station: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let roster = Roster::default();
        assert_eq!(roster.helpers().len(), 5);
        assert!(roster.contains("Raju"));
    }

    #[test]
    fn test_station_match_is_exact() {
        let roster = Roster::default();
        assert_eq!(roster.at_station("Gwalior").len(), 1);
        assert!(roster.at_station("gwalior").is_empty());
        assert!(roster.at_station("Pune").is_empty());
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(matches!(Roster::new(vec![]), Err(RosterError::Empty)));
    }

    #[test]
    fn test_unnamed_helper_rejected() {
        let err = Roster::new(vec![Helper::new(" ", 4.0, "Agra")]).unwrap_err();
        assert!(err.to_string().contains("Agra"));
    }
}
