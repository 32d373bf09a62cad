//! Station records.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Operational kind of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    /// A station with switches ("Bahnhof").
    #[serde(rename = "Bahnhof")]
    MajorStation,
    /// A plain stop without switches ("Haltepunkt").
    #[serde(rename = "Haltepunkt")]
    Halt,
}

impl StationType {
    /// Interpret the label used in the station table.
    ///
    /// Only `Hp`/`Haltepunkt` (any case) denote a halt; everything else,
    /// including unknown labels, is treated as a major station.
    ///
    /// # Examples
    ///
    /// ```
    /// use station_bot::domain::StationType;
    ///
    /// assert_eq!(StationType::from_label("Hp"), StationType::Halt);
    /// assert_eq!(StationType::from_label("Bf"), StationType::MajorStation);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label == "hp" || label == "haltepunkt" {
            StationType::Halt
        } else {
            StationType::MajorStation
        }
    }

    /// The German label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            StationType::MajorStation => "Bahnhof",
            StationType::Halt => "Haltepunkt",
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of train service stopping at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StopType {
    #[serde(rename = "Fernverkehr")]
    LongDistance,
    #[serde(rename = "Regionalverkehr")]
    Regional,
    #[serde(rename = "S-Bahn")]
    CityRail,
}

impl StopType {
    /// The marker letter used in the station table.
    pub fn marker(&self) -> char {
        match self {
            StopType::LongDistance => 'F',
            StopType::Regional => 'R',
            StopType::CityRail => 'S',
        }
    }

    /// The German label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            StopType::LongDistance => "Fernverkehr",
            StopType::Regional => "Regionalverkehr",
            StopType::CityRail => "S-Bahn",
        }
    }

    /// Build the set of stop types from the three marker columns.
    ///
    /// Each column is either blank or contains exactly its marker letter.
    pub fn from_columns(
        long_distance: Option<&str>,
        regional: Option<&str>,
        city_rail: Option<&str>,
    ) -> Result<BTreeSet<StopType>, DomainError> {
        let mut result = BTreeSet::new();
        for (stop_type, column) in [
            (StopType::LongDistance, long_distance),
            (StopType::Regional, regional),
            (StopType::CityRail, city_rail),
        ] {
            let Some(value) = column.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            let marker = stop_type.marker();
            if value.len() != 1 || !value.starts_with(marker) {
                return Err(DomainError::InvalidStopMarker {
                    column: marker,
                    value: value.to_string(),
                });
            }
            result.insert(stop_type);
        }
        Ok(result)
    }
}

impl fmt::Display for StopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A railway line serving a station.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub link: Option<String>,
}

impl Route {
    pub fn new(name: impl Into<String>, link: Option<String>) -> Self {
        Self {
            name: name.into(),
            link,
        }
    }
}

/// One physical stop from the station directory.
///
/// `name` and `district` are guaranteed non-blank when built through
/// [`Station::new`]. Equality compares every field; use
/// [`Station::is_same_station`] to ask whether two records describe the
/// same stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub name_link: Option<String>,
    #[serde(rename = "type")]
    pub station_type: StationType,
    pub tracks: Option<u32>,
    pub town: Option<String>,
    pub town_link: Option<String>,
    pub district: String,
    /// Either a year or a date like `9. Jun. 1907`.
    pub opening: Option<String>,
    pub transport_association: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub stop_types: BTreeSet<StopType>,
    #[serde(default)]
    pub routes: BTreeSet<Route>,
    #[serde(default)]
    pub notes: String,
}

impl Station {
    /// Create a station with the required fields; everything else is empty.
    pub fn new(
        name: impl AsRef<str>,
        station_type: StationType,
        district: impl AsRef<str>,
    ) -> Result<Self, DomainError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DomainError::BlankField("name"));
        }
        let district = district.as_ref().trim();
        if district.is_empty() {
            return Err(DomainError::BlankField("district"));
        }

        Ok(Self {
            name: name.to_string(),
            name_link: None,
            station_type,
            tracks: None,
            town: None,
            town_link: None,
            district: district.to_string(),
            opening: None,
            transport_association: None,
            category: None,
            stop_types: BTreeSet::new(),
            routes: BTreeSet::new(),
            notes: String::new(),
        })
    }

    /// Set the link to the station's own page.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.name_link = Some(link.into());
        self
    }

    /// Whether `other` describes the same physical stop.
    ///
    /// When both records carry a link, the links decide. Otherwise the
    /// names do. This relation survives re-scrapes that change any other
    /// attribute.
    pub fn is_same_station(&self, other: &Station) -> bool {
        match (&self.name_link, &other.name_link) {
            (Some(link), Some(other_link)) => link == other_link,
            _ => self.name == other.name,
        }
    }
}
