//! Visit progress over the station directory.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Station;

use super::merge;

/// Error returned when marking a station that was already visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("station already done on {date}")]
pub struct AlreadyDone {
    /// When the station was visited.
    pub date: NaiveDate,
}

/// Immutable snapshot of the directory and the visits recorded so far.
///
/// Every station is either open or done on a date. Stations only ever
/// move from open to done. Transformations return a new snapshot.
///
/// Visits are keyed by station name. A visit may outlive its station if
/// the station is later renamed upstream; such entries are kept but no
/// longer show up in any view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    stations: Vec<Station>,
    done_date_by_station_name: BTreeMap<String, NaiveDate>,
}

impl ProgressState {
    /// A state with no stations and no visits.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All known stations in directory order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// When the station with this name was visited, if ever.
    pub fn done_date(&self, station_name: &str) -> Option<NaiveDate> {
        self.done_date_by_station_name.get(station_name).copied()
    }

    pub fn is_done(&self, station: &Station) -> bool {
        self.done_date_by_station_name.contains_key(&station.name)
    }

    /// Raw visit records, including ones whose station has disappeared.
    pub fn done_dates(&self) -> &BTreeMap<String, NaiveDate> {
        &self.done_date_by_station_name
    }

    /// Stations not visited yet, in directory order.
    ///
    /// The iterator is cheap to clone, so it can be walked more than once.
    pub fn open_stations(&self) -> impl Iterator<Item = &Station> + Clone {
        self.stations.iter().filter(|station| !self.is_done(station))
    }

    /// Visited stations with their visit date, in directory order.
    pub fn visited_stations(&self) -> impl Iterator<Item = (&Station, NaiveDate)> + Clone {
        self.stations
            .iter()
            .filter_map(|station| self.done_date(&station.name).map(|date| (station, date)))
    }

    /// Reconcile the directory with freshly fetched stations.
    ///
    /// Visits carry over unchanged. See [`merge::update_stations`].
    pub fn update_stations(&self, fresh: &[Station]) -> Self {
        Self {
            stations: merge::update_stations(&self.stations, fresh),
            done_date_by_station_name: self.done_date_by_station_name.clone(),
        }
    }

    /// Record a visit.
    ///
    /// A station can only be marked once; the first date is kept.
    pub fn mark_as_done(&self, station: &Station, date: NaiveDate) -> Result<Self, AlreadyDone> {
        if let Some(existing) = self.done_date(&station.name) {
            return Err(AlreadyDone { date: existing });
        }

        let mut done_date_by_station_name = self.done_date_by_station_name.clone();
        done_date_by_station_name.insert(station.name.clone(), date);

        Ok(Self {
            stations: self.stations.clone(),
            done_date_by_station_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationType;

    fn station(name: &str) -> Station {
        Station::new(name, StationType::MajorStation, "SH").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn directory() -> ProgressState {
        ProgressState::empty().update_stations(&[station("Husum"), station("Schleswig")])
    }

    #[test]
    fn empty_state() {
        let state = ProgressState::empty();
        assert!(state.stations().is_empty());
        assert!(state.done_dates().is_empty());
        assert_eq!(state.open_stations().count(), 0);
    }

    #[test]
    fn mark_as_done_records_date() {
        let state = directory();
        let husum = station("Husum");

        let state = state.mark_as_done(&husum, date(2024, 5, 1)).unwrap();

        assert_eq!(state.done_date("Husum"), Some(date(2024, 5, 1)));
        assert_eq!(state.done_dates().len(), 1);
        let open: Vec<_> = state.open_stations().map(|s| s.name.as_str()).collect();
        assert_eq!(open, vec!["Schleswig"]);
    }

    #[test]
    fn mark_as_done_twice_fails_and_keeps_first_date() {
        let husum = station("Husum");
        let state = directory().mark_as_done(&husum, date(2024, 5, 1)).unwrap();

        let err = state.mark_as_done(&husum, date(2024, 6, 1)).unwrap_err();

        assert_eq!(err, AlreadyDone { date: date(2024, 5, 1) });
        assert_eq!(state.done_date("Husum"), Some(date(2024, 5, 1)));
    }

    #[test]
    fn mark_as_done_leaves_original_untouched() {
        let before = directory();
        let after = before.mark_as_done(&station("Husum"), date(2024, 5, 1)).unwrap();

        assert_eq!(before.done_date("Husum"), None);
        assert_eq!(after.stations(), before.stations());
    }

    #[test]
    fn open_stations_is_restartable() {
        let state = directory();
        let open = state.open_stations();
        assert_eq!(open.clone().count(), 2);
        assert_eq!(open.count(), 2);
    }

    #[test]
    fn visited_stations_in_directory_order() {
        let state = directory()
            .mark_as_done(&station("Schleswig"), date(2024, 5, 2))
            .unwrap()
            .mark_as_done(&station("Husum"), date(2024, 5, 3))
            .unwrap();

        let visited: Vec<_> = state
            .visited_stations()
            .map(|(s, d)| (s.name.as_str(), d))
            .collect();
        assert_eq!(
            visited,
            vec![("Husum", date(2024, 5, 3)), ("Schleswig", date(2024, 5, 2))]
        );
    }

    #[test]
    fn update_stations_keeps_visits() {
        let state = directory()
            .mark_as_done(&station("Husum"), date(2024, 5, 1))
            .unwrap();
        let mut husum = station("Husum");
        husum.tracks = Some(4);

        let state = state.update_stations(&[husum, station("Kiel")]);

        assert_eq!(state.stations().len(), 3);
        assert_eq!(state.stations()[0].tracks, Some(4));
        assert_eq!(state.done_date("Husum"), Some(date(2024, 5, 1)));
        let open: Vec<_> = state.open_stations().map(|s| s.name.as_str()).collect();
        assert_eq!(open, vec!["Schleswig", "Kiel"]);
    }

    #[test]
    fn orphaned_visits_are_tolerated() {
        let state = directory()
            .mark_as_done(&station("Husum"), date(2024, 5, 1))
            .unwrap();
        let renamed = station("Husum Bf");

        let state = state.update_stations(&[renamed]);

        assert_eq!(state.done_date("Husum"), Some(date(2024, 5, 1)));
        assert!(state.open_stations().any(|s| s.name == "Husum Bf"));
    }

    #[test]
    fn serializes_like_stored_snapshots() {
        let state = directory()
            .mark_as_done(&station("Husum"), date(2024, 5, 1))
            .unwrap();

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json["done_date_by_station_name"],
            serde_json::json!({"Husum": "2024-05-01"})
        );
        assert_eq!(json["stations"].as_array().map(Vec::len), Some(2));

        let back: ProgressState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
