//! Reconciliation of persisted stations with a freshly fetched list.

use crate::domain::Station;

/// Merge `fresh` into `current`.
///
/// Fresh stations are applied one at a time, in order. A fresh station
/// that shares identity with an entry already in the working list
/// replaces the first such entry in place; otherwise it is appended.
/// Entries of `current` that no fresh station matches are kept where they
/// were, so a station vanishing upstream never loses its history.
///
/// Applying two lists in sequence (manual imports, then the scraped list)
/// lets the later list win on collisions.
///
/// # Examples
///
/// ```
/// use station_bot::domain::{Station, StationType};
/// use station_bot::progress::update_stations;
///
/// let husum = Station::new("Husum", StationType::MajorStation, "NF").unwrap();
/// let schleswig = Station::new("Schleswig", StationType::MajorStation, "SL").unwrap();
/// let mut husum_fresh = husum.clone();
/// husum_fresh.tracks = Some(5);
///
/// let merged = update_stations(&[husum, schleswig.clone()], &[husum_fresh.clone()]);
/// assert_eq!(merged, vec![husum_fresh, schleswig]);
/// ```
pub fn update_stations(current: &[Station], fresh: &[Station]) -> Vec<Station> {
    let mut stations = current.to_vec();

    for fresh_station in fresh {
        match stations
            .iter()
            .position(|station| station.is_same_station(fresh_station))
        {
            Some(index) => stations[index] = fresh_station.clone(),
            None => stations.push(fresh_station.clone()),
        }
    }

    stations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationType;

    fn station(name: &str) -> Station {
        Station::new(name, StationType::MajorStation, "SL").unwrap()
    }

    fn linked(name: &str, link: &str) -> Station {
        station(name).with_link(link)
    }

    fn names(stations: &[Station]) -> Vec<&str> {
        stations.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn empty_current_takes_fresh() {
        let fresh = vec![station("Husum"), station("Schleswig")];
        assert_eq!(update_stations(&[], &fresh), fresh);
    }

    #[test]
    fn empty_fresh_keeps_current() {
        let current = vec![station("Husum"), station("Schleswig")];
        assert_eq!(update_stations(&current, &[]), current);
    }

    #[test]
    fn matched_station_is_replaced_in_place() {
        let current = vec![station("Husum"), station("Schleswig"), station("Kiel")];
        let mut fresh_schleswig = station("Schleswig");
        fresh_schleswig.tracks = Some(3);

        let merged = update_stations(&current, std::slice::from_ref(&fresh_schleswig));

        assert_eq!(names(&merged), vec!["Husum", "Schleswig", "Kiel"]);
        assert_eq!(merged[1], fresh_schleswig);
    }

    #[test]
    fn new_stations_are_appended_in_order() {
        let current = vec![station("Husum")];
        let fresh = vec![station("Kiel"), station("Husum"), station("Eutin")];

        let merged = update_stations(&current, &fresh);

        assert_eq!(names(&merged), vec!["Husum", "Kiel", "Eutin"]);
    }

    #[test]
    fn stations_missing_upstream_are_retained() {
        let current = vec![station("Husum"), station("Gone"), station("Kiel")];
        let fresh = vec![station("Kiel"), station("Husum")];

        let merged = update_stations(&current, &fresh);

        assert_eq!(names(&merged), vec!["Husum", "Gone", "Kiel"]);
    }

    #[test]
    fn renamed_station_with_same_link_replaces_old_entry() {
        let current = vec![linked("Lübeck-Moisling", "https://example.com/moisling")];
        let fresh = vec![linked("Lübeck Moisling", "https://example.com/moisling")];

        let merged = update_stations(&current, &fresh);

        assert_eq!(names(&merged), vec!["Lübeck Moisling"]);
    }

    #[test]
    fn later_list_wins_on_collision() {
        let mut imported = linked("Lübeck-Moisling", "https://example.com/moisling");
        imported.notes = "manual".into();
        let mut scraped = linked("Lübeck-Moisling", "https://example.com/moisling");
        scraped.notes = "scraped".into();

        let once = update_stations(&[], std::slice::from_ref(&imported));
        let merged = update_stations(&once, std::slice::from_ref(&scraped));

        assert_eq!(merged, vec![scraped]);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let current = vec![station("Husum"), linked("Kiel", "https://example.com/kiel")];
        let mut kiel = linked("Kiel Hbf", "https://example.com/kiel");
        kiel.tracks = Some(8);
        let fresh = vec![kiel, station("Eutin")];

        let once = update_stations(&current, &fresh);
        let twice = update_stations(&once, &fresh);

        assert_eq!(once, twice);
    }
}
