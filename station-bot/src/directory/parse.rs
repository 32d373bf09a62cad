//! Parser for the station table on the directory page.
//!
//! The page holds one table with a row per station and these columns:
//!
//! | # | Content |
//! |---|---------|
//! | 0 | name, usually linked to the station's article |
//! | 1 | type (`Bf` / `Hp`) |
//! | 2 | number of tracks |
//! | 3 | town, optionally linked |
//! | 4 | district |
//! | 5 | opening date |
//! | 6 | transport association |
//! | 7 | category |
//! | 8–10 | `F` / `R` / `S` stop markers |
//! | 11 | routes, one link each |
//! | 12 | notes |

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::domain::{Route, Station, StationType, StopType};

use super::error::DirectoryError;

/// Number of cells a station row must have.
const COLUMN_COUNT: usize = 13;

struct Selectors {
    table: Selector,
    row: Selector,
    cell: Selector,
    link: Selector,
}

impl Selectors {
    fn new() -> Result<Self, DirectoryError> {
        let parse = |selector: &str| {
            Selector::parse(selector).map_err(|e| DirectoryError::Structure {
                message: format!("invalid selector {selector:?}: {e}"),
            })
        };

        Ok(Self {
            table: parse("table")?,
            row: parse("tr")?,
            cell: parse("td")?,
            link: parse("a")?,
        })
    }
}

/// Parse all stations from the directory page.
///
/// Links are resolved against `page_url`. Rows that cannot be parsed are
/// logged and skipped; only a page without any table is an error.
pub fn parse_stations(html: &str, page_url: &Url) -> Result<Vec<Station>, DirectoryError> {
    let selectors = Selectors::new()?;
    let document = Html::parse_document(html);

    let table = document
        .select(&selectors.table)
        .next()
        .ok_or_else(|| DirectoryError::Structure {
            message: "no table found on page".to_string(),
        })?;

    let parser = RowParser {
        selectors: &selectors,
        page_url,
    };

    let mut stations = Vec::new();
    for row in table.select(&selectors.row) {
        let cells: Vec<ElementRef<'_>> = row.select(&selectors.cell).collect();
        if cells.is_empty() {
            // Header rows only have <th> cells
            continue;
        }

        match parser.parse_row(&cells) {
            Ok(station) => stations.push(station),
            Err(e) => warn!(error = %e, "skipping station row that couldn't be parsed"),
        }
    }

    debug!(count = stations.len(), "parsed stations");
    Ok(stations)
}

struct RowParser<'a> {
    selectors: &'a Selectors,
    page_url: &'a Url,
}

impl RowParser<'_> {
    fn parse_row(&self, cells: &[ElementRef<'_>]) -> Result<Station, DirectoryError> {
        if cells.len() < COLUMN_COUNT {
            return Err(DirectoryError::Structure {
                message: format!(
                    "row has {} cells, expected {COLUMN_COUNT}",
                    cells.len()
                ),
            });
        }

        let station_type = cell_text(cells[1])
            .map(|label| StationType::from_label(&label))
            .unwrap_or(StationType::MajorStation);
        let district = cell_text(cells[4]).unwrap_or_default();

        let mut station = Station::new(self.station_name(cells[0]), station_type, district)?;
        station.name_link = self.link(cells[0]);
        station.tracks = parse_tracks(cells[2])?;
        station.town = cell_text(cells[3]);
        station.town_link = self.link(cells[3]);
        station.opening = cell_text(cells[5]);
        station.transport_association = cell_text(cells[6]);
        station.category = cell_text(cells[7]);
        station.stop_types = StopType::from_columns(
            cell_text(cells[8]).as_deref(),
            cell_text(cells[9]).as_deref(),
            cell_text(cells[10]).as_deref(),
        )?;
        station.routes = cells[11]
            .select(&self.selectors.link)
            .map(|a| Route::new(collapse_whitespace(a.text()), self.href(a)))
            .collect();
        station.notes = cell_text(cells[12]).unwrap_or_default();

        Ok(station)
    }

    /// The linked text if the cell has links (dropping footnote markers
    /// and the like), otherwise all of its text.
    fn station_name(&self, cell: ElementRef<'_>) -> String {
        let links: Vec<ElementRef<'_>> = cell.select(&self.selectors.link).collect();
        if links.is_empty() {
            collapse_whitespace(cell.text())
        } else {
            collapse_whitespace(links.iter().flat_map(|a| a.text()))
        }
    }

    /// Target of the first link in the cell.
    fn link(&self, cell: ElementRef<'_>) -> Option<String> {
        let a = cell.select(&self.selectors.link).next()?;
        self.href(a)
    }

    /// Absolute target of a link, or `None` for links to pages that
    /// don't exist yet (marked with the `new` class).
    fn href(&self, a: ElementRef<'_>) -> Option<String> {
        let element = a.value();
        if element.classes().any(|class| class == "new") {
            return None;
        }

        let href = element.attr("href").filter(|href| !href.is_empty())?;
        self.page_url.join(href).ok().map(String::from)
    }
}

fn parse_tracks(cell: ElementRef<'_>) -> Result<Option<u32>, DirectoryError> {
    cell_text(cell)
        .map(|text| {
            text.parse().map_err(|_| DirectoryError::Cell {
                column: "tracks",
                value: text,
            })
        })
        .transpose()
}

/// Text content of the cell, or `None` if it is blank.
fn cell_text(cell: ElementRef<'_>) -> Option<String> {
    Some(collapse_whitespace(cell.text())).filter(|text| !text.is_empty())
}

/// Join text fragments, collapsing runs of whitespace (including
/// non-breaking spaces) into single spaces.
fn collapse_whitespace<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://de.wikipedia.org/wiki/Liste_der_Personenbahnh%C3%B6fe_in_Schleswig-Holstein";

    fn page_url() -> Url {
        Url::parse(PAGE_URL).unwrap()
    }

    fn page(rows: &str) -> String {
        format!(
            "<html><body><p>Intro</p><table><tbody>\
             <tr><th>Name</th><th>Art</th><th>Gleise</th><th>Ort</th><th>Kreis</th>\
             <th>Eröffnung</th><th>Verbund</th><th>Kat</th><th>F</th><th>R</th><th>S</th>\
             <th>Strecke</th><th>Anmerkungen</th></tr>\
             {rows}</tbody></table></body></html>"
        )
    }

    const HUSUM_ROW: &str = "<tr>\
        <td><a href=\"/wiki/Bahnhof_Husum\">Husum</a></td>\
        <td>Bf</td>\
        <td>5</td>\
        <td><a href=\"/wiki/Husum\">Husum</a></td>\
        <td>NF</td>\
        <td>1. Aug. 1854</td>\
        <td>NAH.SH</td>\
        <td>3</td>\
        <td>F</td><td>R</td><td></td>\
        <td><a href=\"/wiki/Marschbahn\">Marschbahn</a>, <a href=\"/wiki/Nowhere\" class=\"new\">Husum–Bad St. Peter-Ording</a></td>\
        <td>Umsteigepunkt\u{a0} zur Nordsee</td>\
        </tr>";

    #[test]
    fn parses_full_row() {
        let stations = parse_stations(&page(HUSUM_ROW), &page_url()).unwrap();
        assert_eq!(stations.len(), 1);

        let husum = &stations[0];
        assert_eq!(husum.name, "Husum");
        assert_eq!(
            husum.name_link.as_deref(),
            Some("https://de.wikipedia.org/wiki/Bahnhof_Husum")
        );
        assert_eq!(husum.station_type, StationType::MajorStation);
        assert_eq!(husum.tracks, Some(5));
        assert_eq!(husum.town.as_deref(), Some("Husum"));
        assert_eq!(
            husum.town_link.as_deref(),
            Some("https://de.wikipedia.org/wiki/Husum")
        );
        assert_eq!(husum.district, "NF");
        assert_eq!(husum.opening.as_deref(), Some("1. Aug. 1854"));
        assert_eq!(husum.transport_association.as_deref(), Some("NAH.SH"));
        assert_eq!(husum.category.as_deref(), Some("3"));
        assert_eq!(
            husum.stop_types.iter().copied().collect::<Vec<_>>(),
            vec![StopType::LongDistance, StopType::Regional]
        );
        assert_eq!(husum.notes, "Umsteigepunkt zur Nordsee");
    }

    #[test]
    fn routes_with_missing_pages_have_no_link() {
        let stations = parse_stations(&page(HUSUM_ROW), &page_url()).unwrap();
        let routes: Vec<&Route> = stations[0].routes.iter().collect();

        assert_eq!(routes.len(), 2);
        assert!(routes.contains(&&Route::new(
            "Marschbahn",
            Some("https://de.wikipedia.org/wiki/Marschbahn".to_string())
        )));
        assert!(routes.contains(&&Route::new("Husum–Bad St. Peter-Ording", None)));
    }

    #[test]
    fn halt_without_links_or_tracks() {
        let row = "<tr><td>Jübek</td><td>Hp</td><td> </td><td>Jübek</td><td>SL</td>\
                   <td></td><td></td><td></td><td></td><td>R</td><td></td><td></td><td></td></tr>";
        let stations = parse_stations(&page(row), &page_url()).unwrap();

        let jubek = &stations[0];
        assert_eq!(jubek.name, "Jübek");
        assert_eq!(jubek.name_link, None);
        assert_eq!(jubek.station_type, StationType::Halt);
        assert_eq!(jubek.tracks, None);
        assert_eq!(jubek.town_link, None);
        assert_eq!(jubek.opening, None);
        assert!(jubek.routes.is_empty());
        assert_eq!(jubek.notes, "");
    }

    #[test]
    fn name_ignores_text_outside_links() {
        let row = "<tr><td><a href=\"/wiki/Bahnhof_Kiel\">Kiel Hbf</a><sup>1</sup></td>\
                   <td>Bf</td><td>9</td><td>Kiel</td><td>KI</td>\
                   <td></td><td></td><td></td><td>F</td><td>R</td><td></td><td></td><td></td></tr>";
        let stations = parse_stations(&page(row), &page_url()).unwrap();
        assert_eq!(stations[0].name, "Kiel Hbf");
    }

    #[test]
    fn new_class_station_link_is_absent() {
        let row = "<tr><td><a href=\"/w/index.php?title=Haltepunkt_X\" class=\"new\">X-Dorf</a></td>\
                   <td>Hp</td><td>1</td><td>X</td><td>OH</td>\
                   <td></td><td></td><td></td><td></td><td>R</td><td></td><td></td><td></td></tr>";
        let stations = parse_stations(&page(row), &page_url()).unwrap();
        assert_eq!(stations[0].name, "X-Dorf");
        assert_eq!(stations[0].name_link, None);
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let short_row = "<tr><td>Short</td><td>Bf</td></tr>";
        let bad_tracks = "<tr><td>Bad</td><td>Bf</td><td>two</td><td>X</td><td>SL</td>\
                          <td></td><td></td><td></td><td></td><td>R</td><td></td><td></td><td></td></tr>";
        let bad_marker = "<tr><td>Bad</td><td>Bf</td><td>2</td><td>X</td><td>SL</td>\
                          <td></td><td></td><td></td><td>X</td><td>R</td><td></td><td></td><td></td></tr>";
        let no_district = "<tr><td>Bad</td><td>Bf</td><td>2</td><td>X</td><td></td>\
                           <td></td><td></td><td></td><td></td><td>R</td><td></td><td></td><td></td></tr>";
        let rows = format!("{short_row}{bad_tracks}{HUSUM_ROW}{bad_marker}{no_district}");

        let stations = parse_stations(&page(&rows), &page_url()).unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Husum");
    }

    #[test]
    fn page_without_table_is_an_error() {
        let err = parse_stations("<html><body><p>Nothing</p></body></html>", &page_url())
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Structure { .. }));
    }

    #[test]
    fn collapse_whitespace_handles_nbsp() {
        assert_eq!(
            collapse_whitespace(["  a\u{a0}", " b\n", "c "].into_iter()),
            "a b c"
        );
    }
}
