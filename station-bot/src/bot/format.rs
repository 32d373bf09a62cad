//! Rendering of stations for Telegram HTML messages.
//!
//! Markup comes from askama templates, which escape every interpolated
//! value. Pre-rendered fragments are passed through with `|safe`.

use askama::Template;
use chrono::NaiveDate;

use crate::domain::{Station, StationType};

/// Format of visit dates shown to users.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Text, linked if there is a target.
#[derive(Template)]
#[template(
    source = "{% match link %}\
              {% when Some with (href) %}<a href=\"{{ href }}\">{{ text }}</a>\
              {% when None %}{{ text }}\
              {% endmatch %}",
    ext = "html"
)]
struct LinkTemplate<'a> {
    text: &'a str,
    link: Option<&'a str>,
}

/// `text` as a link to `link`, or just `text` without one.
pub fn format_link(text: &str, link: Option<&str>) -> askama::Result<String> {
    LinkTemplate { text, link }.render()
}

/// Answer to a query that matched nothing closely enough.
#[derive(Template)]
#[template(
    source = "Sorry, das konnte ich nicht zuordnen. Meintest du <code>{{ closest_match }}</code>?",
    ext = "html"
)]
struct SuggestionTemplate<'a> {
    closest_match: &'a str,
}

pub fn format_suggestion(closest_match: &str) -> askama::Result<String> {
    SuggestionTemplate { closest_match }.render()
}

/// Detail card for a station, one attribute per line.
#[derive(Template)]
#[template(
    source = "Name: {{ name|safe }}\n\
              Betriebsstellenart: {{ station_type }}\n\
              {% if !stop_types.is_empty() %}Erreichbar mit: {{ stop_types }}\n{% endif %}\
              {% if !routes.is_empty() %}{{ routes_label }}: {{ routes|safe }}\n{% endif %}\
              {% match tracks %}{% when Some with (tracks) %}Gleise: {{ tracks }}\n{% when None %}{% endmatch %}\
              {% match town %}{% when Some with (town) %}Stadt: {{ town|safe }}\n{% when None %}{% endmatch %}\
              Kreis: {{ district }}\n\
              {% match opening %}{% when Some with (opening) %}Eröffnung: {{ opening }}\n{% when None %}{% endmatch %}\
              {% match transport_association %}{% when Some with (association) %}Verkehrsbund: {{ association }}\n{% when None %}{% endmatch %}\
              {% match category %}{% when Some with (category) %}Kategorie: {{ category }}\n{% when None %}{% endmatch %}\
              {% if !notes.is_empty() %}Anmerkungen: {{ notes }}\n{% endif %}",
    ext = "html"
)]
struct StationCardTemplate<'a> {
    name: String,
    station_type: StationType,
    stop_types: String,
    routes_label: &'static str,
    routes: String,
    tracks: Option<u32>,
    town: Option<String>,
    district: &'a str,
    opening: Option<&'a str>,
    transport_association: Option<&'a str>,
    category: Option<&'a str>,
    notes: &'a str,
}

/// Detail card for a station, one attribute per line.
pub fn format_station(station: &Station) -> askama::Result<String> {
    let stop_types: Vec<&str> = station.stop_types.iter().map(|t| t.label()).collect();
    let routes = station
        .routes
        .iter()
        .map(|r| format_link(&r.name, r.link.as_deref()))
        .collect::<askama::Result<Vec<_>>>()?;
    let town = station
        .town
        .as_deref()
        .map(|town| format_link(town, station.town_link.as_deref()))
        .transpose()?;

    StationCardTemplate {
        name: format_link(&station.name, station.name_link.as_deref())?,
        station_type: station.station_type,
        stop_types: stop_types.join(", "),
        routes_label: if routes.len() == 1 { "Strecke" } else { "Strecken" },
        routes: routes.join(", "),
        tracks: station.tracks.filter(|&t| t > 0),
        town,
        district: &station.district,
        opening: station.opening.as_deref(),
        transport_association: station.transport_association.as_deref(),
        category: station.category.as_deref(),
        notes: &station.notes,
    }
    .render()
}
