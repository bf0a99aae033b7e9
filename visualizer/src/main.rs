use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container, Row,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Subscription,
    Task, Theme,
};
use rangercore::dataset::{AirportCategory, AirportRecord};
use rangercore::query::nm_to_degrees;
use rangercore::search::SearchRequest;
use serde::Deserialize;
use std::{collections::BTreeSet, time::Duration};

const BRIDGE_URL: &str = "http://127.0.0.1:9000";

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Airport Ranger - find your next destination".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    form: SearchForm,
    payload: Option<VisualizationPayload>,
    hidden: BTreeSet<AirportCategory>,
    searching: bool,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<VisualizationPayload, String>),
    FieldChanged(FormField, String),
    StartSearch,
    SearchFinished(Result<VisualizationPayload, String>),
    ToggleCategory(AirportCategory),
}

#[derive(Debug, Clone, Copy)]
enum FormField {
    Icao,
    Minutes,
    SpeedKts,
    SpeedMach,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                form: SearchForm::default(),
                payload: None,
                hidden: BTreeSet::new(),
                searching: false,
                status: "Waiting for the ranger bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                if state.searching {
                    Task::none()
                } else {
                    Task::perform(fetch_payload(), Message::PayloadFetched)
                }
            }
            Message::PayloadFetched(Ok(payload)) => {
                if payload.request.is_some() && state.payload.as_ref() != Some(&payload) {
                    state.status = payload.summary();
                    state.push_history(format!("Bridge: {}", payload.summary()));
                    state.payload = Some(payload);
                }
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                if state.payload.is_none() {
                    state.status = format!("Bridge unavailable: {err}");
                }
                Task::none()
            }
            Message::FieldChanged(field, value) => {
                state.form.update_field(field, value);
                Task::none()
            }
            Message::StartSearch => match state.form.to_request() {
                Ok(request) => {
                    state.searching = true;
                    state.status = format!("Searching around {}...", request.identifier);
                    Task::perform(post_search(request), Message::SearchFinished)
                }
                Err(err) => {
                    state.status = err;
                    Task::none()
                }
            },
            Message::SearchFinished(Ok(payload)) => {
                state.searching = false;
                state.status = payload.summary();
                state.push_history(payload.summary());
                state.payload = Some(payload);
                Task::none()
            }
            Message::SearchFinished(Err(err)) => {
                state.searching = false;
                state.status = format!("Search failed: {err}");
                state.push_history(state.status.clone());
                Task::none()
            }
            Message::ToggleCategory(category) => {
                if !state.hidden.remove(&category) {
                    state.hidden.insert(category);
                }
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let search_button = if state.searching {
            button("Searching...").padding(10)
        } else {
            button("Start searching...")
                .on_press(Message::StartSearch)
                .padding(10)
        };

        let input_column = column![
            text("Airport Ranger").size(28),
            text("ICAO").size(14),
            text_input("e.g. EDDF", &state.form.icao)
                .on_input(|value| Message::FieldChanged(FormField::Icao, value))
                .on_submit(Message::StartSearch)
                .padding(6),
            text("Time to fly in minutes (1-3680)").size(14),
            text_input("60", &state.form.minutes)
                .on_input(|value| Message::FieldChanged(FormField::Minutes, value))
                .padding(6),
            text("Speed in KTAS (0-1000)").size(14),
            text_input("0", &state.form.speed_kts)
                .on_input(|value| Message::FieldChanged(FormField::SpeedKts, value))
                .padding(6),
            text("Speed in Mach (0.00-3.00)").size(14),
            text_input("0.00", &state.form.speed_mach)
                .on_input(|value| Message::FieldChanged(FormField::SpeedMach, value))
                .padding(6),
            search_button,
            text(&state.status).size(14),
            column![
                text("How it works").size(16),
                text("Enter the ICAO code of your departure airport, the time you want to fly and your planned speed.")
                    .size(12),
                text("A speed in KTAS overrides any Mach number.").size(12),
                text("Use the category buttons above the map to show or hide airport sizes.")
                    .size(12),
                text("Keep in mind").size(16),
                text("Results are approximate: no wind or temperature is taken into account.")
                    .size(12),
                text("The range is a straight line; real IFR routings add mileage.").size(12),
                text("Every degree counts as 60 nm, so east-west reach is understated away from the equator.")
                    .size(12),
                text("For flight simulation only, not for real-world navigation.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(8)
        .padding(16)
        .width(Length::Fixed(360.0));

        let airports = state
            .payload
            .as_ref()
            .map(|payload| payload.airports.clone())
            .unwrap_or_default();
        let visible: Vec<AirportRecord> = airports
            .iter()
            .filter(|airport| !state.hidden.contains(&airport.category))
            .cloned()
            .collect();

        let headline = if let Some(payload) = &state.payload {
            column![
                text(format!("Distance (rounded): {:.2} nm", payload.distance_nm)).size(18),
                text(format!("Found: {} airports", payload.airport_count)).size(18),
            ]
            .spacing(4)
        } else {
            column![text("No search yet").size(18)]
        };

        let legend = category_order(&airports).into_iter().fold(
            Row::new().spacing(8),
            |legend, category| {
                let count = airports.iter().filter(|a| a.category == category).count();
                let marker = if state.hidden.contains(&category) {
                    "[ ]"
                } else {
                    "[x]"
                };
                legend.push(
                    button(text(format!("{} {} ({})", marker, category.label(), count)).size(13))
                        .on_press(Message::ToggleCategory(category.clone()))
                        .padding(6),
                )
            },
        );

        let map = Canvas::new(AirportMap {
            airports: visible.clone(),
            reference: state.payload.as_ref().and_then(|p| p.reference.clone()),
            radius_deg: state
                .payload
                .as_ref()
                .map(|p| nm_to_degrees(p.distance_nm))
                .unwrap_or(0.0),
        })
        .width(Length::Fill)
        .height(Length::Fixed(520.0));

        let airport_list = if visible.is_empty() {
            Column::new().push(text("No airports to list").size(12))
        } else {
            visible.iter().fold(Column::new().spacing(2), |col, airport| {
                col.push(
                    text(format!(
                        "{:<8} {} ({})",
                        airport.identifier,
                        airport.name,
                        airport.category.label()
                    ))
                    .size(12),
                )
            })
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let result_column = column![
            text("Airports in range").size(26),
            headline,
            text("Airport size / click to turn on/off").size(14),
            legend,
            map,
            text("Airports").size(16),
            Container::new(scrollable(airport_list).height(Length::Fixed(160.0))).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![input_column, result_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(scrollable(layout))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

/// Small, medium and large first, anything else after in name order.
fn category_order(airports: &[AirportRecord]) -> Vec<AirportCategory> {
    let mut present: Vec<AirportCategory> = airports
        .iter()
        .map(|a| a.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    present.sort_by_key(|category| match category {
        AirportCategory::SmallAirport => 0,
        AirportCategory::MediumAirport => 1,
        AirportCategory::LargeAirport => 2,
        _ => 3,
    });
    present
}

async fn fetch_payload() -> Result<VisualizationPayload, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/payload"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<VisualizationPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_search(request: SearchRequest) -> Result<VisualizationPayload, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/search"))
        .json(&request)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        response
            .json::<VisualizationPayload>()
            .await
            .map_err(|e| e.to_string())
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => Err(error.message),
            Err(_) => Err(format!("{}: {}", status, body)),
        }
    }
}

#[derive(Debug, Clone)]
struct SearchForm {
    icao: String,
    minutes: String,
    speed_kts: String,
    speed_mach: String,
}

impl SearchForm {
    fn default() -> Self {
        Self {
            icao: String::new(),
            minutes: "60".into(),
            speed_kts: "120".into(),
            speed_mach: "0.00".into(),
        }
    }

    fn update_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Icao => self.icao = value.to_uppercase(),
            FormField::Minutes => self.minutes = value,
            FormField::SpeedKts => self.speed_kts = value,
            FormField::SpeedMach => self.speed_mach = value,
        }
    }

    fn to_request(&self) -> Result<SearchRequest, String> {
        let minutes = self
            .minutes
            .trim()
            .parse::<u32>()
            .map_err(|_| "Time to fly must be a whole number of minutes".to_string())?;
        let speed_kts = parse_or_zero::<u32>(&self.speed_kts)
            .ok_or_else(|| "Speed in KTAS must be a whole number".to_string())?;
        let speed_mach = parse_or_zero::<f64>(&self.speed_mach)
            .ok_or_else(|| "Speed in Mach must be a number".to_string())?;

        let request = SearchRequest::new(&self.icao, minutes, speed_kts, speed_mach);
        request.validate().map_err(|e| e.to_string())?;
        Ok(request)
    }
}

fn parse_or_zero<T: std::str::FromStr + Default>(raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(T::default());
    }
    trimmed.parse().ok()
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct VisualizationPayload {
    #[serde(default)]
    request: Option<SearchRequest>,
    #[serde(default)]
    reference: Option<AirportRecord>,
    #[serde(default)]
    speed_knots: f64,
    #[serde(default)]
    distance_nm: f64,
    #[serde(default)]
    airport_count: usize,
    #[serde(default)]
    airports: Vec<AirportRecord>,
    #[serde(default)]
    notes: Vec<String>,
}

impl VisualizationPayload {
    fn summary(&self) -> String {
        let reference = self
            .reference
            .as_ref()
            .map(|r| r.identifier.as_str())
            .unwrap_or("?");
        format!(
            "{}: {} airports within {:.2} nm at {:.1} kts",
            reference, self.airport_count, self.distance_nm, self.speed_knots
        )
    }
}

fn category_color(category: &AirportCategory) -> Color {
    match category {
        AirportCategory::SmallAirport => Color::from_rgb(0.0, 0.8, 0.59),
        AirportCategory::MediumAirport => Color::from_rgb(0.86, 0.22, 0.07),
        AirportCategory::LargeAirport => Color::from_rgb(0.30, 0.52, 0.80),
        _ => Color::from_rgb(0.6, 0.6, 0.6),
    }
}

/// Equirectangular fit of a lon/lat window into the canvas.
struct Projection {
    min_lon: f64,
    max_lat: f64,
    scale: f64,
    offset: (f32, f32),
}

impl Projection {
    fn fit(size: Size, points: &[(f64, f64)], margin: f32) -> Self {
        let (mut min_lon, mut max_lon) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(lon, lat) in points {
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
        }
        if !min_lon.is_finite() {
            (min_lon, max_lon, min_lat, max_lat) = (-180.0, 180.0, -90.0, 90.0);
        }

        let span_lon = (max_lon - min_lon).max(0.01);
        let span_lat = (max_lat - min_lat).max(0.01);
        let width = f64::from((size.width - 2.0 * margin).max(1.0));
        let height = f64::from((size.height - 2.0 * margin).max(1.0));
        let scale = (width / span_lon).min(height / span_lat);

        let used_width = (span_lon * scale) as f32;
        let used_height = (span_lat * scale) as f32;
        Self {
            min_lon,
            max_lat,
            scale,
            offset: (
                margin + ((size.width - 2.0 * margin) - used_width) / 2.0,
                margin + ((size.height - 2.0 * margin) - used_height) / 2.0,
            ),
        }
    }

    fn project(&self, lon: f64, lat: f64) -> Point {
        Point::new(
            self.offset.0 + ((lon - self.min_lon) * self.scale) as f32,
            self.offset.1 + ((self.max_lat - lat) * self.scale) as f32,
        )
    }
}

#[derive(Clone)]
struct AirportMap {
    airports: Vec<AirportRecord>,
    reference: Option<AirportRecord>,
    radius_deg: f64,
}

impl AirportMap {
    fn extent(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .airports
            .iter()
            .map(|a| (a.longitude, a.latitude))
            .collect();
        if let Some(reference) = &self.reference {
            let (lon, lat, r) = (reference.longitude, reference.latitude, self.radius_deg);
            points.extend([(lon - r, lat - r), (lon + r, lat + r), (lon, lat)]);
        }
        points
    }
}

impl canvas::Program<Message> for AirportMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.04, 0.05, 0.08),
        );

        let projection = Projection::fit(bounds.size(), &self.extent(), 24.0);

        if let Some(reference) = &self.reference {
            let center = projection.project(reference.longitude, reference.latitude);
            let ring_radius = (self.radius_deg * projection.scale) as f32;
            let ring = Path::new(|builder| builder.circle(center, ring_radius.max(1.0)));
            frame.stroke(
                &ring,
                Stroke::default()
                    .with_width(1.5)
                    .with_color(Color::from_rgb(0.45, 0.45, 0.55)),
            );

            let axes = Path::new(|builder| {
                builder.move_to(Point::new(center.x - 6.0, center.y));
                builder.line_to(Point::new(center.x + 6.0, center.y));
                builder.move_to(Point::new(center.x, center.y - 6.0));
                builder.line_to(Point::new(center.x, center.y + 6.0));
            });
            frame.stroke(
                &axes,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb(0.95, 0.85, 0.3)),
            );
        }

        let projected: Vec<(Point, &AirportRecord)> = self
            .airports
            .iter()
            .map(|airport| (projection.project(airport.longitude, airport.latitude), airport))
            .collect();

        for (position, airport) in &projected {
            let marker = Path::new(|builder| builder.circle(*position, 3.5));
            frame.fill(&marker, category_color(&airport.category));
        }

        if let Some(cursor_position) = cursor.position_in(bounds) {
            let hovered = projected
                .iter()
                .map(|(position, airport)| (position.distance(cursor_position), position, airport))
                .filter(|(distance, _, _)| *distance <= 8.0)
                .min_by(|a, b| a.0.total_cmp(&b.0));

            if let Some((_, position, airport)) = hovered {
                let highlight = Path::new(|builder| builder.circle(*position, 6.0));
                frame.stroke(
                    &highlight,
                    Stroke::default().with_width(1.5).with_color(Color::WHITE),
                );
                frame.fill_text(canvas::Text {
                    content: format!("{}  {}", airport.identifier, airport.name),
                    position: Point::new(position.x + 10.0, position.y - 18.0),
                    color: Color::WHITE,
                    size: Pixels(14.0),
                    ..canvas::Text::default()
                });
            }
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_builds_uppercase_request() {
        let mut form = SearchForm::default();
        form.update_field(FormField::Icao, "eddf".into());
        form.update_field(FormField::SpeedKts, "".into());
        form.update_field(FormField::SpeedMach, "0.78".into());
        let request = form.to_request().unwrap();
        assert_eq!(request.identifier, "EDDF");
        assert_eq!(request.speed_kts, 0);
        assert_eq!(request.speed_mach, 0.78);
    }

    #[test]
    fn form_rejects_out_of_range_minutes() {
        let mut form = SearchForm::default();
        form.update_field(FormField::Icao, "EDDF".into());
        form.update_field(FormField::Minutes, "4000".into());
        assert!(form.to_request().is_err());
        form.update_field(FormField::Minutes, "abc".into());
        assert!(form.to_request().is_err());
    }

    #[test]
    fn projection_keeps_points_inside_canvas() {
        let size = Size::new(400.0, 300.0);
        let points = [(0.0, 0.0), (10.0, 5.0), (-3.0, -2.0)];
        let projection = Projection::fit(size, &points, 10.0);
        for &(lon, lat) in &points {
            let p = projection.project(lon, lat);
            assert!(p.x >= 9.9 && p.x <= 390.1, "x {}", p.x);
            assert!(p.y >= 9.9 && p.y <= 290.1, "y {}", p.y);
        }
        let north = projection.project(0.0, 5.0);
        let south = projection.project(0.0, -2.0);
        assert!(north.y < south.y);
    }

    #[test]
    fn category_order_puts_sizes_first() {
        let airports = vec![
            AirportRecord::new("X", "x", AirportCategory::Unknown("glider_site".into()), 0.0, 0.0),
            AirportRecord::new("L", "l", AirportCategory::LargeAirport, 0.0, 0.0),
            AirportRecord::new("S", "s", AirportCategory::SmallAirport, 0.0, 0.0),
        ];
        assert_eq!(
            category_order(&airports),
            vec![
                AirportCategory::SmallAirport,
                AirportCategory::LargeAirport,
                AirportCategory::Unknown("glider_site".into()),
            ]
        );
    }
}
