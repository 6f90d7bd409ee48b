//! Host-owned application state, one slice per view.
//!
//! Only the [`ActionRouter`](crate::router::ActionRouter) mutates an
//! [`ApplicationState`]; generators and renderers read snapshots.

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_HELLO_NAME: &str = "User";
const DEFAULT_DASHBOARD_URL: &str = "https://modelcontextprotocol.io";

/// Views the host knows how to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKey {
    Hello,
    Counter,
    Todo,
    Form,
    Chart,
    Weather,
    Dashboard,
    Summary,
}

impl ViewKey {
    pub const ALL: [ViewKey; 8] = [
        ViewKey::Hello,
        ViewKey::Counter,
        ViewKey::Todo,
        ViewKey::Form,
        ViewKey::Chart,
        ViewKey::Weather,
        ViewKey::Dashboard,
        ViewKey::Summary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKey::Hello => "hello",
            ViewKey::Counter => "counter",
            ViewKey::Todo => "todo",
            ViewKey::Form => "form",
            ViewKey::Chart => "chart",
            ViewKey::Weather => "weather",
            ViewKey::Dashboard => "dashboard",
            ViewKey::Summary => "summary",
        }
    }
}

impl Display for ViewKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ViewKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ViewKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| format!("Unknown view: {value}"))
    }
}

// ============================================
// SLICES
// ============================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Gradient,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Gradient => "gradient",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloState {
    pub name: String,
    pub theme: Theme,
}

impl Default for HelloState {
    fn default() -> Self {
        Self {
            name: DEFAULT_HELLO_NAME.to_string(),
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterState {
    pub value: i64,
    #[serde(default = "default_counter_step")]
    pub step: i64,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

impl CounterState {
    /// `value` limited to `min..=max`.
    pub fn clamp(&self, value: i64) -> i64 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            value: 0,
            step: default_counter_step(),
            min: None,
            max: None,
        }
    }
}

fn default_counter_step() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoState {
    pub items: Vec<TodoItem>,
    /// Id handed to the next added item; ids are never reused.
    pub next_id: u64,
}

impl TodoState {
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }
}

impl Default for TodoState {
    fn default() -> Self {
        Self {
            items: vec![
                TodoItem {
                    id: 1,
                    text: String::from("Learn the resource protocol"),
                    completed: true,
                },
                TodoItem {
                    id: 2,
                    text: String::from("Build a cool tool"),
                    completed: false,
                },
            ],
            next_id: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    /// `Some` once the contact form has been submitted.
    pub submission: Option<FormSubmission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    pub bars: Vec<ChartBar>,
    pub selected: Option<usize>,
}

impl Default for ChartState {
    fn default() -> Self {
        let bars = [
            ("Jan", 4000),
            ("Feb", 3000),
            ("Mar", 5500),
            ("Apr", 4500),
            ("May", 6000),
            ("Jun", 7000),
        ]
        .into_iter()
        .map(|(label, value)| ChartBar {
            label: label.to_string(),
            value,
        })
        .collect();

        Self {
            bars,
            selected: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    F,
    C,
}

impl TemperatureUnit {
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::F => TemperatureUnit::C,
            TemperatureUnit::C => TemperatureUnit::F,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::F => "F",
            TemperatureUnit::C => "C",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub temp_f: i32,
    pub condition: String,
    pub humidity: u32,
    pub wind_mph: u32,
}

impl WeatherReading {
    /// Temperature in `unit`, rounded to the nearest degree.
    pub fn temperature(&self, unit: TemperatureUnit) -> i32 {
        match unit {
            TemperatureUnit::F => self.temp_f,
            TemperatureUnit::C => ((f64::from(self.temp_f) - 32.0) * 5.0 / 9.0).round() as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub unit: TemperatureUnit,
    pub loading: bool,
    pub reading: WeatherReading,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::default(),
            loading: false,
            reading: WeatherReading {
                city: String::from("San Francisco"),
                temp_f: 72,
                condition: String::from("Partly Cloudy"),
                humidity: 45,
                wind_mph: 12,
            },
        }
    }
}

/// Kept as text so a deserialized snapshot with a bad url still loads; the
/// dashboard view reports it instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    url: String,
}

impl DashboardState {
    pub fn new(url: &Url) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            url: DEFAULT_DASHBOARD_URL.to_string(),
        }
    }
}

// ============================================
// APPLICATION STATE
// ============================================

/// All per-view state for one host session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationState {
    pub hello: HelloState,
    pub counter: CounterState,
    pub todo: TodoState,
    pub form: FormState,
    pub chart: ChartState,
    pub weather: WeatherState,
    pub dashboard: DashboardState,
}

impl ApplicationState {
    pub fn new() -> Self {
        Self::default()
    }
}
