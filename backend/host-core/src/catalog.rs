//! Built-in tool server: one `<view>_ui` tool per view.
//!
//! Params seed the view's slice on top of the catalog's base state, so
//! `counter_ui {"initialValue": 5}` renders a counter at 5 whatever the
//! session itself holds. Unset params keep the base values.

use crate::collaborators::ToolBackend;
use crate::generator::generate_view;
use crate::router::state::{
    ApplicationState, ChartBar, DashboardState, TemperatureUnit, Theme, TodoItem, ViewKey,
};

use models::Resource;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

/// Entry in the [`ViewCatalog`] tool listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: &'static str,
    pub view: ViewKey,
}

#[derive(Debug, Deserialize)]
struct HelloParams {
    name: Option<String>,
    theme: Option<Theme>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CounterParams {
    initial_value: Option<i64>,
    step: Option<i64>,
    min: Option<i64>,
    max: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TodoParamsItem {
    text: String,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Deserialize)]
struct TodoParams {
    items: Option<Vec<TodoParamsItem>>,
}

#[derive(Debug, Deserialize)]
struct ChartParamsPoint {
    label: String,
    value: u64,
}

#[derive(Debug, Deserialize)]
struct ChartParams {
    data: Option<Vec<ChartParamsPoint>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WeatherUnits {
    Fahrenheit,
    Celsius,
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    location: Option<String>,
    units: Option<WeatherUnits>,
}

#[derive(Debug, Deserialize)]
struct DashboardParams {
    url: Option<Url>,
}

/// Tool backend serving one `<view>_ui` tool per view.
#[derive(Debug, Clone, Default)]
pub struct ViewCatalog {
    base: ApplicationState,
}

impl ViewCatalog {
    pub fn new(base: ApplicationState) -> Self {
        Self { base }
    }

    pub fn tools(&self) -> Vec<ToolDescriptor> {
        ViewKey::ALL
            .into_iter()
            .map(|view| ToolDescriptor {
                name: format!("{view}_ui"),
                description: describe(view),
                view,
            })
            .collect()
    }

    pub fn view_for_tool(name: &str) -> Option<ViewKey> {
        name.strip_suffix("_ui")
            .and_then(|view| view.parse::<ViewKey>().ok())
    }

    /// The base state with `params` applied to `view`'s slice.
    ///
    /// Form and summary take no params; anything passed to them is ignored.
    ///
    /// # Errors
    ///
    /// Returns a description naming `tool` when params do not parse or their
    /// values are inconsistent.
    pub fn seed(
        &self,
        view: ViewKey,
        tool: &str,
        params: &Map<String, Value>,
    ) -> Result<ApplicationState, String> {
        let mut state = self.base.clone();

        match view {
            ViewKey::Hello => {
                let params: HelloParams = parse(tool, params)?;
                if let Some(name) = params.name {
                    if name.trim().is_empty() {
                        return Err(format!("Invalid params for {tool}: name cannot be empty"));
                    }
                    state.hello.name = name;
                }
                if let Some(theme) = params.theme {
                    state.hello.theme = theme;
                }
            }
            ViewKey::Counter => {
                let params: CounterParams = parse(tool, params)?;
                let counter = &mut state.counter;
                counter.step = params.step.unwrap_or(counter.step);
                counter.min = params.min.or(counter.min);
                counter.max = params.max.or(counter.max);
                if counter.step == 0 {
                    return Err(format!("Invalid params for {tool}: step cannot be 0"));
                }
                if let (Some(min), Some(max)) = (counter.min, counter.max) {
                    if min > max {
                        return Err(format!(
                            "Invalid params for {tool}: min {min} is greater than max {max}"
                        ));
                    }
                }
                counter.value = match params.initial_value {
                    Some(value) if counter.clamp(value) != value => {
                        return Err(format!(
                            "Invalid params for {tool}: initialValue {value} is outside min..max"
                        ));
                    }
                    Some(value) => value,
                    None => counter.clamp(counter.value),
                };
            }
            ViewKey::Todo => {
                let params: TodoParams = parse(tool, params)?;
                if let Some(items) = params.items {
                    state.todo.items = items
                        .into_iter()
                        .zip(1..)
                        .map(|(item, id)| TodoItem {
                            id,
                            text: item.text,
                            completed: item.completed,
                        })
                        .collect();
                    state.todo.next_id = state.todo.items.len() as u64 + 1;
                }
            }
            ViewKey::Chart => {
                let params: ChartParams = parse(tool, params)?;
                if let Some(data) = params.data {
                    state.chart.bars = data
                        .into_iter()
                        .map(|point| ChartBar {
                            label: point.label,
                            value: point.value,
                        })
                        .collect();
                    state.chart.selected = None;
                }
            }
            ViewKey::Weather => {
                let params: WeatherParams = parse(tool, params)?;
                if let Some(location) = params.location {
                    if location.trim().is_empty() {
                        return Err(format!(
                            "Invalid params for {tool}: location cannot be empty"
                        ));
                    }
                    state.weather.reading.city = location;
                }
                if let Some(units) = params.units {
                    state.weather.unit = match units {
                        WeatherUnits::Fahrenheit => TemperatureUnit::F,
                        WeatherUnits::Celsius => TemperatureUnit::C,
                    };
                }
            }
            ViewKey::Dashboard => {
                let params: DashboardParams = parse(tool, params)?;
                if let Some(url) = params.url {
                    state.dashboard = DashboardState::new(&url);
                }
            }
            ViewKey::Form | ViewKey::Summary => {}
        }

        Ok(state)
    }
}

impl ToolBackend for ViewCatalog {
    fn call_tool(&self, name: &str, params: &Map<String, Value>) -> Result<Resource, String> {
        let view = Self::view_for_tool(name).ok_or_else(|| format!("Unknown tool: {name}"))?;
        let state = self.seed(view, name, params)?;
        Ok(generate_view(view, &state))
    }
}

fn parse<P: DeserializeOwned>(tool: &str, params: &Map<String, Value>) -> Result<P, String> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| format!("Invalid params for {tool}: {e}"))
}

fn describe(view: ViewKey) -> &'static str {
    match view {
        ViewKey::Hello => "Display a personalized greeting card",
        ViewKey::Counter => "Display an interactive counter",
        ViewKey::Todo => "Display an interactive todo list",
        ViewKey::Form => "Display a contact form",
        ViewKey::Chart => "Display an interactive bar chart",
        ViewKey::Weather => "Display a weather card",
        ViewKey::Dashboard => "Embed an external dashboard",
        ViewKey::Summary => "Display a session summary built by a remote program",
    }
}
