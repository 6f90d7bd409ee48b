//! Built-in tool transitions.

use crate::effects::EffectKind;
use crate::router::registry::{ToolRegistry, TransitionError, TransitionOutput};
use crate::router::state::{ApplicationState, FormSubmission, Theme, TodoItem, ViewKey};
use crate::router::toast::ToastRequest;

use serde::Deserialize;

/// Params for tools that take none. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct NoParams {}

#[derive(Debug, Deserialize)]
pub struct HelloNameParams {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct HelloThemeParams {
    pub theme: Theme,
}

#[derive(Debug, Deserialize)]
pub struct AddTodoParams {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoIdParams {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChartClickParams {
    pub index: usize,
}

pub fn register_builtins(registry: &mut ToolRegistry) {
    // hello
    registry.register("hello_name", ViewKey::Hello, hello_name);
    registry.register("hello_theme", ViewKey::Hello, hello_theme);

    // counter
    registry.register("increment", ViewKey::Counter, |state, _: NoParams| {
        let counter = &mut state.counter;
        counter.value = counter.clamp(counter.value.saturating_add(counter.step));
        Ok(TransitionOutput::none())
    });
    registry.register("decrement", ViewKey::Counter, |state, _: NoParams| {
        let counter = &mut state.counter;
        counter.value = counter.clamp(counter.value.saturating_sub(counter.step));
        Ok(TransitionOutput::none())
    });
    registry.register("counter_reset", ViewKey::Counter, |state, _: NoParams| {
        state.counter.value = state.counter.clamp(0);
        Ok(TransitionOutput::with_toast(ToastRequest::info(
            "Counter reset",
        )))
    });

    // todo
    registry.register("addTodo", ViewKey::Todo, add_todo);
    registry.alias("addItem", "addTodo");
    registry.register("toggleTodo", ViewKey::Todo, toggle_todo);
    registry.register("deleteTodo", ViewKey::Todo, delete_todo);

    // form
    registry.register("submitForm", ViewKey::Form, submit_form);
    registry.register("form_reset", ViewKey::Form, |state, _: NoParams| {
        state.form.submission = None;
        Ok(TransitionOutput::none())
    });

    // chart
    registry.register("chart_click", ViewKey::Chart, chart_click);
    registry.register("chart_reset", ViewKey::Chart, |state, _: NoParams| {
        state.chart.selected = None;
        Ok(TransitionOutput::none())
    });

    // weather
    registry.register("toggleUnits", ViewKey::Weather, |state, _: NoParams| {
        state.weather.unit = state.weather.unit.toggled();
        Ok(TransitionOutput::none())
    });
    registry.register("refreshWeather", ViewKey::Weather, |state, _: NoParams| {
        state.weather.loading = true;
        Ok(TransitionOutput::with_effect(EffectKind::WeatherRefresh))
    });
}

fn hello_name(
    state: &mut ApplicationState,
    params: HelloNameParams,
) -> Result<TransitionOutput, TransitionError> {
    state.hello.name = params.name;
    Ok(TransitionOutput::none())
}

fn hello_theme(
    state: &mut ApplicationState,
    params: HelloThemeParams,
) -> Result<TransitionOutput, TransitionError> {
    state.hello.theme = params.theme;
    Ok(TransitionOutput::with_toast(ToastRequest::info(format!(
        "Theme changed to {}",
        params.theme.as_str()
    ))))
}

fn add_todo(
    state: &mut ApplicationState,
    params: AddTodoParams,
) -> Result<TransitionOutput, TransitionError> {
    let text = params.text.trim();
    if text.is_empty() {
        return Err(TransitionError::InvalidParams(String::from(
            "text cannot be empty",
        )));
    }

    let id = state.todo.next_id;
    state.todo.next_id += 1;
    state.todo.items.push(TodoItem {
        id,
        text: text.to_string(),
        completed: false,
    });

    Ok(TransitionOutput::with_toast(ToastRequest::success(
        "Task added!",
    )))
}

fn toggle_todo(
    state: &mut ApplicationState,
    params: TodoIdParams,
) -> Result<TransitionOutput, TransitionError> {
    let item = state
        .todo
        .items
        .iter_mut()
        .find(|item| item.id == params.id)
        .ok_or_else(|| TransitionError::Rejected(format!("No todo with id {}", params.id)))?;
    item.completed = !item.completed;
    Ok(TransitionOutput::none())
}

fn delete_todo(
    state: &mut ApplicationState,
    params: TodoIdParams,
) -> Result<TransitionOutput, TransitionError> {
    let before = state.todo.items.len();
    state.todo.items.retain(|item| item.id != params.id);
    if state.todo.items.len() == before {
        return Err(TransitionError::Rejected(format!(
            "No todo with id {}",
            params.id
        )));
    }
    Ok(TransitionOutput::with_toast(ToastRequest::info(
        "Task deleted",
    )))
}

fn submit_form(
    state: &mut ApplicationState,
    params: FormSubmission,
) -> Result<TransitionOutput, TransitionError> {
    if params.name.trim().is_empty() || params.email.trim().is_empty() {
        return Err(TransitionError::InvalidParams(String::from(
            "name and email are required",
        )));
    }

    state.form.submission = Some(params);
    Ok(TransitionOutput::with_toast(ToastRequest::success(
        "Form submitted successfully!",
    )))
}

fn chart_click(
    state: &mut ApplicationState,
    params: ChartClickParams,
) -> Result<TransitionOutput, TransitionError> {
    let label = state
        .chart
        .bars
        .get(params.index)
        .map(|bar| bar.label.clone())
        .ok_or_else(|| {
            TransitionError::InvalidParams(format!(
                "index {} out of range (0..{})",
                params.index,
                state.chart.bars.len()
            ))
        })?;

    state.chart.selected = Some(params.index);
    Ok(TransitionOutput::with_toast(ToastRequest::info(format!(
        "Selected: {label}"
    ))))
}
