use crate::collaborators::{LinkNavigator, PromptForwarder};
use crate::effects::{EffectCompletion, EffectKind, Ticket};
use crate::error::router::RouterError;
use crate::router::action_log::ActionLog;
use crate::router::state::{ApplicationState, Theme, ViewKey};
use crate::router::toast::{ToastLevel, ToastQueue, ToastRequest};
use crate::router::{ActionRouter, ToolRegistry, TransitionError, TransitionOutput};

use models::Action;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use url::Url;

#[derive(Default)]
struct Recorder {
    prompts: Mutex<Vec<String>>,
    links: Mutex<Vec<String>>,
}

impl PromptForwarder for Recorder {
    fn forward_prompt(&self, prompt: &str) {
        self.prompts.lock().unwrap().push(prompt.to_string());
    }
}

impl LinkNavigator for Recorder {
    fn navigate(&self, url: &Url) {
        self.links.lock().unwrap().push(url.to_string());
    }
}

fn router_with(capacity: usize) -> (ActionRouter, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let router = ActionRouter::new(
        ApplicationState::new(),
        ToolRegistry::with_builtins(),
        capacity,
        Duration::from_secs(3),
        recorder.clone(),
        recorder.clone(),
    );
    (router, recorder)
}

fn tool(name: &str, params: serde_json::Value) -> Action {
    Action::tool(name, params)
}

// ============================================
// DISPATCH
// ============================================

/// **VALUE**: Unknown tools are logged and ignored.
///
/// **WHY THIS MATTERS**: A surface can post any tool name. The host has to
/// stay consistent and keep a record for diagnostics.
///
/// **BUG THIS CATCHES**: Panicking on unknown names, mutating state, or
/// skipping the log entry when dispatch fails.
#[test]
fn given_unknown_tool_when_dispatched_then_state_unchanged_and_action_logged() {
    // GIVEN: A fresh router
    let (mut router, _) = router_with(50);
    let before = router.state().clone();

    // WHEN: Dispatching a tool nobody registered
    let outcome = router.dispatch(tool("launchRockets", json!({})), Instant::now());

    // THEN: Nothing changed but the action is in the log
    assert_eq!(router.state(), &before);
    assert!(!outcome.state_changed);
    assert_eq!(router.log().len(), 1);
    assert_eq!(outcome.sequence_id, 1);
    assert!(matches!(
        outcome.rejection,
        Some(RouterError::UnknownTool { ref tool_name, .. }) if tool_name == "launchRockets"
    ));
}

#[test]
fn given_three_increments_when_dispatched_then_counter_is_three_and_log_is_ordered() {
    let (mut router, _) = router_with(50);

    for _ in 0..3 {
        let outcome = router.dispatch(tool("increment", json!({})), Instant::now());
        assert!(outcome.state_changed);
        assert_eq!(outcome.view, Some(ViewKey::Counter));
    }

    assert_eq!(router.state().counter.value, 3);
    let ids: Vec<u64> = router.log().entries().map(|e| e.sequence_id).collect();
    assert_eq!(ids, vec![3, 2, 1], "log is most recent first");
}

/// **VALUE**: Counter tools honour the seeded step and bounds.
///
/// **WHY THIS MATTERS**: `counter_ui {"step": 5, "max": 12}` promises a counter
/// that never passes 12. Stepping by one or running past the bound breaks it.
///
/// **BUG THIS CATCHES**: Hard-coded `+= 1`, or clamping only on increment.
#[test]
fn given_bounded_counter_when_stepping_past_bounds_then_value_is_clamped() {
    // GIVEN: A counter stepping by 5 within -3..=12
    let recorder = Arc::new(Recorder::default());
    let mut state = ApplicationState::new();
    state.counter.step = 5;
    state.counter.min = Some(-3);
    state.counter.max = Some(12);
    let mut router = ActionRouter::new(
        state,
        ToolRegistry::with_builtins(),
        50,
        Duration::from_secs(3),
        recorder.clone(),
        recorder,
    );

    // WHEN/THEN: Incrementing walks 5, 10, then stops at 12
    let values: Vec<i64> = (0..4)
        .map(|_| {
            router.dispatch(tool("increment", json!({})), Instant::now());
            router.state().counter.value
        })
        .collect();
    assert_eq!(values, vec![5, 10, 12, 12]);

    // AND: At the bound, a further increment is not a state change
    let outcome = router.dispatch(tool("increment", json!({})), Instant::now());
    assert!(!outcome.state_changed);

    // AND: Decrementing stops at the lower bound
    for _ in 0..5 {
        router.dispatch(tool("decrement", json!({})), Instant::now());
    }
    assert_eq!(router.state().counter.value, -3);

    // AND: Reset lands on zero, which is inside the range
    router.dispatch(tool("counter_reset", json!({})), Instant::now());
    assert_eq!(router.state().counter.value, 0);
}

/// **VALUE**: The action log is bounded and evicts oldest first.
///
/// **WHY THIS MATTERS**: Sessions can run for hours; an unbounded log is a
/// slow memory leak.
///
/// **BUG THIS CATCHES**: Off-by-one eviction, or sequence ids restarting
/// after eviction.
#[test]
fn given_log_capacity_20_when_25_actions_dispatched_then_keeps_ids_6_to_25() {
    // GIVEN: A router whose log holds 20 entries
    let (mut router, _) = router_with(20);

    // WHEN: Dispatching 25 actions
    for _ in 0..25 {
        router.dispatch(tool("increment", json!({})), Instant::now());
    }

    // THEN: Only the newest 20 survive
    let mut ids: Vec<u64> = router.log().entries().map(|e| e.sequence_id).collect();
    ids.reverse();
    assert_eq!(ids, (6..=25).collect::<Vec<u64>>());
    assert_eq!(router.state().counter.value, 25);
}

#[test]
fn given_add_todo_without_text_when_dispatched_then_rejected_without_change() {
    let (mut router, _) = router_with(50);
    let before = router.state().clone();

    for name in ["addTodo", "addItem"] {
        let outcome = router.dispatch(tool(name, json!({})), Instant::now());

        assert_eq!(router.state(), &before);
        assert!(matches!(
            outcome.rejection,
            Some(RouterError::InvalidParams { .. })
        ));
    }
    assert_eq!(router.log().len(), 2);
}

#[test]
fn given_blank_todo_text_when_dispatched_then_invalid_params() {
    let (mut router, _) = router_with(50);

    let outcome = router.dispatch(tool("addTodo", json!({"text": "   "})), Instant::now());

    assert!(matches!(
        outcome.rejection,
        Some(RouterError::InvalidParams { ref message, .. }) if message.contains("empty")
    ));
    assert_eq!(router.state().todo.items.len(), 2);
}

#[test]
fn given_add_item_alias_when_dispatched_then_adds_todo_with_next_id_and_toast() {
    // GIVEN: The default two-item list
    let (mut router, _) = router_with(50);
    let now = Instant::now();

    // WHEN: Adding through the legacy alias
    let outcome = router.dispatch(tool("addItem", json!({"text": "  Ship it "})), now);

    // THEN: The item gets id 3, trimmed text, and a success toast
    assert!(outcome.state_changed);
    let added = router.state().todo.items.last().expect("item added");
    assert_eq!(added.id, 3);
    assert_eq!(added.text, "Ship it");
    assert!(!added.completed);
    assert_eq!(router.state().todo.next_id, 4);

    let toasts = router.active_toasts(now);
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Task added!");
    assert_eq!(toasts[0].level, ToastLevel::Success);
}

#[test]
fn given_todo_ids_when_toggled_and_deleted_then_unknown_ids_are_rejected() {
    let (mut router, _) = router_with(50);

    let toggled = router.dispatch(tool("toggleTodo", json!({"id": 2})), Instant::now());
    assert!(toggled.state_changed);
    assert!(router.state().todo.items[1].completed);

    let missing = router.dispatch(tool("toggleTodo", json!({"id": 99})), Instant::now());
    assert!(matches!(missing.rejection, Some(RouterError::Rejected { .. })));

    let deleted = router.dispatch(tool("deleteTodo", json!({"id": 1})), Instant::now());
    assert!(deleted.state_changed);
    assert_eq!(router.state().todo.items.len(), 1);

    let again = router.dispatch(tool("deleteTodo", json!({"id": 1})), Instant::now());
    assert!(matches!(again.rejection, Some(RouterError::Rejected { .. })));
    assert_eq!(router.state().todo.items.len(), 1);
}

#[test]
fn given_id_with_wrong_type_when_toggle_dispatched_then_invalid_params() {
    let (mut router, _) = router_with(50);

    let outcome = router.dispatch(tool("toggleTodo", json!({"id": "two"})), Instant::now());

    assert!(matches!(
        outcome.rejection,
        Some(RouterError::InvalidParams { .. })
    ));
}

#[test]
fn given_hello_tools_when_dispatched_then_name_and_theme_change() {
    let (mut router, _) = router_with(50);
    let now = Instant::now();

    router.dispatch(tool("hello_name", json!({"name": "Grace"})), now);
    router.dispatch(tool("hello_theme", json!({"theme": "dark"})), now);
    let bad = router.dispatch(tool("hello_theme", json!({"theme": "neon"})), now);

    assert_eq!(router.state().hello.name, "Grace");
    assert_eq!(router.state().hello.theme, Theme::Dark);
    assert!(bad.rejection.is_some());
    let messages: Vec<String> = router
        .active_toasts(now)
        .into_iter()
        .map(|toast| toast.message)
        .collect();
    assert_eq!(messages, vec![String::from("Theme changed to dark")]);
}

#[test]
fn given_form_submission_when_dispatched_then_requires_name_and_email() {
    let (mut router, _) = router_with(50);

    let missing = router.dispatch(
        tool("submitForm", json!({"name": "Ada", "email": ""})),
        Instant::now(),
    );
    assert!(missing.rejection.is_some());
    assert!(router.state().form.submission.is_none());

    let ok = router.dispatch(
        tool(
            "submitForm",
            json!({"name": "Ada", "email": "ada@example.com", "message": "Hi"}),
        ),
        Instant::now(),
    );
    assert!(ok.state_changed);
    assert_eq!(
        router.state().form.submission.as_ref().map(|s| s.email.as_str()),
        Some("ada@example.com")
    );

    router.dispatch(tool("form_reset", json!({})), Instant::now());
    assert!(router.state().form.submission.is_none());
}

#[test]
fn given_chart_click_when_dispatched_then_selects_bar_or_rejects_out_of_range() {
    let (mut router, _) = router_with(50);
    let now = Instant::now();

    router.dispatch(tool("chart_click", json!({"index": 2})), now);
    assert_eq!(router.state().chart.selected, Some(2));

    let out_of_range = router.dispatch(tool("chart_click", json!({"index": 6})), now);
    assert!(matches!(
        out_of_range.rejection,
        Some(RouterError::InvalidParams { .. })
    ));
    assert_eq!(router.state().chart.selected, Some(2));

    router.dispatch(tool("chart_reset", json!({})), now);
    assert_eq!(router.state().chart.selected, None);
}

#[test]
fn given_identical_state_when_tool_dispatched_then_state_changed_is_false() {
    let (mut router, _) = router_with(50);

    let outcome = router.dispatch(tool("counter_reset", json!({})), Instant::now());

    assert!(outcome.rejection.is_none());
    assert!(!outcome.state_changed, "resetting a zero counter is a no-op");
}

#[test]
fn given_prompt_and_link_when_dispatched_then_forwarded_without_state_change() {
    // GIVEN: A router with recording collaborators
    let (mut router, recorder) = router_with(50);
    let before = router.state().clone();

    // WHEN: Dispatching a prompt and a link
    router.dispatch(
        Action::Prompt {
            prompt: String::from("What is this?"),
        },
        Instant::now(),
    );
    router.dispatch(
        Action::Link {
            url: Url::parse("https://example.com/docs").unwrap(),
        },
        Instant::now(),
    );

    // THEN: Both went to their collaborator and were logged
    assert_eq!(router.state(), &before);
    assert_eq!(*recorder.prompts.lock().unwrap(), vec!["What is this?"]);
    assert_eq!(
        *recorder.links.lock().unwrap(),
        vec!["https://example.com/docs"]
    );
    assert_eq!(router.log().len(), 2);
}

#[test]
fn given_refresh_weather_when_dispatched_then_sets_loading_and_requests_effect() {
    let (mut router, _) = router_with(50);

    let outcome = router.dispatch(tool("refreshWeather", json!({})), Instant::now());

    assert!(router.state().weather.loading);
    assert_eq!(outcome.effect, Some(EffectKind::WeatherRefresh));
}

#[test]
fn given_pending_refresh_when_completed_then_reading_updates_and_loading_clears() {
    // GIVEN: A refresh in progress
    let (mut router, _) = router_with(50);
    let now = Instant::now();
    router.dispatch(tool("refreshWeather", json!({})), now);

    // WHEN: Its completion arrives
    let changed = router.complete_effect(
        EffectCompletion {
            kind: EffectKind::WeatherRefresh,
            ticket: Ticket::new(3),
        },
        now,
    );

    // THEN: The reading is derived from the ticket and a toast is raised
    assert!(changed);
    let weather = &router.state().weather;
    assert!(!weather.loading);
    assert_eq!(weather.reading.temp_f, 65 + (3 * 7 % 20));
    assert_eq!(weather.reading.humidity, 30 + (3 * 13 % 50));
    assert!(
        router
            .active_toasts(now)
            .iter()
            .any(|toast| toast.message == "Weather updated")
    );
}

#[test]
fn given_pending_refresh_when_cancelled_then_loading_clears_without_new_reading() {
    let (mut router, _) = router_with(50);
    router.dispatch(tool("refreshWeather", json!({})), Instant::now());
    let reading = router.state().weather.reading.clone();

    assert!(router.cancel_effect(EffectKind::WeatherRefresh));
    assert!(!router.state().weather.loading);
    assert_eq!(router.state().weather.reading, reading);
    assert!(!router.cancel_effect(EffectKind::WeatherRefresh));
}

// ============================================
// REGISTRY
// ============================================

#[test]
fn given_builtins_when_resolving_aliases_then_follow_to_canonical_name() {
    let registry = ToolRegistry::with_builtins();

    assert_eq!(registry.resolve("addItem"), Some("addTodo"));
    assert_eq!(registry.resolve("addTodo"), Some("addTodo"));
    assert_eq!(registry.resolve("nope"), None);
    assert_eq!(registry.view_of("addItem"), Some(ViewKey::Todo));
    assert_eq!(registry.view_of("refreshWeather"), Some(ViewKey::Weather));
    assert!(!registry.names().any(|name| name == "addItem"));
}

#[test]
fn given_alias_to_missing_tool_when_resolved_then_none() {
    let mut registry = ToolRegistry::new();
    registry.alias("ghost", "missing");

    assert_eq!(registry.resolve("ghost"), None);
    assert!(!registry.contains("ghost"));
}

#[derive(Debug, Deserialize)]
struct StepParams {
    step: i64,
}

#[test]
fn given_custom_tool_when_registered_then_applies_to_a_draft_only() {
    // GIVEN: A registry with one custom transition that fails on step 0
    let mut registry = ToolRegistry::new();
    registry.register("step", ViewKey::Counter, |state, params: StepParams| {
        if params.step == 0 {
            return Err(TransitionError::Rejected(String::from("zero step")));
        }
        state.counter.value += params.step;
        Ok(TransitionOutput::with_toast(ToastRequest::info("stepped")))
    });
    let state = ApplicationState::new();

    // WHEN: Applying it successfully and unsuccessfully
    let mut params = serde_json::Map::new();
    params.insert(String::from("step"), json!(5));
    let applied = registry.apply("step", &state, params).expect("applies");

    let mut zero = serde_json::Map::new();
    zero.insert(String::from("step"), json!(0));
    let rejected = registry.apply("step", &state, zero);

    // THEN: The draft carries the change, the input is untouched
    assert_eq!(applied.state.counter.value, 5);
    assert_eq!(applied.output.toast, Some(ToastRequest::info("stepped")));
    assert_eq!(state.counter.value, 0);
    assert!(matches!(rejected, Err(RouterError::Rejected { .. })));
}

// ============================================
// ACTION LOG AND TOASTS
// ============================================

#[test]
fn given_long_tool_params_when_preview_called_then_truncated_with_ellipsis() {
    let mut log = ActionLog::new(5);
    let text = "x".repeat(200);
    log.append(tool("addTodo", json!({ "text": text })), SystemTime::now());

    let preview = log.latest().expect("entry").preview();

    assert_eq!(preview.chars().count(), 61);
    assert!(preview.starts_with("addTodo {\"text\":\"xxx"));
    assert!(preview.ends_with('…'));
}

#[test]
fn given_zero_capacity_when_log_created_then_keeps_one_entry() {
    let mut log = ActionLog::new(0);
    log.append(tool("increment", json!({})), SystemTime::now());
    log.append(tool("decrement", json!({})), SystemTime::now());

    assert_eq!(log.capacity(), 1);
    assert_eq!(log.len(), 1);
    assert_eq!(
        log.latest().and_then(|e| e.action.tool_name()),
        Some("decrement")
    );
}

#[test]
fn given_toasts_when_ttl_elapses_then_they_expire_in_order() {
    // GIVEN: Two toasts pushed one second apart with a 3s ttl
    let mut queue = ToastQueue::new(Duration::from_secs(3));
    let start = Instant::now();
    let first = queue.push(ToastRequest::info("first"), start);
    let second = queue.push(ToastRequest::error("second"), start + Duration::from_secs(1));

    // THEN: Both are active at 2s, only the second at 3s, none at 4s
    assert_eq!(
        queue
            .active(start + Duration::from_secs(2))
            .iter()
            .map(|t| t.id)
            .collect::<Vec<_>>(),
        vec![first, second]
    );
    assert_eq!(
        queue
            .active(start + Duration::from_secs(3))
            .iter()
            .map(|t| t.id)
            .collect::<Vec<_>>(),
        vec![second]
    );
    assert!(queue.active(start + Duration::from_secs(4)).is_empty());
}
