use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use flexfilter::{
    Action, Catalog, Deferred, EventResult, FilterDefinition, FilterKind, FilterOption,
    FilterSession, FilterValue, Key, RenderSurface, SessionConfig, SuggestionSource, ValueMap,
};
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn mounted(catalog: Catalog) -> (FilterSession, Rc<RefCell<Vec<ValueMap>>>) {
    let emitted = Rc::new(RefCell::new(Vec::new()));
    let sink = emitted.clone();
    let mut session = FilterSession::new(catalog, SessionConfig::default())
        .on_output(move |values| sink.borrow_mut().push(values.clone()));
    session.mount();
    (session, emitted)
}

fn issue_catalog() -> Catalog {
    Catalog::new([
        FilterDefinition::dropdown("status", "Status", ["Open", "Closed", "Reopened"]),
        FilterDefinition::text("name", "Name"),
        FilterDefinition::boolean("mine", "Assigned to me"),
        FilterDefinition::new("when", "When", FilterKind::Unknown("daterange".into())),
    ])
    .unwrap()
}

fn labels(session: &FilterSession) -> Vec<String> {
    session
        .suggestions()
        .items()
        .iter()
        .map(|o| o.label().to_string())
        .collect()
}

fn add(session: &mut FilterSession, label: &str) {
    session.dispatch(Action::ChangeMainSearch(label.to_string()));
    let index = session
        .suggestions()
        .items()
        .iter()
        .position(|o| o.label() == label)
        .expect("filter should be suggested");
    assert_eq!(session.dispatch(Action::ClickOption(index)), EventResult::Consumed);
}

/// Surface that knows which per-filter inputs have been rendered.
#[derive(Default)]
struct FakeSurface {
    inputs: HashSet<String>,
    focused: Option<String>,
}

impl FakeSurface {
    fn render(&mut self, session: &FilterSession) {
        self.inputs = session
            .active()
            .iter()
            .filter(|f| f.kind.has_input())
            .map(|f| f.key.clone())
            .collect();
    }
}

impl RenderSurface for FakeSurface {
    fn focus_filter_input(&mut self, key: &str) -> bool {
        if self.inputs.contains(key) {
            self.focused = Some(key.to_string());
            true
        } else {
            false
        }
    }
}

fn assert_values_within_active(session: &FilterSession) {
    for key in session.values().keys() {
        assert!(
            session.active().contains(key),
            "value for '{}' without an active filter",
            key
        );
    }
}

// ============================================================================
// Mount / teardown
// ============================================================================

#[test]
fn test_mount_emits_empty_map_once() {
    let (mut session, emitted) = mounted(issue_catalog());
    assert_eq!(emitted.borrow().len(), 1);
    assert!(emitted.borrow()[0].is_empty());

    session.mount();
    assert_eq!(emitted.borrow().len(), 1);
}

#[test]
fn test_actions_before_mount_are_ignored() {
    let mut session = FilterSession::new(issue_catalog(), SessionConfig::default());
    assert_eq!(session.dispatch(Action::FocusMainSearch), EventResult::Ignored);
    assert!(!session.suggestions().is_open());
}

#[test]
fn test_teardown_detaches() {
    let (mut session, emitted) = mounted(issue_catalog());
    session.dispatch(Action::FocusMainSearch);
    assert!(session.suggestions().is_open());

    session.teardown();
    assert!(!session.is_mounted());
    assert!(!session.suggestions().is_open());
    assert_eq!(session.dispatch(Action::KeyDown(Key::Enter)), EventResult::Ignored);
    assert_eq!(emitted.borrow().len(), 1);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_a_pick_filter_from_search() {
    let catalog = Catalog::from_json(
        r#"[{"key":"status","label":"Status","type":"dropdown","options":[{"label":"Open","key":"v1"}]}]"#,
    )
    .unwrap();
    let (mut session, _) = mounted(catalog);

    session.dispatch(Action::ChangeMainSearch("Sta".into()));
    assert_eq!(session.suggestions().len(), 1);
    assert_eq!(session.suggestions().items()[0].key(), Some("status"));

    session.dispatch(Action::ClickOption(0));
    assert_eq!(session.active().keys().collect::<Vec<_>>(), vec!["status"]);
    assert_eq!(session.main_query(), "");
    assert!(!session.suggestions().is_open());
    assert_eq!(
        session.pending().iter().cloned().collect::<Vec<_>>(),
        vec![Deferred::FocusFilterInput("status".into())]
    );

    let mut surface = FakeSurface::default();
    surface.render(&session);
    assert_eq!(session.settle(&mut surface), 1);
    assert_eq!(surface.focused.as_deref(), Some("status"));
    assert!(session.pending().is_empty());
}

#[test]
fn test_scenario_b_value_pick_with_enter() {
    let (mut session, emitted) = mounted(
        Catalog::new([FilterDefinition::dropdown("status", "Status", ["Open"])]).unwrap(),
    );
    add(&mut session, "Status");

    session.dispatch(Action::FocusFilterInput("status".into()));
    assert_eq!(labels(&session), vec!["Open"]);
    assert_eq!(session.focus_context(), Some("status"));
    assert_eq!(session.suggestions().items()[0].key(), None);

    session.dispatch(Action::KeyDown(Key::Enter));
    assert_eq!(session.values().to_json(), json!({ "status": "Open" }));
    assert_eq!(emitted.borrow().last().unwrap().to_json(), json!({ "status": "Open" }));
    assert_eq!(session.input_text("status"), "Open");
    assert!(!session.suggestions().is_open());
}

#[test]
fn test_scenario_c_remove_clears_everything() {
    let (mut session, emitted) = mounted(
        Catalog::new([FilterDefinition::dropdown("status", "Status", ["Open"])]).unwrap(),
    );
    add(&mut session, "Status");
    session.dispatch(Action::FocusFilterInput("status".into()));
    session.dispatch(Action::KeyDown(Key::Enter));

    assert_eq!(
        session.dispatch(Action::ClickRemove("status".into())),
        EventResult::Consumed
    );
    assert!(session.active().is_empty());
    assert!(session.values().is_empty());
    assert_eq!(session.input_text("status"), "");
    assert_eq!(emitted.borrow().last().unwrap().to_json(), json!({}));
}

#[test]
fn test_scenario_d_text_commits_only_on_enter() {
    let (mut session, emitted) = mounted(issue_catalog());
    add(&mut session, "Name");
    let before = emitted.borrow().len();

    session.dispatch(Action::FocusFilterInput("name".into()));
    session.dispatch(Action::ChangeFilterInput {
        key: "name".into(),
        text: "Ann".into(),
    });
    assert!(session.values().is_empty());
    assert_eq!(emitted.borrow().len(), before);

    session.dispatch(Action::CommitFilterInput("name".into()));
    assert_eq!(session.values().to_json(), json!({ "name": "Ann" }));
    assert_eq!(emitted.borrow().len(), before + 1);
}

#[test]
fn test_scenario_e_boolean_written_immediately() {
    let catalog = Catalog::from_json(
        r#"[{"key":"status","label":"Status","type":"dropdown","options":["Open"]},
            {"key":"v2","label":"Flagged","type":"boolean"}]"#,
    )
    .unwrap();
    let (mut session, emitted) = mounted(catalog);

    add(&mut session, "Flagged");
    assert!(session.active().contains("v2"));
    assert_eq!(session.values().get("v2"), Some(&FilterValue::Flag(true)));
    assert_eq!(emitted.borrow().last().unwrap().to_json(), json!({ "v2": true }));
    assert!(session.pending().is_empty());
}

// ============================================================================
// Selection and commit
// ============================================================================

#[test]
fn test_click_and_enter_commit_identically() {
    let (mut by_click, clicked) = mounted(issue_catalog());
    let (mut by_key, keyed) = mounted(issue_catalog());

    add(&mut by_click, "Status");
    add(&mut by_key, "Status");
    for session in [&mut by_click, &mut by_key] {
        session.dispatch(Action::FocusFilterInput("status".into()));
        session.dispatch(Action::KeyDown(Key::Down));
    }

    by_click.dispatch(Action::ClickOption(1));
    by_key.dispatch(Action::KeyDown(Key::Enter));

    assert_eq!(by_click.values(), by_key.values());
    assert_eq!(by_click.input_text("status"), by_key.input_text("status"));
    assert_eq!(*clicked.borrow(), *keyed.borrow());
}

#[test]
fn test_dropdown_typing_filters_options_without_output() {
    let (mut session, emitted) = mounted(issue_catalog());
    add(&mut session, "Status");
    let before = emitted.borrow().len();

    session.dispatch(Action::FocusFilterInput("status".into()));
    session.dispatch(Action::ChangeFilterInput {
        key: "status".into(),
        text: "open".into(),
    });
    assert_eq!(labels(&session), vec!["Open", "Reopened"]);
    assert_eq!(emitted.borrow().len(), before);
}

#[test]
fn test_value_pick_replaces_previous_value() {
    let (mut session, _) = mounted(issue_catalog());
    add(&mut session, "Status");

    session.dispatch(Action::FocusFilterInput("status".into()));
    session.dispatch(Action::ClickOption(0));
    // The picked label stays in the input and narrows the next list.
    session.dispatch(Action::FocusFilterInput("status".into()));
    assert_eq!(labels(&session), vec!["Open", "Reopened"]);
    session.dispatch(Action::ClickOption(1));

    assert_eq!(session.values().to_json(), json!({ "status": "Reopened" }));
}

#[test]
fn test_focus_reuses_buffered_text() {
    let (mut session, _) = mounted(issue_catalog());
    add(&mut session, "Status");
    session.dispatch(Action::ChangeFilterInput {
        key: "status".into(),
        text: "clo".into(),
    });
    session.dispatch(Action::ClickOutside);

    session.dispatch(Action::FocusFilterInput("status".into()));
    assert_eq!(labels(&session), vec!["Closed"]);
}

#[test]
fn test_text_focus_closes_list() {
    let (mut session, _) = mounted(issue_catalog());
    add(&mut session, "Name");
    session.dispatch(Action::FocusMainSearch);
    assert!(session.suggestions().is_open());

    session.dispatch(Action::FocusFilterInput("name".into()));
    assert!(!session.suggestions().is_open());
    assert_eq!(session.focus_context(), None);
}

#[test]
fn test_main_query_only_cleared_by_filter_pick() {
    let (mut session, _) = mounted(issue_catalog());
    session.dispatch(Action::ChangeMainSearch("zzz".into()));
    session.dispatch(Action::ClickOutside);
    assert_eq!(session.main_query(), "zzz");
}

#[test]
fn test_keyed_dropdown_option_becomes_active_filter() {
    let catalog = Catalog::new([FilterDefinition::dropdown(
        "status",
        "Status",
        [
            FilterOption::value("Open"),
            FilterOption::keyed("stale", "Stale", FilterKind::Boolean),
        ],
    )])
    .unwrap();
    let (mut session, _) = mounted(catalog);
    add(&mut session, "Status");

    session.dispatch(Action::FocusFilterInput("status".into()));
    session.dispatch(Action::ClickOption(1));

    assert_eq!(session.active().keys().collect::<Vec<_>>(), vec!["status", "stale"]);
    assert_eq!(session.values().to_json(), json!({ "stale": true }));
    assert_values_within_active(&session);
}

// ============================================================================
// Unknown kinds
// ============================================================================

#[test]
fn test_unknown_kind_has_no_input_but_can_be_removed() {
    let (mut session, emitted) = mounted(issue_catalog());
    add(&mut session, "When");

    assert!(session.active().contains("when"));
    assert!(session.pending().is_empty());
    assert_eq!(
        session.dispatch(Action::FocusFilterInput("when".into())),
        EventResult::Ignored
    );
    assert_eq!(
        session.dispatch(Action::CommitFilterInput("when".into())),
        EventResult::Ignored
    );

    session.dispatch(Action::ClickRemove("when".into()));
    assert!(session.active().is_empty());
    assert_eq!(emitted.borrow().len(), 2);
}

// ============================================================================
// Deferred focus
// ============================================================================

#[test]
fn test_deferred_focus_after_removal_is_noop() {
    let (mut session, _) = mounted(issue_catalog());
    add(&mut session, "Status");
    session.dispatch(Action::ClickRemove("status".into()));

    let mut surface = FakeSurface::default();
    surface.render(&session);
    assert_eq!(session.settle(&mut surface), 0);
    assert_eq!(surface.focused, None);
}

#[test]
fn test_deferred_focus_without_rendered_input_is_noop() {
    let (mut session, _) = mounted(issue_catalog());
    add(&mut session, "Status");

    let mut surface = FakeSurface::default();
    assert_eq!(session.settle(&mut surface), 0);
    assert!(!session.suggestions().is_open());
    assert!(session.pending().is_empty());
}

#[test]
fn test_deferred_focus_opens_dropdown_options() {
    let (mut session, _) = mounted(issue_catalog());
    add(&mut session, "Status");

    let mut surface = FakeSurface::default();
    surface.render(&session);
    session.settle(&mut surface);

    assert_eq!(
        session.suggestions().source(),
        Some(&SuggestionSource::Filter("status".into()))
    );
    assert_eq!(labels(&session), vec!["Open", "Closed", "Reopened"]);
}

// ============================================================================
// Consistency and removal
// ============================================================================

#[test]
fn test_values_always_within_active_set() {
    let (mut session, _) = mounted(issue_catalog());
    let steps = vec![
        Action::FocusMainSearch,
        Action::KeyDown(Key::Enter),
        Action::FocusFilterInput("status".into()),
        Action::KeyDown(Key::Up),
        Action::KeyDown(Key::Enter),
        Action::ChangeMainSearch("assigned".into()),
        Action::KeyDown(Key::Enter),
        Action::ChangeMainSearch("name".into()),
        Action::ClickOption(0),
        Action::ChangeFilterInput {
            key: "name".into(),
            text: "Bo".into(),
        },
        Action::CommitFilterInput("name".into()),
        Action::ClickRemove("mine".into()),
        Action::ClickRemove("status".into()),
        Action::CommitFilterInput("status".into()),
    ];

    for step in steps {
        session.dispatch(step);
        assert_values_within_active(&session);
    }
    assert_eq!(session.values().to_json(), json!({ "name": "Bo" }));
}

#[test]
fn test_removing_owner_closes_its_list() {
    let (mut session, _) = mounted(issue_catalog());
    add(&mut session, "Status");
    session.dispatch(Action::FocusFilterInput("status".into()));
    assert!(session.suggestions().is_open());

    session.dispatch(Action::ClickRemove("status".into()));
    assert!(!session.suggestions().is_open());
    assert_eq!(session.focus_context(), None);
}

#[test]
fn test_remove_inactive_is_ignored() {
    let (mut session, emitted) = mounted(issue_catalog());
    assert_eq!(
        session.dispatch(Action::ClickRemove("status".into())),
        EventResult::Ignored
    );
    assert_eq!(emitted.borrow().len(), 1);
}

#[test]
fn test_removed_filter_returns_to_global_suggestions() {
    let (mut session, _) = mounted(issue_catalog());
    add(&mut session, "Status");
    session.dispatch(Action::ChangeMainSearch("stat".into()));
    assert!(labels(&session).is_empty());

    session.dispatch(Action::ClickRemove("status".into()));
    session.dispatch(Action::ChangeMainSearch("stat".into()));
    assert_eq!(labels(&session), vec!["Status"]);
}
