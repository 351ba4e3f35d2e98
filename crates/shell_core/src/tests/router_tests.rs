use super::*;

use crate::{
    events::EventHub,
    overlay::RenderTarget,
    test_support::{id, set, Call, FakeWorkspace},
};

struct Harness {
    router: Router,
    workspace: Arc<FakeWorkspace>,
    hub: EventHub,
}

impl Harness {
    fn new(toolchain: Option<&str>, widgets: &[&str]) -> Self {
        Self::with_options(toolchain, widgets, RouterOptions::default())
    }

    fn with_options(toolchain: Option<&str>, widgets: &[&str], options: RouterOptions) -> Self {
        let workspace = FakeWorkspace::with_state(toolchain, widgets);
        let hub = EventHub::new();
        let router = Router::new(
            options,
            workspace.clone(),
            workspace.clone(),
            workspace.clone(),
            hub.sender(),
        );
        Self {
            router,
            workspace,
            hub,
        }
    }

    /// Router past its first observation, as it is once the page is up.
    fn ready(toolchain: Option<&str>, widgets: &[&str]) -> Self {
        let mut harness = Self::new(toolchain, widgets);
        let fragment = RouteState::new(toolchain.map(id), widgets.iter().copied()).to_fragment();
        harness.workspace.set_location(&fragment);
        harness.router.handle_fragment(&fragment);
        harness
            .router
            .apply_initial_route()
            .expect("apply initial route");
        harness.workspace.set_state(toolchain, widgets);
        harness.workspace.clear_calls();
        harness.drain();
        harness
    }

    fn drain(&self) -> Vec<ShellEvent> {
        std::iter::from_fn(|| self.hub.try_next()).collect()
    }
}

#[test]
fn first_route_is_captured_without_side_effects() {
    let mut harness = Harness::new(None, &[]);

    let transition = harness.router.handle_fragment("toolchain/42/widgets=a");

    assert_eq!(transition, RouteTransition::CapturedInitial);
    assert_eq!(
        harness.router.initial_route(),
        Some(&RouteState::new(Some(id("42")), ["a"]))
    );
    assert!(harness.workspace.calls().is_empty());
    assert!(harness.drain().is_empty());
}

#[test]
fn later_routes_before_ready_replace_the_captured_one() {
    let mut harness = Harness::new(None, &[]);
    harness.router.handle_fragment("toolchain/1");
    harness.router.handle_fragment("toolchain/2");

    assert_eq!(
        harness.router.initial_route(),
        Some(&RouteState::new(Some(id("2")), Vec::<String>::new()))
    );
}

#[test]
fn empty_fragment_is_no_toolchain_and_no_widgets() {
    let mut harness = Harness::new(None, &[]);
    harness.router.handle_fragment("");

    assert_eq!(harness.router.initial_route(), Some(&RouteState::empty()));

    let route = harness.router.apply_initial_route().expect("apply");
    assert_eq!(route, RouteState::empty());
    assert_eq!(harness.workspace.calls(), vec![Call::SwitchTo(None)]);
    // No toolchain in the URL: the starting screen stays.
    assert!(harness.drain().is_empty());
}

#[test]
fn malformed_fragment_is_replaced_silently_and_treated_as_empty() {
    let mut harness = Harness::ready(Some("7"), &["a"]);
    harness.workspace.set_location("garbage///");

    let transition = harness.router.handle_fragment("garbage///");

    assert_eq!(transition, RouteTransition::SwitchToolchainAndWidgets);
    assert_eq!(
        harness.workspace.calls(),
        vec![
            Call::SetFragment {
                fragment: String::new(),
                replace: true,
            },
            Call::SwitchTo(None),
            Call::SetWidgets(set(&[])),
        ]
    );
    // Replacing the URL must not raise another navigation.
    assert!(harness.drain().is_empty());
}

#[test]
fn new_toolchain_with_different_widgets_forces_url_widgets() {
    let mut harness = Harness::ready(Some("7"), &["a", "b"]);
    harness.workspace.remember_layout("42", &["saved"]);

    let transition = harness.router.handle_fragment("toolchain/42");

    assert_eq!(transition, RouteTransition::SwitchToolchainAndWidgets);
    assert_eq!(
        harness.workspace.calls(),
        vec![Call::SwitchTo(Some(id("42"))), Call::SetWidgets(set(&[]))]
    );
    assert_eq!(harness.workspace.current_widget_names(), set(&[]));
}

#[test]
fn new_toolchain_with_same_widgets_keeps_the_toolchain_layout() {
    let mut harness = Harness::ready(Some("7"), &["a"]);
    harness.workspace.remember_layout("42", &["restored"]);

    let transition = harness.router.handle_fragment("toolchain/42/widgets=a");

    assert_eq!(transition, RouteTransition::SwitchToolchain);
    assert_eq!(
        harness.workspace.calls(),
        vec![Call::SwitchTo(Some(id("42")))]
    );
    assert_eq!(harness.workspace.current_widget_names(), set(&["restored"]));
}

#[test]
fn same_toolchain_with_new_widgets_sets_widgets_only() {
    let mut harness = Harness::ready(Some("42"), &["a"]);

    let transition = harness
        .router
        .handle_fragment("toolchain/42/widgets=a&widgets=c");

    assert_eq!(transition, RouteTransition::SetWidgets);
    assert_eq!(
        harness.workspace.calls(),
        vec![Call::SetWidgets(set(&["a", "c"]))]
    );
}

#[test]
fn unchanged_state_is_a_no_op() {
    let mut harness = Harness::ready(Some("42"), &["a", "b"]);

    let transition = harness
        .router
        .handle_fragment("toolchain/42/widgets=b&widgets=a");

    assert_eq!(transition, RouteTransition::Unchanged);
    assert!(harness.workspace.calls().is_empty());
}

#[test]
fn handling_the_same_route_twice_applies_it_once() {
    let mut harness = Harness::ready(Some("7"), &[]);
    let route = RouteState::new(Some(id("42")), ["x"]);

    assert_eq!(
        harness.router.handle_route(route.clone()),
        RouteTransition::SwitchToolchainAndWidgets
    );
    assert_eq!(harness.router.handle_route(route), RouteTransition::Unchanged);
    assert_eq!(harness.workspace.calls().len(), 2);
}

#[test]
fn initial_toolchain_switches_and_requests_hide() {
    let mut harness = Harness::new(None, &[]);
    harness.workspace.remember_layout("42", &["saved"]);
    harness.router.handle_fragment("toolchain/42/widgets=a");

    let route = harness.router.apply_initial_route().expect("apply");

    assert_eq!(route.toolchain_id, Some(id("42")));
    assert_eq!(
        harness.workspace.calls(),
        vec![Call::SwitchTo(Some(id("42")))]
    );
    // Widgets come from the toolchain's saved layout, not the URL.
    assert_eq!(harness.workspace.current_widget_names(), set(&["saved"]));

    let events = harness.drain();
    assert_eq!(events.len(), 1);
    match &events[0] {
        ShellEvent::OverlayRequested(request) => assert_eq!(request.target, RenderTarget::Hide),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn initial_widgets_are_restored_when_enabled() {
    let options = RouterOptions {
        restore_initial_widgets: true,
        ..RouterOptions::default()
    };
    let mut harness = Harness::with_options(None, &[], options);
    harness.router.handle_fragment("toolchain/42/widgets=a&widgets=b");

    harness.router.apply_initial_route().expect("apply");

    assert_eq!(
        harness.workspace.calls(),
        vec![
            Call::SwitchTo(Some(id("42"))),
            Call::SetWidgets(set(&["a", "b"]))
        ]
    );
}

#[test]
fn initial_route_is_consumed_exactly_once() {
    let mut harness = Harness::new(None, &[]);
    assert_eq!(
        harness.router.apply_initial_route(),
        Err(RouterError::InitialRouteMissing)
    );

    harness.router.handle_fragment("");
    assert!(harness.router.apply_initial_route().is_ok());
    assert!(harness.router.is_ready());
    assert_eq!(harness.router.initial_route(), None);
    assert_eq!(
        harness.router.apply_initial_route(),
        Err(RouterError::InitialRouteAlreadyApplied)
    );
}

#[test]
fn update_url_is_skipped_before_ready_or_without_toolchain() {
    let mut harness = Harness::new(Some("42"), &["a"]);
    assert_eq!(harness.router.update_url(), None);

    let mut harness = Harness::ready(None, &[]);
    assert_eq!(harness.router.update_url(), None);
    assert!(harness.workspace.calls().is_empty());
}

#[test]
fn update_url_encodes_current_state_and_triggers_navigation() {
    let mut harness = Harness::ready(Some("42"), &[]);
    harness.workspace.set_state(Some("42"), &["b", "a"]);

    let fragment = harness.router.update_url();

    assert_eq!(
        fragment.as_deref(),
        Some("toolchain/42/widgets=a&widgets=b")
    );
    assert_eq!(
        harness.workspace.calls(),
        vec![Call::SetFragment {
            fragment: "toolchain/42/widgets=a&widgets=b".into(),
            replace: false,
        }]
    );
    let events = harness.drain();
    assert_eq!(events.len(), 1);
    let ShellEvent::HashChanged(fragment) = &events[0] else {
        panic!("unexpected event {:?}", events[0]);
    };

    // Feeding the URL back in changes nothing.
    harness.workspace.clear_calls();
    assert_eq!(
        harness.router.handle_fragment(fragment),
        RouteTransition::Unchanged
    );
    assert!(harness.workspace.calls().is_empty());
}

#[test]
fn navigating_to_the_current_fragment_does_nothing() {
    let harness = Harness::ready(Some("42"), &[]);
    harness.workspace.set_location("toolchain/42");

    let navigated = harness.router.navigate(
        "#toolchain/42",
        NavigateOptions {
            replace: false,
            trigger: true,
        },
    );

    assert!(!navigated);
    assert!(harness.workspace.calls().is_empty());
    assert!(harness.drain().is_empty());
}

#[test]
fn toolchain_link_points_at_the_data_manager_folder() {
    let harness = Harness::new(None, &[]);
    assert_eq!(
        harness.router.toolchain_link(&FolderId::new("abc123")),
        "girder#folder/abc123"
    );
}

#[test]
fn blank_path_fragment_is_reset_like_a_malformed_one() {
    let mut harness = Harness::ready(Some("7"), &[]);
    harness.workspace.set_location("///");

    let transition = harness.router.handle_fragment("///");

    assert_eq!(transition, RouteTransition::SwitchToolchain);
    assert_eq!(
        harness.workspace.calls(),
        vec![
            Call::SetFragment {
                fragment: String::new(),
                replace: true,
            },
            Call::SwitchTo(None),
        ]
    );
    assert_eq!(harness.workspace.fragment(), "");
    assert!(harness.drain().is_empty());
}

#[test]
fn literal_empty_fragment_is_left_alone() {
    let mut harness = Harness::ready(Some("7"), &[]);
    harness.workspace.set_location("#");

    harness.router.handle_fragment("#");

    assert_eq!(harness.workspace.calls(), vec![Call::SwitchTo(None)]);
}

#[test]
fn url_feedback_is_a_no_op_for_ids_needing_escapes() {
    let mut harness = Harness::ready(Some("a b/c?d#e%"), &[]);
    harness
        .workspace
        .set_state(Some("a b/c?d#e%"), &["x y", "ü/&"]);

    let fragment = harness.router.update_url().expect("fragment");
    harness.workspace.clear_calls();

    assert_eq!(
        harness.router.handle_fragment(&fragment),
        RouteTransition::Unchanged
    );
    assert!(harness.workspace.calls().is_empty());
    assert_eq!(harness.workspace.current_id(), Some(id("a b/c?d#e%")));
}

mod properties {
    use super::*;

    use proptest::prelude::*;

    fn names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set(any::<String>(), 0..4)
            .prop_map(|names| names.into_iter().collect())
    }

    fn toolchain() -> impl Strategy<Value = String> {
        any::<String>().prop_filter("toolchain ids are non-empty", |raw| !raw.is_empty())
    }

    /// States a URL can describe: no toolchain means no widgets.
    fn reachable() -> impl Strategy<Value = (Option<String>, Vec<String>)> {
        prop_oneof![
            Just((None::<String>, Vec::<String>::new())),
            (toolchain(), names()).prop_map(|(id, names)| (Some(id), names)),
        ]
    }

    fn refs(names: &[String]) -> Vec<&str> {
        names.iter().map(String::as_str).collect()
    }

    proptest! {
        #[test]
        fn handling_a_route_twice_changes_state_once(
            (start_id, start_widgets) in reachable(),
            (next_id, next_widgets) in reachable(),
        ) {
            let mut harness = Harness::ready(start_id.as_deref(), &refs(&start_widgets));
            // The toolchain's saved layout agrees with the URL, as it does
            // for fragments the router wrote itself.
            if let Some(next) = next_id.as_deref() {
                harness.workspace.remember_layout(next, &refs(&next_widgets));
            }
            let route = RouteState::new(next_id.as_deref().map(id), next_widgets.clone());

            harness.router.handle_route(route.clone());
            let calls = harness.workspace.calls();

            prop_assert_eq!(harness.router.handle_route(route), RouteTransition::Unchanged);
            prop_assert_eq!(harness.workspace.calls(), calls);
        }

        #[test]
        fn writing_the_url_and_reading_it_back_changes_nothing(
            chain in toolchain(),
            start_widgets in names(),
            widgets in names(),
        ) {
            let mut harness = Harness::ready(Some(chain.as_str()), &refs(&start_widgets));
            harness.workspace.set_state(Some(chain.as_str()), &refs(&widgets));

            let fragment = harness.router.update_url().expect("fragment");
            harness.workspace.clear_calls();

            prop_assert_eq!(harness.router.handle_fragment(&fragment), RouteTransition::Unchanged);
            prop_assert!(harness.workspace.calls().is_empty());
        }
    }
}
