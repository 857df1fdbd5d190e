use tap_assist::{
    host::snapshot::SnapshotSurface,
    surface::{
        normalize::{class_tokens, normalize_signal_text, surface_fingerprint},
        scanner::{ScannerConfig, extract_signals, scan, scan_elements},
        surface_model::{CandidateRef, RawElement, TagCategory},
    },
};

use crate::common::surfaces::{button, link, node, rect, search_input, wiki_surface};

mod common;

fn config() -> ScannerConfig {
    ScannerConfig::default()
}

// =========================================================================
// Node selection
// =========================================================================

#[test]
fn semantic_and_generic_nodes_are_candidates() {
    let elements = vec![
        link("Home"),
        button("Go"),
        search_input(),
        node("textarea"),
        node("div"),
        node("span"),
    ];
    let candidates = scan_elements(&elements, &config());
    assert_eq!(candidates.len(), 6);
}

#[test]
fn structural_tags_are_not_candidates() {
    let elements = vec![node("script"), node("html"), node("body"), node("section")];
    assert!(scan_elements(&elements, &config()).is_empty());
}

#[test]
fn interactive_role_or_zero_tab_stop_admits_any_tag() {
    let by_role = RawElement {
        role: Some("Button".into()),
        ..node("section")
    };
    let by_tab = RawElement {
        tab_index: Some(0),
        ..node("section")
    };
    let negative_tab = RawElement {
        tab_index: Some(-1),
        ..node("section")
    };

    let candidates = scan_elements(&[by_role, by_tab, negative_tab], &config());
    let refs: Vec<_> = candidates.iter().map(|c| c.candidate).collect();
    assert_eq!(refs, vec![CandidateRef(0), CandidateRef(1)]);
}

#[test]
fn candidate_refs_follow_walk_order() {
    let elements = vec![node("script"), button("One"), node("body"), button("Two")];
    let refs: Vec<_> = scan_elements(&elements, &config())
        .into_iter()
        .map(|c| c.candidate)
        .collect();
    assert_eq!(refs, vec![CandidateRef(1), CandidateRef(3)]);
}

// =========================================================================
// Visibility
// =========================================================================

#[test]
fn boxes_under_ten_pixels_are_excluded() {
    let elements = vec![
        RawElement { rect: rect(9.9, 40.0), ..button("narrow") },
        RawElement { rect: rect(40.0, 9.0), ..button("flat") },
        RawElement { rect: rect(10.0, 10.0), ..button("exact") },
        RawElement { rect: None, ..button("no box") },
    ];
    let candidates = scan_elements(&elements, &config());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].signals.visible_text, "exact");
}

#[test]
fn detached_nodes_are_excluded() {
    let detached = RawElement {
        connected: false,
        ..button("Gone")
    };
    assert!(scan_elements(&[detached], &config()).is_empty());
}

#[test]
fn minimum_box_size_is_configurable() {
    let small = RawElement {
        rect: rect(6.0, 6.0),
        ..button("x")
    };
    let lenient = ScannerConfig { min_box_size: 5.0 };
    assert_eq!(scan_elements(&[small], &lenient).len(), 1);
}

// =========================================================================
// Signal extraction
// =========================================================================

#[test]
fn signals_are_lowercased_trimmed_and_never_missing() {
    let el = RawElement {
        text: Some("  Sign In  ".into()),
        id: Some("NAV-Login".into()),
        class_name: Some("Btn  Primary".into()),
        aria_label: Some(" Account ".into()),
        cursor: Some("pointer".into()),
        ..node("a")
    };
    let s = extract_signals(&el, &config());

    assert_eq!(s.visible_text, "sign in");
    assert_eq!(s.identifier, "nav-login");
    assert_eq!(s.accessible_label, "account");
    assert!(s.class_tokens.contains("btn") && s.class_tokens.contains("primary"));
    assert_eq!(s.placeholder, "");
    assert_eq!(s.role, "");
    assert_eq!(s.type_attribute, "");
    assert_eq!(s.tag_category, TagCategory::Link);
    assert!(s.has_pointer_affordance);
}

#[test]
fn submit_input_reports_value_as_visible_text() {
    let el = RawElement {
        r#type: Some("submit".into()),
        value: Some("Search".into()),
        ..node("input")
    };
    let s = extract_signals(&el, &config());
    assert_eq!(s.visible_text, "search");
    assert_eq!(s.value, "search");

    let text_box = RawElement {
        r#type: Some("text".into()),
        value: Some("typed by user".into()),
        ..node("input")
    };
    assert_eq!(extract_signals(&text_box, &config()).visible_text, "");
}

#[test]
fn tag_categories() {
    assert_eq!(TagCategory::from_tag("select"), TagCategory::Input);
    assert_eq!(TagCategory::from_tag("textarea"), TagCategory::Textarea);
    assert_eq!(TagCategory::from_tag("li"), TagCategory::GenericBox);
    assert!(TagCategory::Textarea.is_text_entry());
    assert!(!TagCategory::Button.is_text_entry());
}

#[test]
fn normalize_helpers() {
    assert_eq!(normalize_signal_text(None), "");
    assert_eq!(normalize_signal_text(Some("  MiXeD ")), "mixed");
    assert!(class_tokens(None).is_empty());
    assert_eq!(class_tokens(Some(" a  B a ")).len(), 2);
}

// =========================================================================
// Host walk + fingerprint
// =========================================================================

#[test]
fn scan_walks_the_host_surface() {
    let mut surface = SnapshotSurface::new(wiki_surface());
    let candidates = scan(&mut surface, &config()).unwrap();
    assert_eq!(candidates.len(), 4);
}

#[test]
fn fingerprint_tracks_surface_changes() {
    let before = scan_elements(&wiki_surface(), &config());
    let same = scan_elements(&wiki_surface(), &config());
    assert_eq!(surface_fingerprint(&before), surface_fingerprint(&same));

    let mut mutated = wiki_surface();
    mutated[3].text = Some("Log out".into());
    let after = scan_elements(&mutated, &config());
    assert_ne!(surface_fingerprint(&before), surface_fingerprint(&after));
}

#[test]
fn snapshot_accepts_array_or_elements_object() {
    let array = serde_json::json!([{ "tag": "button", "text": "Go", "rect": { "width": 40, "height": 20 } }]);
    let object = serde_json::json!({ "elements": [{ "tag": "a" }] });

    assert_eq!(SnapshotSurface::from_json(&array).unwrap().elements.len(), 1);
    let from_object = SnapshotSurface::from_json(&object).unwrap();
    assert!(from_object.elements[0].connected, "connected defaults to true");
    assert!(SnapshotSurface::from_json(&serde_json::json!({ "dom": [] })).is_err());
}
