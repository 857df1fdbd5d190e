use tap_assist::action::{
    action_model::ActionDescriptor,
    voice::{match_transcript, match_transcript_index},
};

fn actions(labels: &[&str]) -> Vec<ActionDescriptor> {
    labels.iter().map(|l| ActionDescriptor::new(l, &[])).collect()
}

#[test]
fn first_listed_label_wins_not_the_best() {
    let transcript = "please open the search box now";

    let search_first = actions(&["search", "open"]);
    assert_eq!(
        match_transcript(transcript, &search_first).map(|a| a.label.as_str()),
        Some("search")
    );

    let open_first = actions(&["open", "search"]);
    assert_eq!(
        match_transcript(transcript, &open_first).map(|a| a.label.as_str()),
        Some("open")
    );
}

#[test]
fn shorter_prefix_label_shadows_longer_one_when_listed_first() {
    let list = actions(&["Log", "Login"]);
    assert_eq!(match_transcript_index("login please", &list), Some(0));
}

#[test]
fn transcript_and_labels_are_case_insensitive() {
    let list = actions(&["Add to Cart"]);
    assert_eq!(match_transcript_index("  ADD TO CART ", &list), Some(0));
}

#[test]
fn label_must_appear_inside_transcript() {
    // The transcript being inside the label is not a match
    let list = actions(&["search wikipedia"]);
    assert_eq!(match_transcript_index("search", &list), None);
}

#[test]
fn no_match_and_empty_inputs() {
    let list = actions(&["Search", "Login"]);
    assert!(match_transcript("play some music", &list).is_none());
    assert!(match_transcript("search", &[]).is_none());
    assert!(match_transcript("", &list).is_none());
}

#[test]
fn blank_labels_never_match() {
    let list = actions(&["   ", "Search"]);
    assert_eq!(match_transcript_index("search please", &list), Some(1));
}
