use tap_assist::{
    action::action_model::{ActionDescriptor, DrawPayload, TypeHint},
    surface::surface_model::{BoundingBox, RawElement},
};

pub fn rect(width: f64, height: f64) -> Option<BoundingBox> {
    Some(BoundingBox {
        x: 0.0,
        y: 0.0,
        width,
        height,
    })
}

/// A visible node of the given tag with nothing else set.
pub fn node(tag: &str) -> RawElement {
    RawElement {
        tag: tag.into(),
        rect: rect(120.0, 32.0),
        connected: true,
        ..Default::default()
    }
}

pub fn button(text: &str) -> RawElement {
    RawElement {
        text: Some(text.into()),
        ..node("button")
    }
}

pub fn link(text: &str) -> RawElement {
    RawElement {
        text: Some(text.into()),
        ..node("a")
    }
}

pub fn search_input() -> RawElement {
    RawElement {
        id: Some("search".into()),
        r#type: Some("search".into()),
        placeholder: Some("Search Wikipedia".into()),
        ..node("input")
    }
}

/// Header of a typical wiki page: logo, prose, search box, login link.
pub fn wiki_surface() -> Vec<RawElement> {
    vec![
        RawElement {
            text: Some("Wikipedia".into()),
            class_name: Some("mw-logo".into()),
            ..node("div")
        },
        RawElement {
            text: Some("Welcome to Wikipedia, the free encyclopedia that anyone can edit.".into()),
            ..node("p")
        },
        search_input(),
        RawElement {
            id: Some("pt-login".into()),
            cursor: Some("pointer".into()),
            ..link("Log in")
        },
    ]
}

pub fn search_action() -> ActionDescriptor {
    ActionDescriptor::new("Search", &["search", "find"]).with_type_hint(TypeHint::Input)
}

pub fn login_action() -> ActionDescriptor {
    ActionDescriptor::new("Login", &["log in", "pt-login"]).with_type_hint(TypeHint::Activatable)
}

pub fn wiki_payload() -> DrawPayload {
    DrawPayload {
        page_summary: "Wikipedia Homepage".into(),
        primary_actions: vec![search_action(), login_action()],
    }
}
