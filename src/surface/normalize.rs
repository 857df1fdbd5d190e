use std::collections::BTreeSet;

use crate::surface::surface_model::Candidate;

/// Lower-case and trim; `None` becomes the empty string.
pub fn normalize_signal_text(raw: Option<&str>) -> String {
    raw.map(|s| s.trim().to_lowercase()).unwrap_or_default()
}

pub fn class_tokens(raw: Option<&str>) -> BTreeSet<String> {
    raw.unwrap_or("")
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}

/// SHA-1 over the normalized signals of a scan, in scan order.
///
/// Lets a trace reader tell whether two resolution passes saw the same surface.
pub fn surface_fingerprint(candidates: &[Candidate]) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    for c in candidates {
        let s = &c.signals;
        hasher.update(c.candidate.0.to_le_bytes());
        for field in [
            &s.visible_text,
            &s.identifier,
            &s.accessible_label,
            &s.placeholder,
            &s.role,
            &s.type_attribute,
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
        for token in &s.class_tokens {
            hasher.update(token.as_bytes());
            hasher.update([1u8]);
        }
    }
    format!("{:x}", hasher.finalize())
}
