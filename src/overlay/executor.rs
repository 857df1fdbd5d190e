use std::time::Duration;

use tracing::{info, warn};

use crate::action::action_model::{ActionDescriptor, TypeHint};
use crate::host::{Interaction, Timer};
use crate::overlay::error::OverlayError;
use crate::resolve::engine::ResolvedTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    FocusSelect,
    Activate,
}

pub fn intent_for(target: &ResolvedTarget, action: &ActionDescriptor) -> Intent {
    if action.type_hint == TypeHint::Input || target.tag_category.is_text_entry() {
        Intent::FocusSelect
    } else {
        Intent::Activate
    }
}

/// Result of an interaction whose acknowledgment timer is armed.
#[derive(Debug)]
pub struct Execution {
    pub intent: Intent,
    pub outcome: Result<(), OverlayError>,
}

/// Mark the target, arm the acknowledgment timer, bring the target into view
/// and perform the interaction.
///
/// `Err` means the timer could not be armed; the marker is already cleared.
/// Otherwise [`finish_acknowledgment`] clears it when the timer fires, whatever
/// the interaction's own outcome.
pub fn execute<H: Interaction + Timer>(
    host: &mut H,
    target: &ResolvedTarget,
    action: &ActionDescriptor,
    ack_delay: Duration,
    token: u64,
) -> Result<Execution, OverlayError> {
    let intent = intent_for(target, action);
    host.mark(target.candidate)?;

    if let Err(e) = host.schedule(ack_delay, token) {
        warn!(error = %e, "could not arm acknowledgment timer, clearing marker now");
        host.unmark(target.candidate)?;
        return Err(e);
    }

    let outcome = host.scroll_into_view(target.candidate).and_then(|_| match intent {
        Intent::FocusSelect => host.focus_and_select(target.candidate),
        Intent::Activate => host.activate(target.candidate),
    });

    info!(candidate = target.candidate.0, ?intent, ok = outcome.is_ok(), "interaction performed");
    Ok(Execution { intent, outcome })
}

pub fn finish_acknowledgment<H: Interaction>(
    host: &mut H,
    target: &ResolvedTarget,
) -> Result<(), OverlayError> {
    host.unmark(target.candidate)
}
