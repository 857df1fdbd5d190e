use crate::action::action_model::ActionDescriptor;

/// Return the first action whose lower-cased label occurs in the transcript.
///
/// List order decides, not match quality: with labels "log" and "login",
/// whichever comes first wins for "login please".
pub fn match_transcript<'a>(
    transcript: &str,
    actions: &'a [ActionDescriptor],
) -> Option<&'a ActionDescriptor> {
    match_transcript_index(transcript, actions).map(|i| &actions[i])
}

pub fn match_transcript_index(transcript: &str, actions: &[ActionDescriptor]) -> Option<usize> {
    let heard = transcript.trim().to_lowercase();

    actions.iter().position(|action| {
        let label = action.label.trim().to_lowercase();
        !label.is_empty() && heard.contains(&label)
    })
}
