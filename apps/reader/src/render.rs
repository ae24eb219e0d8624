//! Plain-text rendering of annotated segments.

use lexicon_core::{AnnotatedSegment, DisplayStatus};

/// Render a text with status markers: `[new]`, `{seen}`, known and
/// unmatched words unmarked.
pub fn render_annotated(segments: &[AnnotatedSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        let text = segment.segment.text.as_str();
        match segment.display_status {
            DisplayStatus::New => {
                out.push('[');
                out.push_str(text);
                out.push(']');
            }
            DisplayStatus::Seen => {
                out.push('{');
                out.push_str(text);
                out.push('}');
            }
            DisplayStatus::Known | DisplayStatus::Unmatched => out.push_str(text),
        }
    }
    out
}
