use crate::error::JsoncError;
use crate::formatter::{format, FormatOptions};
use crate::model::TextEdit;

/// Applies a list of edits to `text`, producing the rewritten document.
///
/// The edits must be sorted by offset, in-bounds, and non-overlapping —
/// exactly the shape produced by [`format`]. Violations return an error
/// rather than a silently misapplied document.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, JsoncError> {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for edit in edits {
        if edit.offset < cursor {
            return Err(JsoncError::simple(format!(
                "edit at offset {} overlaps the previous edit",
                edit.offset
            )));
        }
        let end = edit.offset + edit.length;
        if end > text.len() {
            return Err(JsoncError::simple(format!(
                "edit {}..{} is out of bounds for a {}-byte document",
                edit.offset,
                end,
                text.len()
            )));
        }
        output.push_str(&text[cursor..edit.offset]);
        output.push_str(&edit.content);
        cursor = end;
    }
    output.push_str(&text[cursor..]);
    Ok(output)
}

/// Formats a whole document in one step: computes the minimal edits and
/// applies them.
pub fn format_text(text: &str, options: &FormatOptions) -> Result<String, JsoncError> {
    let edits = format(text, None, options);
    apply_edits(text, &edits)
}
