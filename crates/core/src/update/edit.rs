use std::ops::Range;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Edit range {start}..{end} is outside of a document of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Edit range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
}

/// A replacement of a byte range of a document with new text.
///
/// The range is expressed in the coordinates of the document the edit was
/// computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub new_text: String,
}

impl TextEdit {
    /// Replace the whole of `original` with `new_text`.
    ///
    /// The range spans the original content, not the replacement.
    pub fn full_replace(original: &str, new_text: impl Into<String>) -> Self {
        Self {
            range: 0..original.len(),
            new_text: new_text.into(),
        }
    }

    /// Apply the edit to `document` in place.
    ///
    /// Nothing is modified when the range is invalid for `document`.
    pub fn apply(&self, document: &mut String) -> Result<(), EditError> {
        let Range { start, end } = self.range;

        if start > end || end > document.len() {
            return Err(EditError::OutOfBounds {
                start,
                end,
                len: document.len(),
            });
        }

        if !document.is_char_boundary(start) || !document.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary { start, end });
        }

        document.replace_range(start..end, &self.new_text);
        Ok(())
    }
}
