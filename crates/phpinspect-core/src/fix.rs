//! Deferred quick fixes
//!
//! A diagnostic is recorded against one tree snapshot, but the user applies
//! the fix later, possibly after the file has been edited. A `FixDescriptor`
//! therefore carries a span anchor plus the text it expects to find there,
//! and re-resolves the anchor against the live source before rewriting:
//! if the anchored range moved, the original text is re-located by unique
//! substring search; if it already reads as the replacement, applying is a
//! no-op. A fix that cannot find its target fails without side effects.

use mago_span::{Position, Span};
use thiserror::Error;

use crate::edit::{apply_edits, Edit, EditError};

/// Errors from resolving or applying a fix against the live source
#[derive(Error, Debug)]
pub enum FixError {
    #[error("fix target no longer exists in the current source")]
    AnchorVanished,

    #[error("fix target occurs {0} times in the current source; refusing to guess")]
    AnchorAmbiguous(usize),

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// A deferred structural rewrite attached to a diagnostic
#[derive(Debug, Clone)]
pub struct FixDescriptor {
    title: String,
    anchor: Span,
    original: String,
    replacement: String,
}

impl FixDescriptor {
    /// Describe a fix replacing the `anchor` range of `source`.
    ///
    /// The anchored text is snapshotted now; resolution later checks it
    /// against whatever the file contains at apply time.
    pub fn new(
        title: impl Into<String>,
        anchor: Span,
        source: &str,
        replacement: impl Into<String>,
    ) -> Self {
        let start = anchor.start.offset as usize;
        let end = anchor.end.offset as usize;
        let original = source.get(start..end).unwrap_or_default().to_string();
        Self {
            title: title.into(),
            anchor,
            original,
            replacement: replacement.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn anchor(&self) -> Span {
        self.anchor
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Re-locate the anchor in the live source.
    ///
    /// `Ok(Some(edit))` is the rewrite to perform; `Ok(None)` means the fix
    /// has already been applied and nothing needs to change.
    pub fn resolve(&self, source: &str) -> Result<Option<Edit>, FixError> {
        let start = self.anchor.start.offset as usize;
        let end = self.anchor.end.offset as usize;

        if let Some(slice) = source.get(start..end) {
            if slice == self.original {
                return Ok(Some(self.edit_at(self.anchor)));
            }
        }
        // Applied fixes change the anchored length, so compare by prefix.
        if source
            .get(start..)
            .is_some_and(|tail| tail.starts_with(&self.replacement))
        {
            return Ok(None);
        }

        // The source changed since diagnosis; re-anchor by the recorded text.
        let sites: Vec<usize> = source
            .match_indices(&self.original)
            .map(|(at, _)| at)
            .collect();
        match sites.as_slice() {
            [at] => {
                let span = Span::new(
                    self.anchor.file_id,
                    Position::new(*at as u32),
                    Position::new((*at + self.original.len()) as u32),
                );
                Ok(Some(self.edit_at(span)))
            }
            [] => {
                if source.contains(&self.replacement) {
                    Ok(None)
                } else {
                    Err(FixError::AnchorVanished)
                }
            }
            many => Err(FixError::AnchorAmbiguous(many.len())),
        }
    }

    /// Resolve and apply in one step, returning the rewritten source.
    pub fn apply(&self, source: &str) -> Result<String, FixError> {
        match self.resolve(source)? {
            Some(edit) => Ok(apply_edits(source, &[edit])?),
            None => Ok(source.to_string()),
        }
    }

    fn edit_at(&self, span: Span) -> Edit {
        Edit::new(span, self.replacement.clone(), self.title.clone())
    }
}
