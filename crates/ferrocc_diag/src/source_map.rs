use codespan_reporting::files::{Files, SimpleFiles};

/// Owns every source buffer the compiler has been handed, keyed by the
/// filename it was registered under.
///
/// A single `SourceMap` is shared process-wide for the lifetime of one
/// compilation; callers coordinate access themselves (spec.md §5 notes this
/// is single-threaded in practice).
#[derive(Default)]
pub struct SourceMap {
    files: SimpleFiles<String, String>,
    by_name: rustc_hash::FxHashMap<String, usize>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            by_name: rustc_hash::FxHashMap::default(),
        }
    }

    /// Register (or replace) the source text for `filename`. Returns the
    /// file id used to build [`crate::Location`]s against this buffer.
    pub fn set_source(&mut self, filename: impl Into<String>, text: impl Into<String>) -> usize {
        let filename = filename.into();
        let id = self.files.add(filename.clone(), text.into());
        self.by_name.insert(filename, id);
        id
    }

    /// Drop the source text previously registered under `filename`, if any.
    ///
    /// `codespan_reporting::files::SimpleFiles` has no removal API, so this
    /// only forgets the name→id mapping; the file id is never reused, which
    /// matches the rest of the crate's "ids are stable once allocated"
    /// invariant.
    pub fn clear_source(&mut self, filename: &str) {
        self.by_name.remove(filename);
    }

    pub fn file_id(&self, filename: &str) -> Option<usize> {
        self.by_name.get(filename).copied()
    }

    pub fn source(&self, file_id: usize) -> Option<&str> {
        self.files.get(file_id).ok().map(|f| f.source().as_str())
    }

    pub(crate) fn inner(&self) -> &SimpleFiles<String, String> {
        &self.files
    }
}
