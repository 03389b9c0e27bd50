//! The participant's local copy of the room document.

/// Local document mirror.
///
/// `revision` is the last server revision applied; local edits do not change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedDocument {
    content: String,
    revision: Option<u64>,
}

impl SharedDocument {
    pub fn new(content: String) -> Self {
        Self {
            content,
            revision: None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Apply a document received from the room.
    ///
    /// Updates older than the revision already held are dropped and `false` is
    /// returned. Equal revisions are applied: the last one delivered wins.
    pub fn apply_remote(&mut self, content: String, revision: u64) -> bool {
        if self.revision.is_some_and(|held| revision < held) {
            return false;
        }
        self.content = content;
        self.revision = Some(revision);
        true
    }

    pub fn append_line(&mut self, line: &str) {
        if !self.content.is_empty() {
            self.content.push('\n');
        }
        self.content.push_str(line);
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Forget the server revision, e.g. before joining again after a reconnect.
    pub fn detach(&mut self) {
        self.revision = None;
    }
}
