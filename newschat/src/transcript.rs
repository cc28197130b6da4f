use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    User,
    Loading,
    Assistant,
}

/// Link from an assistant answer to a card in the article panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRef {
    pub article_id: String,
    pub title: String,
}

/// TranscriptEntry represents a single line in the chat history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: u64,
    pub kind: EntryKind,
    pub text: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title_refs: Vec<TitleRef>,
}

/// Ordered chat history. Append-only, except that Loading entries can be removed.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn has_loading(&self) -> bool {
        self.entries.iter().any(|e| e.kind == EntryKind::Loading)
    }

    /// Most recent assistant entry, if any.
    pub fn last_assistant(&self) -> Option<&TranscriptEntry> {
        self.entries.iter().rev().find(|e| e.kind == EntryKind::Assistant)
    }

    pub fn append_user(&mut self, text: &str, at: DateTime<Utc>) -> u64 {
        self.push(EntryKind::User, Some(text.to_string()), Vec::new(), at)
    }

    /// Appends the loading indicator. An older one still present is superseded,
    /// so the transcript never holds two.
    pub fn append_loading(&mut self, at: DateTime<Utc>) -> u64 {
        self.remove_loading();
        self.push(EntryKind::Loading, None, Vec::new(), at)
    }

    pub fn append_assistant(&mut self, text: &str, title_refs: Vec<TitleRef>, at: DateTime<Utc>) -> u64 {
        self.push(EntryKind::Assistant, Some(text.to_string()), title_refs, at)
    }

    /// Remove every Loading entry. No-op when there is none.
    pub fn remove_loading(&mut self) {
        self.entries.retain(|e| e.kind != EntryKind::Loading);
    }

    /// Append the answer and drop the loading indicator in one step.
    pub fn resolve_loading(&mut self, text: &str, title_refs: Vec<TitleRef>, at: DateTime<Utc>) -> u64 {
        self.remove_loading();
        self.append_assistant(text, title_refs, at)
    }

    fn push(&mut self, kind: EntryKind, text: Option<String>, title_refs: Vec<TitleRef>, at: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(TranscriptEntry {
            id,
            kind,
            text,
            created_at: at,
            title_refs,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(t: &Transcript, kind: EntryKind) -> usize {
        t.entries().iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn entries_keep_insertion_order_and_fresh_ids() {
        let now = Utc::now();
        let mut t = Transcript::new();
        let u = t.append_user("hello", now);
        let l = t.append_loading(now);
        t.remove_loading();
        let a = t.append_assistant("hi", Vec::new(), now);

        assert!(u < l && l < a);
        let ids: Vec<u64> = t.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![u, a]);
        // removed loading id is not handed out again
        let next = t.append_user("again", now);
        assert!(next > a);
    }

    #[test]
    fn loading_has_no_text() {
        let mut t = Transcript::new();
        let id = t.append_loading(Utc::now());
        assert!(t.get(id).expect("entry").text.is_none());
    }

    #[test]
    fn remove_loading_is_idempotent() {
        let now = Utc::now();
        let mut t = Transcript::new();
        t.append_user("q", now);
        t.append_loading(now);

        t.remove_loading();
        let once: Vec<u64> = t.entries().iter().map(|e| e.id).collect();
        t.remove_loading();
        let twice: Vec<u64> = t.entries().iter().map(|e| e.id).collect();

        assert_eq!(once, twice);
        assert_eq!(count(&t, EntryKind::Loading), 0);
        assert_eq!(count(&t, EntryKind::User), 1);
    }

    #[test]
    fn at_most_one_loading_entry() {
        let now = Utc::now();
        let mut t = Transcript::new();
        t.append_loading(now);
        t.append_user("second", now);
        t.append_loading(now);
        assert_eq!(count(&t, EntryKind::Loading), 1);
        assert_eq!(t.entries().last().map(|e| e.kind), Some(EntryKind::Loading));
    }

    #[test]
    fn resolve_loading_replaces_indicator() {
        let now = Utc::now();
        let mut t = Transcript::new();
        t.append_user("q", now);
        t.append_loading(now);
        let refs = vec![TitleRef {
            article_id: "article-0".to_string(),
            title: "T".to_string(),
        }];
        let id = t.resolve_loading("answer", refs.clone(), now);

        assert!(!t.has_loading());
        let last = t.last_assistant().expect("assistant");
        assert_eq!(last.id, id);
        assert_eq!(last.title_refs, refs);
    }
}
