//! Knowledge-base passage search.
//!
//! [`RetrievalIndex`] is the contract the retrieval handler calls through.
//! [`KeywordIndex`] is the in-memory implementation: `.txt` and `.md` files
//! under a directory, split into paragraphs, ranked by query-term overlap.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A ranked passage and the document it came from.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Passage {
    pub text: String,
    pub source_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("knowledge base not found at {0}")]
    NotFound(PathBuf),
    #[error("retrieval index unavailable: {0}")]
    Unavailable(String),
}

impl RetrievalError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::Unavailable(_) => "Unavailable",
        }
    }
}

#[async_trait]
pub trait RetrievalIndex: Send + Sync {
    /// Return at most `k` passages, best first. `k` is at least 1.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, RetrievalError>;
}

/// Render passages as `[Doc i] (Source: <file>): <text>` blocks.
pub fn format_passages(passages: &[Passage]) -> String {
    if passages.is_empty() {
        return "No relevant documents found.".to_string();
    }
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let source = Path::new(&p.source_id)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.source_id.clone());
            format!("[Doc {}] (Source: {}): {}", i + 1, source, p.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    passages: Vec<IndexedPassage>,
}

#[derive(Debug, Clone)]
struct IndexedPassage {
    passage: Passage,
    terms: HashSet<String>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_passages(passages: impl IntoIterator<Item = Passage>) -> Self {
        let mut index = Self::new();
        for passage in passages {
            index.insert(passage);
        }
        index
    }

    /// Index every `.txt`/`.md` file under `root`, recursively.
    pub fn load_dir(root: &Path) -> Result<Self, RetrievalError> {
        if !root.is_dir() {
            return Err(RetrievalError::NotFound(root.to_path_buf()));
        }

        let mut index = Self::new();
        let mut files = 0usize;

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_document(entry.path()) {
                continue;
            }

            let path = entry.path();
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable document");
                    continue;
                }
            };
            let source_id = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned();

            for paragraph in split_paragraphs(&content) {
                index.insert(Passage {
                    text: paragraph,
                    source_id: source_id.clone(),
                });
            }
            files += 1;
        }

        info!(
            root = %root.display(),
            files,
            passages = index.len(),
            "knowledge base indexed"
        );
        Ok(index)
    }

    pub fn insert(&mut self, passage: Passage) {
        let terms = terms(&passage.text).collect();
        self.passages.push(IndexedPassage { passage, terms });
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    fn rank(&self, query: &str, k: usize) -> Vec<Passage> {
        let query_terms: HashSet<String> = terms(query).collect();
        if query_terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize)> = self
            .passages
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                let overlap = query_terms.intersection(&p.terms).count();
                (overlap > 0).then_some((overlap, i))
            })
            .collect();
        // Highest overlap first; ties keep document order.
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        scored
            .into_iter()
            .take(k.max(1))
            .map(|(_, i)| self.passages[i].passage.clone())
            .collect()
    }
}

#[async_trait]
impl RetrievalIndex for KeywordIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, RetrievalError> {
        let results = self.rank(query.trim(), k);
        debug!(query, k, hits = results.len(), "keyword search");
        Ok(results)
    }
}

fn is_document(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("txt" | "md")
    )
}

fn split_paragraphs(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Lowercased alphanumeric terms of two or more characters.
fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str, source: &str) -> Passage {
        Passage {
            text: text.into(),
            source_id: source.into(),
        }
    }

    #[tokio::test]
    async fn ranks_by_term_overlap() {
        let index = KeywordIndex::from_passages([
            passage("Rust has ownership and borrowing.", "rust.md"),
            passage("Large language models predict tokens.", "llm.md"),
            passage("Language models like LLMs use transformers and tokens.", "llm2.md"),
        ]);

        let hits = index.search("what are language models tokens", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source_id, "llm.md");
        assert_eq!(hits[1].source_id, "llm2.md");
    }

    #[tokio::test]
    async fn no_overlap_returns_nothing() {
        let index = KeywordIndex::from_passages([passage("alpha beta", "a.txt")]);
        assert!(index.search("gamma", 3).await.unwrap().is_empty());
        assert!(index.search("   ", 3).await.unwrap().is_empty());
    }

    #[test]
    fn loads_documents_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "First para.\n\nSecond para.\n").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/b.txt"), "Third para.").unwrap();
        std::fs::write(dir.path().join("ignored.rs"), "fn main() {}").unwrap();

        let index = KeywordIndex::load_dir(dir.path()).unwrap();
        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn undecodable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.md"), "LLMs are large language models.").unwrap();
        std::fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x41]).unwrap();

        let index = KeywordIndex::load_dir(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
        let hits = index.search("language models", 3).await.unwrap();
        assert_eq!(hits[0].source_id, "good.md");
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = KeywordIndex::load_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert_eq!(err.kind(), "NotFound");
    }

    #[test]
    fn splits_on_blank_lines() {
        let parts = split_paragraphs("a\nb\n\n\n c \n\n");
        assert_eq!(parts, vec!["a\nb".to_string(), " c".to_string()]);
    }

    #[test]
    fn formats_with_file_names() {
        let text = format_passages(&[
            passage("one", "docs/guide.md"),
            passage("two", "notes.txt"),
        ]);
        assert_eq!(
            text,
            "[Doc 1] (Source: guide.md): one\n\n[Doc 2] (Source: notes.txt): two"
        );
        assert_eq!(format_passages(&[]), "No relevant documents found.");
    }
}
