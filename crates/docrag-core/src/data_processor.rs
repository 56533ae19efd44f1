use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ChunkingSettings;
use crate::types::Chunk;

const DOC_EXTENSIONS: [&str; 3] = ["md", "mdx", "txt"];

/// Turns a directory of documentation files into overlapping word windows.
pub struct DataProcessor {
    settings: ChunkingSettings,
    front_matter: Regex,
    html_comment: Regex,
    blank_runs: Regex,
    space_runs: Regex,
}

impl DataProcessor {
    pub fn new() -> Result<Self> { Self::with_settings(ChunkingSettings::default()) }

    pub fn with_settings(settings: ChunkingSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            front_matter: Regex::new(r"(?s)\A---[ \t]*\n.*?\n---[ \t]*\n")?,
            html_comment: Regex::new(r"(?s)<!--.*?-->")?,
            blank_runs: Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+")?,
            space_runs: Regex::new(r"[ \t]+")?,
        })
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        self.process_directory_limited(data_dir, usize::MAX)
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<Chunk>> {
        let mut files = self.list_doc_files(data_dir);
        if files.is_empty() { warn!(dir = %data_dir.display(), "no documentation files found"); return Ok(vec![]); }
        if files.len() > limit { files.truncate(limit); info!(limit, "limited to first files"); }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "processing {}/{}", file_index + 1, files.len());
            let content = self.read_file_content(file_path)?;
            let relative = file_path.strip_prefix(data_dir).unwrap_or(file_path);
            all_chunks.extend(self.chunk_document(&relative.to_string_lossy(), &content));
        }
        info!(files = files.len(), chunks = all_chunks.len(), "processed documentation");
        Ok(all_chunks)
    }

    /// Cleans one document and cuts it into chunks with ids `<source>_<n>`.
    pub fn chunk_document(&self, source_path: &str, raw: &str) -> Vec<Chunk> {
        let cleaned = self.clean_markdown(raw);
        if cleaned.chars().count() < self.settings.min_chars { return vec![]; }
        self.split_with_overlap(&cleaned)
            .into_iter()
            .enumerate()
            .map(|(i, content)| Chunk { id: format!("{source_path}_{i}"), source_path: source_path.to_string(), content, position_index: i })
            .collect()
    }

    /// Strips front matter and HTML comments, then squeezes whitespace.
    pub fn clean_markdown(&self, raw: &str) -> String {
        let text = self.front_matter.replace(raw, "");
        let text = self.html_comment.replace_all(&text, "");
        let text = self.blank_runs.replace_all(&text, "\n\n");
        let text = self.space_runs.replace_all(&text, " ");
        text.trim().to_string()
    }

    fn split_with_overlap(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let size = self.settings.chunk_words;
        let step = size.saturating_sub(self.settings.overlap_words).max(1);
        let mut chunks = Vec::new(); let mut start = 0;
        while start < words.len() {
            let end = (start + size).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() { break; }
            start += step;
        }
        chunks
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path).with_context(|| format!("Failed to read {}", file_path.display()))?).to_string()),
        }
    }

    fn list_doc_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut doc_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()).is_some_and(|ext| DOC_EXTENSIONS.contains(&ext)) { doc_files.push(path.to_path_buf()); }
        }
        doc_files.sort(); doc_files
    }
}
