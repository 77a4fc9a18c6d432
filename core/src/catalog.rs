use crate::error::{RecommendError, RecommendResult};
use crate::{MovieIndex, MovieRecord};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read-only collection of movie records, addressed by position.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<MovieRecord>,
    // lowercased title -> positions, catalog order
    by_title: HashMap<String, Vec<MovieIndex>>,
}

impl Catalog {
    pub fn from_records(records: Vec<MovieRecord>) -> RecommendResult<Self> {
        if records.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }
        let mut by_title: HashMap<String, Vec<MovieIndex>> = HashMap::new();
        for (i, r) in records.iter().enumerate() {
            by_title.entry(title_key(&r.title)).or_default().push(i);
        }
        Ok(Self { records, by_title })
    }

    /// Load records from a `.json`/`.jsonl` file or a directory of them.
    pub fn load<P: AsRef<Path>>(path: P) -> RecommendResult<Self> {
        let path = path.as_ref();
        let mut files: Vec<PathBuf> = Vec::new();
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file() && matches!(extension(p), Some("json" | "jsonl")) {
                    files.push(p.to_path_buf());
                }
            }
        } else {
            files.push(path.to_path_buf());
        }

        let mut records = Vec::new();
        for file in &files {
            if extension(file) == Some("jsonl") {
                read_jsonl(file, &mut records)?;
            } else {
                read_json(file, &mut records)?;
            }
        }

        let catalog = Self::from_records(records)?;
        tracing::info!(
            num_records = catalog.len(),
            num_files = files.len(),
            duplicate_titles = catalog.duplicate_titles(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn records(&self) -> &[MovieRecord] { &self.records }
    pub fn get(&self, index: MovieIndex) -> Option<&MovieRecord> { self.records.get(index) }

    pub fn title_of(&self, index: MovieIndex) -> RecommendResult<&str> {
        self.get(index)
            .map(|r| r.title.as_str())
            .ok_or(RecommendError::IndexOutOfRange { index, len: self.len() })
    }

    /// Every record whose title equals `title` ignoring case, in catalog order.
    pub fn matches(&self, title: &str) -> &[MovieIndex] {
        self.by_title.get(&title_key(title)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains_title(&self, title: &str) -> bool { !self.matches(title).is_empty() }

    /// First record with this title. Duplicates are not told apart.
    pub fn find_title(&self, title: &str) -> Option<MovieIndex> {
        let matches = self.matches(title);
        if matches.len() > 1 {
            tracing::warn!(title, count = matches.len(), "duplicate titles, using first match");
        }
        matches.first().copied()
    }

    /// Number of distinct titles that appear more than once.
    pub fn duplicate_titles(&self) -> usize {
        self.by_title.values().filter(|v| v.len() > 1).count()
    }
}

fn title_key(title: &str) -> String {
    title.to_lowercase()
}

fn extension(p: &Path) -> Option<&str> {
    p.extension().and_then(|s| s.to_str())
}

fn read_jsonl(file: &Path, out: &mut Vec<MovieRecord>) -> RecommendResult<()> {
    let reader = BufReader::new(File::open(file)?);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let rec: MovieRecord = serde_json::from_str(&line).map_err(|e| RecommendError::Record {
            path: format!("{}:{}", file.display(), lineno + 1),
            reason: e.to_string(),
        })?;
        out.push(rec);
    }
    Ok(())
}

fn read_json(file: &Path, out: &mut Vec<MovieRecord>) -> RecommendResult<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: Value = serde_json::from_reader(reader)?;
    let to_record = |v: Value| {
        serde_json::from_value::<MovieRecord>(v).map_err(|e| RecommendError::Record {
            path: file.display().to_string(),
            reason: e.to_string(),
        })
    };
    match json {
        Value::Array(arr) => {
            for v in arr {
                out.push(to_record(v)?);
            }
        }
        Value::Object(_) => out.push(to_record(json)?),
        _ => {
            return Err(RecommendError::Record {
                path: file.display().to_string(),
                reason: "expected a record object or an array of records".into(),
            })
        }
    }
    Ok(())
}
