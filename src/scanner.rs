//! Repository scanner: walks a source tree, runs the registered parsers,
//! and handles API documents for the repository.
//!
//! Walks source files respecting .gitignore and the configured exclusions,
//! parses them in parallel, and returns records ordered by relative path
//! and then source position so that assembly is reproducible.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::FinderConfig;
use crate::endpoint::EndpointRecord;
use crate::error::{FinderError, Result};
use crate::openapi::{
    assemble, find_api_documents, save_discovered, save_document, DiscoveredDocument,
};
use crate::parser::{Language, ParserRegistry};

/// Path components that mark vendored or library code.
const LIBRARY_DIRS: [&str; 5] = ["node_modules", "vendor", "third_party", "lib", "libs"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LanguageStats {
    /// Files that yielded at least one endpoint.
    pub files_scanned: usize,
    pub endpoints_found: usize,
}

impl LanguageStats {
    fn add(&mut self, other: &LanguageStats) {
        self.files_scanned += other.files_scanned;
        self.endpoints_found += other.endpoints_found;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedDocument {
    pub original: String,
    pub saved: PathBuf,
}

/// API documents found in, copied from, or generated for a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentOutcome {
    pub existing_files: Vec<DiscoveredDocument>,
    pub saved_files: Vec<SavedDocument>,
    pub generated_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryScan {
    pub repository: String,
    pub path: PathBuf,
    pub endpoints: Vec<EndpointRecord>,
    pub endpoint_count: usize,
    /// Keyed by language identifier.
    pub languages: BTreeMap<String, LanguageStats>,
    pub openapi: DocumentOutcome,
}

/// One entry of a multi-repository scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RepositoryOutcome {
    Scanned(RepositoryScan),
    Failed { repository: String, error: String },
}

impl RepositoryOutcome {
    pub fn repository(&self) -> &str {
        match self {
            RepositoryOutcome::Scanned(scan) => &scan.repository,
            RepositoryOutcome::Failed { repository, .. } => repository,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanResults {
    pub repositories: Vec<RepositoryOutcome>,
    pub total_repositories: usize,
    pub total_endpoints: usize,
    pub languages: BTreeMap<String, LanguageStats>,
}

/// A source file selected for parsing.
struct SourceFile {
    relative: String,
    path: PathBuf,
    language: Language,
}

/// Scan one local repository.
pub fn scan_repository(
    root: &Path,
    config: &FinderConfig,
    registry: &ParserRegistry,
) -> Result<RepositoryScan> {
    if !root.is_dir() {
        return Err(FinderError::NotADirectory(root.to_path_buf()));
    }
    let repository = repository_name(root);
    info!(repo = %repository, root = %root.display(), "scanning repository");

    let files = collect_source_files(root, config);
    debug!(repo = %repository, files = files.len(), "collected source files");

    let parsed: Vec<(Language, Vec<EndpointRecord>)> = files
        .par_iter()
        .filter_map(|file| {
            let parser = registry.get_parser(file.language.id())?;
            let bytes = match fs::read(&file.path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(file = %file.relative, error = %e, "could not read file");
                    return None;
                }
            };
            let content = String::from_utf8_lossy(&bytes);
            Some((file.language, parser.parse(&content, &file.relative)))
        })
        .collect();

    let mut endpoints = Vec::new();
    let mut languages: BTreeMap<String, LanguageStats> = BTreeMap::new();
    for (language, records) in parsed {
        if records.is_empty() {
            continue;
        }
        let stats = languages.entry(language.id().to_string()).or_default();
        stats.files_scanned += 1;
        stats.endpoints_found += records.len();
        endpoints.extend(records);
    }

    let openapi = handle_documents(root, &repository, &endpoints, config);

    info!(
        repo = %repository,
        endpoints = endpoints.len(),
        documents = openapi.existing_files.len(),
        "repository scan complete"
    );

    Ok(RepositoryScan {
        repository,
        path: root.to_path_buf(),
        endpoint_count: endpoints.len(),
        endpoints,
        languages,
        openapi,
    })
}

/// Scan several local repositories. A repository that cannot be scanned
/// becomes a `Failed` entry; the others are unaffected.
pub fn scan_repositories(
    paths: &[PathBuf],
    config: &FinderConfig,
    registry: &ParserRegistry,
) -> ScanResults {
    let mut results = ScanResults {
        total_repositories: paths.len(),
        ..Default::default()
    };

    for path in paths {
        match scan_repository(path, config, registry) {
            Ok(scan) => {
                results.total_endpoints += scan.endpoint_count;
                for (language, stats) in &scan.languages {
                    results
                        .languages
                        .entry(language.clone())
                        .or_default()
                        .add(stats);
                }
                results.repositories.push(RepositoryOutcome::Scanned(scan));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "repository scan failed");
                results.repositories.push(RepositoryOutcome::Failed {
                    repository: path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
    results
}

/// Parse a single file with the parser for its extension.
pub fn parse_file(path: &Path, registry: &ParserRegistry) -> Result<Vec<EndpointRecord>> {
    let language = Language::from_path(path)
        .ok_or_else(|| FinderError::UnsupportedLanguage(path.display().to_string()))?;
    let parser = registry
        .get_parser(language.id())
        .ok_or_else(|| FinderError::UnsupportedLanguage(language.id().to_string()))?;
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(parser.parse(&content, &path.to_string_lossy()))
}

fn repository_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

fn collect_source_files(root: &Path, config: &FinderConfig) -> Vec<SourceFile> {
    let languages = config.languages();
    let exclude_dirs = config.scan.exclude_dirs.clone();

    let mut files: Vec<SourceFile> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && entry.depth() > 0 && exclude_dirs.iter().any(|d| entry.file_name() == d.as_str()))
        })
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| {
            let language = Language::from_path(entry.path())?;
            if !languages.contains(&language) {
                return None;
            }
            let path = entry.into_path();
            let relative = path.strip_prefix(root).unwrap_or(path.as_path()).to_path_buf();
            if in_library_dir(&relative) {
                return None;
            }
            Some(SourceFile {
                relative: relative.to_string_lossy().replace('\\', "/"),
                path,
                language,
            })
        })
        .collect();

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    files
}

fn in_library_dir(relative: &Path) -> bool {
    relative.parent().is_some_and(|dir| {
        dir.components().any(|c| {
            let part = c.as_os_str().to_string_lossy().to_ascii_lowercase();
            LIBRARY_DIRS.contains(&part.as_str())
        })
    })
}

fn handle_documents(
    root: &Path,
    repository: &str,
    endpoints: &[EndpointRecord],
    config: &FinderConfig,
) -> DocumentOutcome {
    let settings = &config.openapi;
    let mut outcome = DocumentOutcome::default();

    if settings.find_existing {
        outcome.existing_files = find_api_documents(root);
        for doc in &outcome.existing_files {
            match save_discovered(doc, &settings.output_dir) {
                Ok(saved) => outcome.saved_files.push(SavedDocument {
                    original: doc.file.clone(),
                    saved,
                }),
                Err(e) => error!(file = %doc.file, error = %e, "could not save API document"),
            }
        }
    }

    if settings.generate_if_none && outcome.existing_files.is_empty() && !endpoints.is_empty() {
        info!(repo = %repository, "no existing API document, generating one");
        let doc = assemble(endpoints, repository, settings.output_format);
        match save_document(&doc, &settings.output_dir, repository, settings.output_format) {
            Ok(path) => outcome.generated_file = Some(path),
            Err(e) => error!(repo = %repository, error = %e, "could not save generated document"),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ApiDocument;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config_with_output(dir: &Path) -> FinderConfig {
        let mut config = FinderConfig::default();
        config.openapi.output_dir = dir.to_path_buf();
        config
    }

    fn sample_repo(root: &Path) {
        write(
            root,
            "app/views.py",
            "from flask import Flask\napp = Flask(__name__)\n\n@app.route('/health')\ndef health():\n    return 'ok'\n",
        );
        write(
            root,
            "web/routes.js",
            "const router = express.Router();\nrouter.get('/users/:id', show);\nrouter.post('/users', create);\n",
        );
        write(
            root,
            "src/main/java/ItemController.java",
            "@RestController\n@RequestMapping(\"/api/items\")\npublic class ItemController {\n    @GetMapping(\"/{id}\")\n    public Item get(@PathVariable Long id) { return null; }\n}\n",
        );
        write(root, "node_modules/express/router.js", "app.get('/vendored', h);\n");
        write(root, "lib/helpers.py", "@app.route('/lib')\ndef lib():\n    pass\n");
        write(root, "venv/site.py", "@app.route('/venv')\ndef venv():\n    pass\n");
        write(root, "app/models.py", "class User:\n    pass\n");
        write(root, "README.md", "app.get('/docs', h)\n");
    }

    #[test]
    fn test_scan_repository() {
        let repo = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        sample_repo(repo.path());

        let registry = ParserRegistry::with_defaults();
        let scan = scan_repository(repo.path(), &config_with_output(out.path()), &registry).unwrap();

        let found: Vec<_> = scan
            .endpoints
            .iter()
            .map(|e| (e.file.as_str(), e.method.as_str(), e.path.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("app/views.py", "GET", "/health"),
                ("src/main/java/ItemController.java", "GET", "/api/items/{id}"),
                ("web/routes.js", "GET", "/users/:id"),
                ("web/routes.js", "POST", "/users"),
            ]
        );
        assert_eq!(scan.endpoint_count, 4);
        assert_eq!(
            scan.languages["javascript"],
            LanguageStats {
                files_scanned: 1,
                endpoints_found: 2
            }
        );
        assert_eq!(scan.languages["python"].files_scanned, 1);

        let generated = scan.openapi.generated_file.clone().unwrap();
        let doc: ApiDocument =
            serde_json::from_str(&fs::read_to_string(generated).unwrap()).unwrap();
        assert!(doc.paths.contains_key("/api/items/{id}"));
        assert_eq!(doc.operation_count(), 4);
    }

    #[test]
    fn test_existing_document_suppresses_generation() {
        let repo = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        sample_repo(repo.path());
        write(repo.path(), "docs/openapi.json", r#"{"openapi":"3.0.0","info":{"title":"Mine"}}"#);

        let registry = ParserRegistry::with_defaults();
        let scan = scan_repository(repo.path(), &config_with_output(out.path()), &registry).unwrap();
        assert_eq!(scan.openapi.existing_files.len(), 1);
        assert_eq!(scan.openapi.saved_files[0].original, "docs/openapi.json");
        assert!(scan.openapi.saved_files[0].saved.exists());
        assert!(scan.openapi.generated_file.is_none());
    }

    #[test]
    fn test_language_filter() {
        let repo = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        sample_repo(repo.path());

        let mut config = config_with_output(out.path());
        config.scan.languages = vec!["java".into()];
        config.openapi.generate_if_none = false;
        let scan = scan_repository(repo.path(), &config, &ParserRegistry::with_defaults()).unwrap();
        assert_eq!(scan.endpoint_count, 1);
        assert!(scan.languages.contains_key("java"));
        assert_eq!(scan.languages.len(), 1);
        assert!(scan.openapi.generated_file.is_none());
    }

    #[test]
    fn test_scan_repositories_records_failures() {
        let repo = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        sample_repo(repo.path());

        let paths = vec![repo.path().to_path_buf(), repo.path().join("missing")];
        let results = scan_repositories(
            &paths,
            &config_with_output(out.path()),
            &ParserRegistry::with_defaults(),
        );
        assert_eq!(results.total_repositories, 2);
        assert_eq!(results.total_endpoints, 4);
        assert_eq!(results.languages["java"].endpoints_found, 1);
        assert!(matches!(results.repositories[1], RepositoryOutcome::Failed { .. }));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "server.js", "app.delete('/items/:id', remove);\n");
        let registry = ParserRegistry::with_defaults();
        let endpoints = parse_file(&dir.path().join("server.js"), &registry).unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].method, "DELETE");

        write(dir.path(), "main.go", "package main\n");
        assert!(matches!(
            parse_file(&dir.path().join("main.go"), &registry),
            Err(FinderError::UnsupportedLanguage(_))
        ));
    }
}
