use crate::classify::FileClassifier;
use crate::error::AppError;
use log;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use walkdir::WalkDir;

const MID_CONNECTOR: &str = "├── ";
const LAST_CONNECTOR: &str = "└── ";
const MID_CONTINUATION: &str = "│   ";
const LAST_CONTINUATION: &str = "    ";

/// Result of walking one directory: its rendered lines, the candidate files
/// beneath it in traversal order, and any entries that could not be read.
#[derive(Debug, Default)]
pub struct Subtree {
    pub lines: Vec<String>,
    pub candidates: Vec<PathBuf>,
    pub errors: Vec<AppError>,
}

impl Subtree {
    fn extend(&mut self, child: Subtree) {
        self.lines.extend(child.lines);
        self.candidates.extend(child.candidates);
        self.errors.extend(child.errors);
    }
}

#[derive(Debug)]
struct ListedEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Lists the direct children of `dir` sorted by name, skipping unreadable entries.
fn list_sorted(dir: &Path, errors: &mut Vec<AppError>) -> Vec<ListedEntry> {
    let mut entries = Vec::new();
    let listing = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    for entry_result in listing {
        match entry_result {
            Ok(entry) => entries.push(ListedEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path().to_path_buf(),
                is_dir: entry.file_type().is_dir(),
            }),
            Err(e) => {
                let err = AppError::from(e);
                log::warn!("Skipping entry: {}", err);
                errors.push(err);
            }
        }
    }
    entries
}

/// Walks `dir` depth-first, rendering tree lines under `prefix`.
pub fn walk_dir(dir: &Path, prefix: &str, classifier: &FileClassifier) -> Subtree {
    let mut subtree = Subtree::default();
    let listed: Vec<(ListedEntry, bool)> = list_sorted(dir, &mut subtree.errors)
        .into_iter()
        .map(|e| {
            let shown = !classifier.hidden_in_tree(&e.name, &e.path, e.is_dir);
            (e, shown)
        })
        .collect();

    let count = listed.iter().filter(|(_, shown)| *shown).count();
    let mut position = 0;
    for (entry, shown) in listed {
        if !shown {
            if !entry.is_dir && classifier.collects_file(&entry.name, &entry.path) {
                subtree.candidates.push(entry.path);
            }
            continue;
        }
        position += 1;
        let is_last = position == count;
        let connector = if is_last { LAST_CONNECTOR } else { MID_CONNECTOR };
        if entry.is_dir {
            subtree
                .lines
                .push(format!("{prefix}{connector}{}{MAIN_SEPARATOR}", entry.name));
            let continuation = if is_last { LAST_CONTINUATION } else { MID_CONTINUATION };
            let child = walk_dir(&entry.path, &format!("{prefix}{continuation}"), classifier);
            subtree.extend(child);
        } else {
            subtree.lines.push(format!("{prefix}{connector}{}", entry.name));
            if classifier.is_candidate(&entry.name) {
                subtree.candidates.push(entry.path);
            }
        }
    }
    subtree
}

/// Walks the project root. The returned lines start with `<root_name>/`.
pub fn gather_tree_and_candidates(
    classifier: &FileClassifier,
    root_name: &str,
) -> Subtree {
    let project_root = classifier.project_root();
    log::info!("Walking project directory: {}", project_root.display());
    let mut walked = walk_dir(project_root, "", classifier);
    walked.lines.insert(0, format!("{root_name}{MAIN_SEPARATOR}"));
    log::info!(
        "Directory walk complete. {} tree lines, {} candidate files.",
        walked.lines.len(),
        walked.candidates.len()
    );
    walked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::matcher::IgnoreMatcher;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_tree(dir: &Path) {
        fs::create_dir_all(dir.join("src/utils")).unwrap();
        fs::create_dir_all(dir.join("assets")).unwrap();
        fs::create_dir_all(dir.join(".git/objects")).unwrap();
        fs::create_dir_all(dir.join("__pycache__")).unwrap();
        fs::write(dir.join("src/main.py"), "print('hi')\n").unwrap();
        fs::write(dir.join("src/utils/helper.py"), "x = 1\n").unwrap();
        fs::write(dir.join("assets/logo.png"), "png").unwrap();
        fs::write(dir.join(".git/HEAD"), "ref").unwrap();
        fs::write(dir.join("__pycache__/m.pyc"), "pyc").unwrap();
        fs::write(dir.join("README.md"), "# Readme\n").unwrap();
        fs::write(dir.join("yarn.lock"), "lock").unwrap();
    }

    #[test]
    fn test_tree_lines_sorted_with_connectors() {
        let dir = tempdir().unwrap();
        create_test_tree(dir.path());
        let config = Config::default();
        let classifier = FileClassifier::new(dir.path(), &config, None).unwrap();

        let walked = gather_tree_and_candidates(&classifier, "proj");
        let sep = MAIN_SEPARATOR;
        let expected = vec![
            format!("proj{sep}"),
            "├── README.md".to_string(),
            format!("├── assets{sep}"),
            "│   └── logo.png".to_string(),
            format!("└── src{sep}"),
            "    ├── main.py".to_string(),
            format!("    └── utils{sep}"),
            "        └── helper.py".to_string(),
        ];
        assert_eq!(walked.lines, expected);
        assert!(walked.errors.is_empty());
    }

    #[test]
    fn test_candidates_follow_traversal_order_and_skip_binaries() {
        let dir = tempdir().unwrap();
        create_test_tree(dir.path());
        let config = Config::default();
        let classifier = FileClassifier::new(dir.path(), &config, None).unwrap();

        let walked = gather_tree_and_candidates(&classifier, "proj");
        let expected: Vec<PathBuf> = ["README.md", "src/main.py", "src/utils/helper.py"]
            .iter()
            .map(|p| dir.path().join(p))
            .collect();
        assert_eq!(walked.candidates, expected);
    }

    #[test]
    fn test_matched_directory_is_pruned() {
        let dir = tempdir().unwrap();
        create_test_tree(dir.path());
        let pattern = format!("{}", dir.path().join("src").display());
        let matcher = IgnoreMatcher::parse(&pattern);
        let config = Config::default();
        let classifier = FileClassifier::new(dir.path(), &config, Some(&matcher)).unwrap();

        let walked = gather_tree_and_candidates(&classifier, "proj");
        assert!(walked.lines.iter().all(|l| !l.contains("src") && !l.contains("main.py")));
        assert_eq!(walked.candidates, vec![dir.path().join("README.md")]);
        assert!(walked.lines.contains(&format!("└── assets{MAIN_SEPARATOR}")));
    }

    #[test]
    fn test_file_with_always_ignored_name_is_collected_but_not_shown() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".git"), "gitdir: ../main/.git\n").unwrap();
        fs::write(dir.path().join("lib.rs"), "pub fn f() {}\n").unwrap();
        let config = Config::default();
        let classifier = FileClassifier::new(dir.path(), &config, None).unwrap();

        let walked = gather_tree_and_candidates(&classifier, "proj");
        assert_eq!(
            walked.lines,
            vec![format!("proj{MAIN_SEPARATOR}"), "└── lib.rs".to_string()]
        );
        let expected: Vec<PathBuf> =
            [".git", "lib.rs"].iter().map(|p| dir.path().join(p)).collect();
        assert_eq!(walked.candidates, expected);
    }

    #[test]
    fn test_trailing_slash_exclude_prunes_directory_line() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/guide.md"), "# Guide\n").unwrap();
        fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
        let mut config = Config::default();
        config.ignore.exclude = vec!["docs/".to_string()];
        let classifier = FileClassifier::new(dir.path(), &config, None).unwrap();

        let walked = gather_tree_and_candidates(&classifier, "proj");
        assert_eq!(
            walked.lines,
            vec![format!("proj{MAIN_SEPARATOR}"), "└── main.rs".to_string()]
        );
        assert_eq!(walked.candidates, vec![dir.path().join("main.rs")]);
    }

    #[test]
    fn test_empty_root_renders_only_root_line() {
        let dir = tempdir().unwrap();
        let config = Config::default();
        let classifier = FileClassifier::new(dir.path(), &config, None).unwrap();
        let walked = gather_tree_and_candidates(&classifier, "empty");
        assert_eq!(walked.lines, vec![format!("empty{MAIN_SEPARATOR}")]);
        assert!(walked.candidates.is_empty());
    }

    #[test]
    fn test_missing_root_reports_list_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let config = Config::default();
        let classifier = FileClassifier::new(&missing, &config, None).unwrap();
        let walked = walk_dir(&missing, "", &classifier);
        assert!(walked.lines.is_empty());
        assert_eq!(walked.errors.len(), 1);
        assert!(walked.errors[0].is_skip());
    }
}
