use codesnap_core::{AccessOp, AppError, Config, Snapshot};
use std::fs;
use std::path::{MAIN_SEPARATOR, Path};
use tempfile::tempdir;

fn numbered_lines(count: usize) -> String {
    (1..=count).map(|i| format!("{{\"row\": {i}}}\n")).collect()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Splits a rendered document on its file headers, returning the paths in order.
fn headers(document: &str) -> Vec<String> {
    document
        .lines()
        .filter(|line| line.starts_with("FILE_"))
        .map(|line| line.split_once(": ").unwrap().1.to_string())
        .collect()
}

#[test]
fn test_mixed_project_scenario() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let a_py: String = (1..=10).map(|i| format!("x{i:02} = {i:013}\n")).collect();
    assert_eq!(a_py.len(), 200);
    write(&root, "a.py", &a_py);
    write(&root, "config.json", &numbered_lines(301));
    write(&root, ".gitignore", "*.lock\n");
    write(&root, "node_modules/x.lock", "lockfile\n");

    let snapshot = Snapshot::build(&root, &Config::default()).unwrap();
    assert!(snapshot.diagnostics.is_empty());

    let paths: Vec<&str> = snapshot
        .files
        .iter()
        .map(|f| f.relative_path.as_str())
        .collect();
    assert_eq!(paths, vec!["a.py", "config.json"]);

    let stats = &snapshot.statistics;
    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.total_lines, 311);
    assert_eq!(stats.lines_per_extension[".json"], 301);
    assert_eq!(stats.largest_file.name, "config.json");
    assert_eq!(stats.largest_file.lines, 301);

    let config_block = &snapshot.files[1].content;
    assert_eq!(config_block.lines().filter(|l| l.starts_with("{\"row\"")).count(), 300);
    assert!(config_block.ends_with("(truncated to 300 lines for brevity, total file length: 301 lines)"));

    let sep = MAIN_SEPARATOR;
    let root_name = root.file_name().unwrap().to_string_lossy();
    assert_eq!(
        snapshot.tree,
        vec![
            format!("{root_name}{sep}"),
            "├── a.py".to_string(),
            "├── config.json".to_string(),
            format!("└── node_modules{sep}"),
        ]
    );
}

#[test]
fn test_empty_root_scenario() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let snapshot = Snapshot::build(&root, &Config::default()).unwrap();

    let stats = &snapshot.statistics;
    assert_eq!(stats.total_files, 0);
    assert_eq!(stats.total_lines, 0);
    assert_eq!(stats.average_size, 0.0);
    assert_eq!(stats.largest_file.name, "");
    assert_eq!(stats.largest_file.size, 0);
    assert_eq!(stats.largest_file.lines, 0);

    let document = snapshot.render();
    assert!(document.contains("5. Average file size: 0.00 bytes\n"));
    assert!(document.contains("   - Name: \n"));
    assert!(headers(&document).is_empty());
}

#[test]
fn test_rendering_is_deterministic() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    write(&root, "src/lib.rs", "pub mod a;\n");
    write(&root, "src/a.rs", "pub fn a() {}\n");
    write(&root, "README.md", "# demo\n");
    write(&root, "data/rows.json", &numbered_lines(3));
    write(&root, "Makefile", "all:\n");

    let config = Config::default();
    let first = Snapshot::build(&root, &config).unwrap().render();
    let second = Snapshot::build(&root, &config).unwrap().render();
    assert_eq!(first, second);
}

#[test]
fn test_file_index_and_blocks_enumerate_same_files() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    write(&root, "b/z.txt", "z\n");
    write(&root, "a.txt", "a\n");
    write(&root, "b/y.txt", "y\n");
    write(&root, "empty.txt", "");
    write(&root, "logo.png", "binary");

    let snapshot = Snapshot::build(&root, &Config::default()).unwrap();
    let document = snapshot.render();

    let index_section = document
        .split("File Index:\n")
        .nth(1)
        .unwrap()
        .split("\n\n")
        .next()
        .unwrap();
    let indexed: Vec<String> = index_section
        .lines()
        .map(|line| line.split_once(". ").unwrap().1.to_string())
        .collect();

    let b_z = Path::new("b").join("z.txt").to_string_lossy().into_owned();
    let b_y = Path::new("b").join("y.txt").to_string_lossy().into_owned();
    assert_eq!(indexed, vec!["a.txt".to_string(), b_y, b_z]);
    assert_eq!(headers(&document), indexed);
    assert!(document.contains("FILE_0003: "));
    // Binary and empty files still appear in the folder map.
    assert!(document.contains("├── empty.txt\n"));
    assert!(document.contains("└── logo.png\n"));
}

#[test]
fn test_output_and_program_names_are_not_snapshotted() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let mut config = Config::default();
    config.general.program_name = Some("codesnap".to_string());
    let output_name = config.output_filename(&root);

    write(&root, &output_name, "previous run\n");
    write(&root, "codesnap", "binary-ish\n");
    write(&root, "main.go", "package main\n");

    let snapshot = Snapshot::build(&root, &config).unwrap();
    let paths: Vec<&str> = snapshot
        .files
        .iter()
        .map(|f| f.relative_path.as_str())
        .collect();
    assert_eq!(paths, vec!["main.go"]);
    assert!(!snapshot.tree.iter().any(|l| l.contains(&output_name)));
}

#[test]
fn test_unreadable_ignore_file_is_a_diagnostic() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir(root.join(".gitignore")).unwrap();
    write(&root, "main.rs", "fn main() {}\n");

    let snapshot = Snapshot::build(&root, &Config::default()).unwrap();
    assert!(matches!(
        snapshot.diagnostics.as_slice(),
        [AppError::IgnoreFile { .. }]
    ));
    assert_eq!(snapshot.statistics.total_files, 1);
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_is_skipped_with_diagnostic() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    write(&root, "ok.rs", "fn ok() {}\n");
    std::os::unix::fs::symlink(root.join("nowhere.rs"), root.join("dangling.rs")).unwrap();

    let snapshot = Snapshot::build(&root, &Config::default()).unwrap();
    assert_eq!(snapshot.statistics.total_files, 1);
    assert!(snapshot.diagnostics.iter().any(|d| matches!(
        d,
        AppError::Access { operation: AccessOp::Stat, .. }
    )));
    assert!(snapshot.tree.iter().any(|l| l.ends_with("dangling.rs")));
}

#[test]
fn test_exclude_globs_and_disabled_ignore_file() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    write(&root, ".gitignore", "*.log\n");
    write(&root, "debug.log", "noise\n");
    write(&root, "vendor/lib.js", "var x;\n");
    write(&root, "app.js", "run();\n");

    let mut config = Config::default();
    config.ignore.use_ignore_file = false;
    config.ignore.exclude = vec!["vendor/**".to_string()];
    let snapshot = Snapshot::build(&root, &config).unwrap();
    let paths: Vec<&str> = snapshot
        .files
        .iter()
        .map(|f| f.relative_path.as_str())
        .collect();
    assert_eq!(paths, vec!["app.js", "debug.log"]);
}
