//! Hygiene: coding standards enforced at test time.
//!
//! Scans the production sources of this crate (everything under `src/` that
//! is not a `*_test.rs` file) for antipatterns. Each pattern has a budget,
//! ideally zero. To add an occurrence you have to remove another one first;
//! budgets never grow.

use std::fs;
use std::path::Path;

struct Rule {
    pattern: &'static str,
    budget: usize,
    why: &'static str,
}

const RULES: &[Rule] = &[
    // Panics: these abort whatever process is decoding.
    Rule { pattern: ".unwrap()", budget: 0, why: "propagate with `?` or handle the None/Err" },
    Rule { pattern: ".expect(", budget: 0, why: "propagate with `?` or handle the None/Err" },
    Rule { pattern: "panic!(", budget: 0, why: "return an error instead" },
    Rule { pattern: "unreachable!(", budget: 0, why: "make the state unrepresentable" },
    Rule { pattern: "todo!(", budget: 0, why: "finish the stub" },
    Rule { pattern: "unimplemented!(", budget: 0, why: "finish the stub" },
    // Silent loss: discards errors without inspecting them.
    Rule { pattern: "let _ =", budget: 0, why: "inspect or log the result" },
    Rule { pattern: ".ok()", budget: 0, why: "match on the error and log it" },
    // Output: library code logs through `tracing`.
    Rule { pattern: "println!(", budget: 0, why: "use tracing macros" },
    Rule { pattern: "eprintln!(", budget: 0, why: "use tracing macros" },
    Rule { pattern: "dbg!(", budget: 0, why: "remove debugging output" },
    // Structure.
    Rule { pattern: "#[allow(dead_code)]", budget: 0, why: "delete the dead code" },
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// `(path, count)` for every file containing `pattern`.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|file| (file.path.clone(), file.content.lines().filter(|line| line.contains(pattern)).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[test]
fn sources_are_found() {
    assert!(!source_files().is_empty(), "no sources under src/; run from the crate root");
}

#[test]
fn pattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for rule in RULES {
        let found = hits(&files, rule.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > rule.budget {
            let detail: Vec<String> = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect();
            failures.push(format!(
                "`{}` budget exceeded: found {count}, max {} ({})\n{}",
                rule.pattern,
                rule.budget,
                rule.why,
                detail.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
