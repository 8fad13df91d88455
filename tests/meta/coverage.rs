//! Structural checks keeping the unit test tree in step with the sources

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Entry points and module organization files carry no logic of their own
    fn is_organizational(relative: &str) -> bool {
        relative == "main.rs" || relative == "lib.rs" || relative.ends_with("mod.rs")
    }

    fn relative_rust_files(dir: &Path, base: &Path, found: &mut BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                relative_rust_files(&path, base, found)?;
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
                continue;
            }
            let relative = path
                .strip_prefix(base)
                .map_err(|_original_error| io::Error::other("Failed to strip prefix"))?;
            found.insert(relative.to_string_lossy().replace('\\', "/"));
        }
        Ok(())
    }

    fn collect(dir: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let base = Path::new(dir);
        if let Err(error) = relative_rust_files(base, base, &mut found) {
            assert!(!base.exists(), "Failed to scan {dir}: {error}");
        }
        found
            .into_iter()
            .filter(|relative| !is_organizational(relative))
            .collect()
    }

    // Every source file needs a unit test file at the mirrored path
    // Verified by deleting tests/unit/math/cost.rs
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let tests = collect(UNIT_DIR);
        let missing: Vec<String> = collect(SRC_DIR)
            .into_iter()
            .filter(|relative| !tests.contains(relative))
            .map(|relative| format!("  - src/{relative} -> tests/unit/{relative}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    // Unit test files must not outlive the source they cover
    // Verified by adding tests/unit/math/orphan.rs
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let sources = collect(SRC_DIR);
        let orphaned: Vec<String> = collect(UNIT_DIR)
            .into_iter()
            .filter(|relative| !sources.contains(relative))
            .map(|relative| format!("  - tests/unit/{relative}"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files without a source file:\n{}",
            orphaned.join("\n")
        );
    }

    // A unit test file only runs when its directory's mod.rs declares it
    // Verified by removing `mod grid;` from tests/unit/spatial/mod.rs
    #[test]
    fn test_unit_test_files_are_declared() {
        let mut undeclared = Vec::new();

        for relative in collect(UNIT_DIR) {
            let path = Path::new(UNIT_DIR).join(&relative);
            let (Some(parent), Some(stem)) = (path.parent(), path.file_stem()) else {
                continue;
            };
            let declarations = fs::read_to_string(parent.join("mod.rs")).unwrap_or_default();
            let wanted = format!("mod {};", stem.to_string_lossy());
            if !declarations.lines().any(|line| line.trim() == wanted) {
                undeclared.push(format!("  - tests/unit/{relative}"));
            }
        }

        assert!(
            undeclared.is_empty(),
            "Unit test files not declared in their mod.rs:\n{}",
            undeclared.join("\n")
        );
    }

    // Every test file apart from the harness and module files holds tests
    // Verified by adding a test file without #[test] functions
    #[test]
    fn test_all_test_files_contain_tests() {
        let mut found = BTreeSet::new();
        let base = Path::new("tests");
        if let Err(error) = relative_rust_files(base, base, &mut found) {
            assert!(!base.exists(), "Failed to scan tests: {error}");
        }

        let empty: Vec<String> = found
            .into_iter()
            .filter(|relative| relative != "main.rs" && !relative.ends_with("mod.rs"))
            .filter(|relative| {
                fs::read_to_string(base.join(relative))
                    .is_ok_and(|content| !content.contains("#[test]"))
            })
            .map(|relative| format!("  - tests/{relative}"))
            .collect();

        assert!(
            empty.is_empty(),
            "Test files without #[test] functions:\n{}",
            empty.join("\n")
        );
    }
}
