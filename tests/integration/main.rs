//! Integration tests for buildcache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Project {
        dir: TempDir,
    }

    impl Project {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("app")).unwrap();
            Self { dir }
        }

        fn app(&self) -> PathBuf {
            self.dir.path().join("app")
        }

        fn root(&self) -> PathBuf {
            self.dir.path().join("cache")
        }

        fn write(&self, relative: &str, contents: &str) {
            let path = self.app().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("buildcache");
            cmd.env_remove("BUILDCACHE_ROOT")
                .arg("--config")
                .arg(self.dir.path().join("config.toml"))
                .arg("--root")
                .arg(self.root())
                .arg("-C")
                .arg(self.app());
            cmd
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("buildcache")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("build-time directory cache"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("buildcache")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("buildcache"));
    }

    #[test]
    fn store_and_load_round_trip() {
        let project = Project::new();
        project.write("vendor/bundle/gems/rack.rb", "rack");

        project
            .cmd()
            .args(["store", "vendor/bundle"])
            .assert()
            .success();
        assert!(project.root().join("vendor/bundle/gems/rack.rb").is_file());

        project
            .cmd()
            .args(["load", "vendor/bundle", "--to", "restored"])
            .assert()
            .success();
        assert_eq!(
            fs::read_to_string(project.app().join("restored/gems/rack.rb")).unwrap(),
            "rack"
        );
    }

    #[test]
    fn store_clears_but_add_merges() {
        let project = Project::new();
        project.write("first/a", "a");
        project.write("first/b", "b");
        project.write("second/a", "a2");
        project.write("second/c", "c");
        let entry = project.root().join("k");

        project.cmd().args(["store", "first", "--as", "k"]).assert().success();
        project.cmd().args(["store", "second", "--as", "k"]).assert().success();
        assert_eq!(entries(&entry), ["a", "c"]);

        project.cmd().args(["store", "first", "--as", "k"]).assert().success();
        project.cmd().args(["add", "second", "--as", "k"]).assert().success();
        assert_eq!(entries(&entry), ["a", "b", "c"]);
    }

    #[test]
    fn exists_reflects_entry_state() {
        let project = Project::new();
        project.write("node_modules/x.js", "x");

        project.cmd().args(["exists", "node_modules"]).assert().failure();
        project
            .cmd()
            .args(["store", "node_modules"])
            .assert()
            .success();
        project.cmd().args(["exists", "node_modules"]).assert().success();

        project.cmd().args(["clear", "node_modules"]).assert().success();
        project.cmd().args(["clear", "node_modules"]).assert().success();
        project.cmd().args(["exists", "node_modules"]).assert().failure();
    }

    #[test]
    fn load_missing_entry_succeeds() {
        let project = Project::new();
        project
            .cmd()
            .args(["load", "never-stored"])
            .assert()
            .success()
            .stderr(predicate::str::contains("No cache entry"));
    }

    #[test]
    fn escaping_path_is_rejected() {
        let project = Project::new();
        project.write("src/x", "x");

        project
            .cmd()
            .args(["store", "src", "--as", "../outside"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("escapes the cache root"));
    }

    #[test]
    fn archive_round_trip_prints_fingerprint() {
        let project = Project::new();
        project.write("public/assets/app.js", "js");

        project
            .cmd()
            .args(["archive", "store", "public/assets"])
            .assert()
            .success();
        assert!(project.root().join("public/assets.tar").is_file());

        fs::remove_dir_all(project.app().join("public")).unwrap();

        let output = project
            .cmd()
            .args(["archive", "load", "public/assets"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let restored = String::from_utf8(output).unwrap();
        assert_eq!(restored.trim().len(), 40);
        assert!(project.app().join("public/assets/app.js").is_file());

        project
            .cmd()
            .args(["archive", "store", "public/assets", "--if-changed", restored.trim()])
            .assert()
            .success()
            .stderr(predicate::str::contains("unchanged"));
    }

    #[test]
    fn archive_load_missing_prints_nothing() {
        let project = Project::new();
        project
            .cmd()
            .args(["archive", "load", "never-stored"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn fingerprint_json_output() {
        let project = Project::new();
        project.write("tmp/cache/a.txt", "a");

        project
            .cmd()
            .args(["fingerprint", "tmp/cache", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"fingerprint\":"));
    }

    #[test]
    fn config_path() {
        let project = Project::new();
        project
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let project = Project::new();
        project
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }
}
