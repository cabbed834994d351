use std::path::{Path, PathBuf};

use crate::settings::*;

#[test]
fn solution_lists_packages() {
    let settings = SolutionSettings::from_toml(
        r#"
        Name = "arcade"
        Packages = ["game", "engine"]
        "#,
    )
    .unwrap();

    assert_eq!(settings.name, "arcade");
    let dirs = settings.package_dirs(Path::new("/work"));
    assert_eq!(dirs, [Path::new("/work/game"), Path::new("/work/engine")]);
}

#[test]
fn package_modules_use_pascal_case_tables() {
    let settings = PackageSettings::from_toml(
        r#"
        Name = "game"

        [[Module]]
        Name = "Engine"
        Path = "../engine/src"
        "#,
    )
    .unwrap();

    assert_eq!(settings.name, "game");
    assert_eq!(
        settings.modules,
        [ModuleRoot {
            name: "Engine".into(),
            path: "../engine/src".into(),
        }]
    );
}

#[test]
fn package_without_modules_is_valid() {
    let settings = PackageSettings::from_toml(r#"Name = "tiny""#).unwrap();
    assert!(settings.modules.is_empty());
}

#[test]
fn environment_lists_packages() {
    let env = EnvironmentSettings::from_toml(
        r#"
        Version = "0.1.3"

        [[Package]]
        Name = "Gfx"
        Path = "/opt/swamp/gfx"
        "#,
    )
    .unwrap();

    assert_eq!(env.version, "0.1.3");
    let roots = env.package_roots(Path::new("/home/u")).unwrap();
    assert_eq!(roots, [("Gfx".to_string(), PathBuf::from("/opt/swamp/gfx"))]);
}

#[test]
fn missing_name_is_a_parse_error() {
    assert!(SolutionSettings::from_toml("Packages = []").is_err());
}

#[test]
fn load_reports_path_on_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SOLUTION_FILE_NAME);
    std::fs::write(&path, "Name = ").unwrap();

    let err = SolutionSettings::load(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse { .. }));
    assert!(err.to_string().contains("solution.toml"));
}

#[test]
fn package_file_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(PackageSettings::load_from_dir(dir.path()).unwrap(), None);

    std::fs::write(dir.path().join(PACKAGE_FILE_NAME), "Name = \"game\"").unwrap();
    let settings = PackageSettings::load_from_dir(dir.path()).unwrap().unwrap();
    assert_eq!(settings.name, "game");
}

fn fake_env(name: &str) -> Option<String> {
    match name {
        "ENGINE_HOME" => Some("/opt/engine".into()),
        "SUB" => Some("src".into()),
        _ => None,
    }
}

#[test]
fn expand_plain_variable() {
    let path = expand_path_with("$ENGINE_HOME/src", Path::new("/pkg"), fake_env).unwrap();
    assert_eq!(path, Path::new("/opt/engine/src"));
}

#[test]
fn expand_braced_variable_relative_to_base() {
    let path = expand_path_with("lib/${SUB}", Path::new("/pkg"), fake_env).unwrap();
    assert_eq!(path, Path::new("/pkg/lib/src"));
}

#[test]
fn expand_unknown_variable_fails() {
    let err = expand_path_with("$NOPE/x", Path::new("/pkg"), fake_env).unwrap_err();
    assert!(matches!(err, SettingsError::UndefinedVariable(name) if name == "NOPE"));
}

#[test]
fn expand_unterminated_brace_fails() {
    let err = expand_path_with("${SUB", Path::new("/pkg"), fake_env).unwrap_err();
    assert!(matches!(err, SettingsError::UnterminatedVariable(_)));
}

#[test]
fn lone_dollar_is_kept() {
    let path = expand_path_with("a$/b", Path::new("/pkg"), fake_env).unwrap();
    assert_eq!(path, Path::new("/pkg/a$/b"));
}
