use std::fs;
use std::path::Path;

use indoc::indoc;

use crate::backend::{CodeGenerator, TypeInfoPackGenerator, Verbosity};
use crate::diagnostics::DiagnosticKind;
use crate::driver::{BuildError, build, build_package};
use crate::session::Session;

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn session() -> Session {
    Session::new().expect("prelude compiles")
}

#[test]
fn package_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("package.toml"), "Name = \"game\"\n");
    write(
        &dir.path().join("main.swamp"),
        indoc! {"
            import Player

            start : Int
            start = Player.speed * 2
        "},
    );
    write(&dir.path().join("player.swamp"), "speed : Int\nspeed = 3\n");

    let mut session = session();
    let report = build_package(&mut session, dir.path());

    assert!(report.is_success(), "{:?}", report.errors);
    let package = report.package("game").expect("package is named by package.toml");
    let artifacts: Vec<_> = package.iter().map(|m| m.artifact.as_str()).collect();
    assert_eq!(artifacts, ["game.Player", "game"]);
}

#[test]
fn package_without_settings_is_named_by_directory() {
    let dir = tempfile::tempdir().unwrap();
    let package_dir = dir.path().join("arcade");
    write(&package_dir.join("main.swamp"), "value = 1\n");

    let mut session = session();
    let report = build(&mut session, &package_dir).unwrap();

    assert!(report.is_success());
    assert!(report.package("arcade").is_some());
}

#[test]
fn solution_builds_every_package() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("solution.toml"),
        "Name = \"arcade\"\nPackages = [\"game\", \"tools\"]\n",
    );
    write(&dir.path().join("game/package.toml"), "Name = \"game\"\n");
    write(&dir.path().join("game/main.swamp"), "value = 1\n");
    write(&dir.path().join("tools/package.toml"), "Name = \"tools\"\n");
    write(&dir.path().join("tools/main.swamp"), "value = missing\n");

    let mut session = session();
    let report = build(&mut session, dir.path()).unwrap();

    let names: Vec<_> = report.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["game", "tools"]);
    assert!(!report.is_success());
    assert_eq!(report.diagnostics.kinds(), vec![DiagnosticKind::UnknownIdentifier]);
    assert!(report.errors.is_empty());
}

#[test]
fn solution_with_a_missing_package() {
    let dir = tempfile::tempdir().unwrap();
    let solution = dir.path().join("solution.toml");
    write(&solution, "Name = \"arcade\"\nPackages = [\"gone\"]\n");

    let mut session = session();
    let report = build(&mut session, &solution).unwrap();

    assert!(!report.is_success());
    assert!(matches!(report.errors.as_slice(), [BuildError::Repository { .. }]));
}

#[test]
fn malformed_package_settings_are_diagnosed() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("package.toml"), "Name = \n");
    write(&dir.path().join("main.swamp"), "value = 1\n");

    let mut session = session();
    let report = build_package(&mut session, dir.path());

    assert_eq!(report.diagnostics.kinds(), vec![DiagnosticKind::SettingsError]);
    assert!(report.packages.is_empty());
}

#[test]
fn import_cycle_is_a_diagnostic_only() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("main.swamp"), "import A\n\nvalue = 1\n");
    write(&dir.path().join("a.swamp"), "import B\n\na = 1\n");
    write(&dir.path().join("b.swamp"), "import A\n\nb = 1\n");

    let mut session = session();
    let report = build_package(&mut session, dir.path());

    assert!(report.errors.is_empty());
    assert_eq!(
        report.diagnostics.kinds(),
        vec![DiagnosticKind::CircularDependencyDetected]
    );
}

#[test]
fn unknown_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session();

    let err = build(&mut session, &dir.path().join("nothing")).unwrap_err();
    assert!(matches!(err, BuildError::NotFound(_)));
}

#[test]
fn type_info_pack_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let package_dir = dir.path().join("game");
    write(&package_dir.join("package.toml"), "Name = \"game\"\n");
    write(
        &package_dir.join("main.swamp"),
        indoc! {"
            type alias Position =
                { x : Int
                , y : Int
                }

            origin : Position
            origin = { x = 0, y = 0 }
        "},
    );

    let mut session = session();
    let report = build_package(&mut session, &package_dir);
    assert!(report.is_success());
    let package = report.package("game").unwrap();

    let out = dir.path().join("out");
    let mut generator = TypeInfoPackGenerator::new("types.swamp-typeinfo");
    generator
        .generate_from_package(&mut session, package, &out, "game", Verbosity::Verbose)
        .expect("pack is written");

    let bytes = fs::read(out.join("game").join(generator.file_name())).unwrap();
    let chunk = swamp_typeinfo::TypeInfoChunk::from_bytes(&bytes).expect("pack reads back");
    assert!(!chunk.is_empty());
}
