use super::*;

#[test]
fn main_path_joins_to_namespace() {
    let root = ArtifactName::new("game");
    assert_eq!(root.join(&ModulePath::main()), root);
}

#[test]
fn relative_path_is_appended() {
    let root = ArtifactName::new("game");
    let name = root.join(&ModulePath::from_dotted("Player.Sprite"));
    assert_eq!(name.as_str(), "game.Player.Sprite");
}

#[test]
fn empty_namespace_uses_relative_path() {
    let root = ArtifactName::new("");
    let name = root.join(&ModulePath::from_dotted("List"));
    assert_eq!(name.as_str(), "List");
    assert_eq!(root.member("map"), "map");
}

#[test]
fn dotted_path_ignores_empty_segments() {
    let path = ModulePath::from_dotted("A..B.");
    assert_eq!(path.segments(), ["A", "B"]);
    assert_eq!(path.to_string(), "A.B");
    assert!(ModulePath::from_dotted("").is_main());
}
