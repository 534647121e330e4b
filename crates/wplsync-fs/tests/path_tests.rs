use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::{Path, PathBuf};
use wplsync_fs::{RelativePath, canonicalize, is_within, paths_independent, resolve};

#[cfg(unix)]
#[rstest]
#[case("/music/./rock", "/music/rock")]
#[case("/music/rock/../jazz", "/music/jazz")]
#[case("/music//rock/", "/music/rock")]
#[case("/../music", "/music")]
fn test_canonicalize_collapses_dots(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(canonicalize(input).unwrap(), PathBuf::from(expected));
}

#[cfg(unix)]
#[test]
fn test_canonicalize_keeps_case() {
    assert_eq!(
        canonicalize("/Music/Artist/../Album/01 Track.MP3").unwrap(),
        PathBuf::from("/Music/Album/01 Track.MP3")
    );
}

#[cfg(windows)]
#[test]
fn test_canonicalize_keeps_case() {
    assert_eq!(
        canonicalize(r"C:\Music\Artist\..\Album\01 Track.MP3").unwrap(),
        PathBuf::from(r"C:\Music\Album\01 Track.MP3")
    );
}

#[test]
fn test_canonicalize_relative_is_absolute() {
    let path = canonicalize("some/relative/../path").unwrap();
    assert!(path.is_absolute());
    assert!(path.ends_with("some/path"));
}

#[test]
fn test_canonicalize_does_not_require_existence() {
    let path = canonicalize("/definitely/not/here/song.mp3").unwrap();
    assert!(path.ends_with("song.mp3"));
}

#[test]
fn test_paths_independent_nested_is_false() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("sub");
    assert!(!paths_independent(dir.path(), &sub).unwrap());
    assert!(!paths_independent(&sub, dir.path()).unwrap());
}

#[test]
fn test_paths_independent_same_is_false() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!paths_independent(dir.path(), dir.path().join(".")).unwrap());
}

#[test]
fn test_paths_independent_siblings_is_true() {
    let dir = tempfile::tempdir().unwrap();
    assert!(paths_independent(dir.path().join("a"), dir.path().join("b")).unwrap());
}

#[test]
fn test_paths_independent_common_prefix_is_true() {
    // "/x/music" is not a prefix of "/x/music2/" once a separator is appended
    let dir = tempfile::tempdir().unwrap();
    assert!(paths_independent(dir.path().join("music"), dir.path().join("music2")).unwrap());
}

#[test]
fn test_is_within() {
    let root = Path::new("/music");
    assert!(is_within(Path::new("/music/a.mp3"), root));
    assert!(is_within(Path::new("/music"), root));
    assert!(!is_within(Path::new("/music2/a.mp3"), root));
}

#[cfg(windows)]
#[test]
fn test_comparisons_ignore_case_on_windows() {
    let root = Path::new(r"C:\Music");
    assert!(is_within(Path::new(r"c:\music\Artist\a.mp3"), root));
    assert!(!paths_independent(r"C:\Music", r"c:\MUSIC\Player").unwrap());

    let key = RelativePath::from_root(Path::new(r"c:\music\Artist\a.mp3"), root).unwrap();
    assert_eq!(key.as_str(), "Artist/a.mp3");
}

#[test]
fn test_resolve_missing_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = resolve(dir.path().join("missing"));
    assert!(matches!(result, Err(wplsync_fs::Error::Io { .. })));
}

#[cfg(unix)]
#[test]
fn test_resolve_follows_symlinks() {
    let dir = tempfile::tempdir().unwrap();
    let real = dir.path().join("library").join("player");
    std::fs::create_dir_all(&real).unwrap();
    let link = dir.path().join("player_link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    // Lexically the link looks independent of the library
    let library = resolve(dir.path().join("library")).unwrap();
    assert!(paths_independent(&library, &link).unwrap());

    let resolved = resolve(&link).unwrap();
    assert_eq!(resolved, resolve(&real).unwrap());
    assert!(!paths_independent(&library, &resolved).unwrap());
}

#[rstest]
#[case("a/b/c.mp3", "a/b/c.mp3")]
#[case("./a/b.mp3", "a/b.mp3")]
#[case("a/x/../b.mp3", "a/b.mp3")]
#[case("/a/b.mp3", "a/b.mp3")]
fn test_relative_path_new(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(RelativePath::new(input).as_str(), expected);
}

#[test]
fn test_relative_path_from_root() {
    let key = RelativePath::from_root(Path::new("/music/rock/a.mp3"), Path::new("/music")).unwrap();
    assert_eq!(key.as_str(), "rock/a.mp3");
}

#[test]
fn test_relative_path_from_root_keeps_case() {
    let key =
        RelativePath::from_root(Path::new("/Music/Artist/Album/01.mp3"), Path::new("/Music"))
            .unwrap();
    assert_eq!(key.as_str(), "Artist/Album/01.mp3");
}

#[test]
fn test_relative_path_from_root_outside_fails() {
    let result = RelativePath::from_root(Path::new("/other/a.mp3"), Path::new("/music"));
    assert!(matches!(result, Err(wplsync_fs::Error::OutsideRoot { .. })));
}

#[test]
#[cfg(unix)]
fn test_relative_path_external() {
    let key = RelativePath::external(Path::new("/data/other/song.mp3"));
    assert_eq!(key.as_str(), "external/data/other/song.mp3");
}

#[test]
fn test_relative_path_to_native_round_trips_through_root() {
    let root = Path::new("/target");
    let key = RelativePath::new("rock/a.mp3");
    let native = key.to_native(root);
    assert_eq!(RelativePath::from_root(&native, root).unwrap(), key);
}

#[test]
fn test_relative_path_parent_and_name() {
    let key = RelativePath::new("rock/album/a.mp3");
    assert_eq!(key.file_name(), Some("a.mp3"));
    assert_eq!(key.parent().unwrap().as_str(), "rock/album");
}
