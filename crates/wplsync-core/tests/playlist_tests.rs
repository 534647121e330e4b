//! Tests for WPL parsing and reference resolution

use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;
use wplsync_core::{Error, Playlist, PlaylistFormat};
use wplsync_test_utils::wpl_document;

const PLAYLIST: &str = r#"<?wpl version="1.0"?>
<smil>
    <head>
        <meta name="Generator" content="Microsoft Windows Media Player -- 12.0.19041.1"/>
        <meta name="ItemCount" content="3"/>
        <title>Rock &amp; Roll</title>
    </head>
    <body>
        <seq>
            <media src="..\Artist\Album\01 Intro.mp3" tid="{1}"/>
            <media tid="{2}"/>
            <media src="..\Artist\Album\02 Outro.mp3"/>
        </seq>
    </body>
</smil>
"#;

#[test]
fn parses_head_and_references() {
    let playlist = Playlist::parse(Path::new("/music/lists/rock.wpl"), PLAYLIST).unwrap();

    assert_eq!(playlist.title.as_deref(), Some("Rock & Roll"));
    assert_eq!(
        playlist.generator.as_deref(),
        Some("Microsoft Windows Media Player -- 12.0.19041.1")
    );
    assert_eq!(
        playlist.sources,
        vec![
            "..\\Artist\\Album\\01 Intro.mp3",
            "..\\Artist\\Album\\02 Outro.mp3"
        ]
    );
}

#[test]
fn byte_order_mark_is_ignored() {
    let content = format!("\u{feff}{}", wpl_document("Mix", &["a.mp3"]));

    let playlist = Playlist::parse(Path::new("/music/mix.wpl"), &content).unwrap();

    assert_eq!(playlist.title.as_deref(), Some("Mix"));
    assert_eq!(playlist.sources, vec!["a.mp3"]);
}

#[test]
fn missing_head_is_tolerated() {
    let content = "<smil><body><seq><media src=\"a.mp3\"/></seq></body></smil>";

    let playlist = Playlist::parse(Path::new("/music/mix.wpl"), content).unwrap();

    assert_eq!(playlist.title, None);
    assert_eq!(playlist.generator, None);
    assert_eq!(playlist.sources, vec!["a.mp3"]);
}

#[rstest]
#[case::no_sequence("<smil><head/><body/></smil>")]
#[case::not_xml("this is not a playlist")]
#[case::unclosed("<smil><body><seq>")]
fn malformed_documents_fail(#[case] content: &str) {
    let result = Playlist::parse(Path::new("/music/broken.wpl"), content);

    match result {
        Err(Error::PlaylistParse { path, .. }) => assert_eq!(path, Path::new("/music/broken.wpl")),
        other => panic!("Expected PlaylistParse error, got {:?}", other),
    }
}

#[test]
fn load_reports_missing_file() {
    let result = Playlist::load(Path::new("/definitely/not/here.wpl"));

    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("/definitely/not/here.wpl"),
        "Error should name the playlist, got: {}",
        err
    );
}

#[cfg(unix)]
#[test]
fn resolves_relative_references_against_playlist_folder() {
    let playlist = Playlist::parse(Path::new("/music/lists/rock.wpl"), PLAYLIST).unwrap();

    let resolved = playlist.resolve().unwrap();

    assert_eq!(
        resolved,
        vec![
            Path::new("/music/Artist/Album/01 Intro.mp3").to_path_buf(),
            Path::new("/music/Artist/Album/02 Outro.mp3").to_path_buf(),
        ]
    );
}

#[cfg(unix)]
#[test]
fn absolute_references_are_kept() {
    let content = wpl_document("Mix", &["/other/place/song.mp3", "./here.mp3"]);
    let playlist = Playlist::parse(Path::new("/music/mix.wpl"), &content).unwrap();

    let resolved = playlist.resolve().unwrap();

    assert_eq!(
        resolved,
        vec![
            Path::new("/other/place/song.mp3").to_path_buf(),
            Path::new("/music/here.mp3").to_path_buf(),
        ]
    );
}

#[rstest]
#[case("mix.wpl")]
#[case("MIX.WPL")]
#[case("dir/Mix.Wpl")]
fn wpl_extension_is_supported(#[case] path: &str) {
    assert_eq!(PlaylistFormat::from_path(Path::new(path)).unwrap(), PlaylistFormat::Wpl);
}

#[rstest]
#[case("mix.m3u", "m3u")]
#[case("mix.zpl", "zpl")]
#[case("mix", "")]
fn other_extensions_are_unsupported(#[case] path: &str, #[case] expected: &str) {
    match PlaylistFormat::from_path(Path::new(path)) {
        Err(Error::UnsupportedPlaylist { extension, .. }) => assert_eq!(extension, expected),
        other => panic!("Expected UnsupportedPlaylist error, got {:?}", other),
    }
}
