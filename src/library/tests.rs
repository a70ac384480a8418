use super::model::{UNKNOWN_ARTIST, stream_url, track_id};
use super::overrides::{OverrideEntry, Overrides, load_overrides};
use super::resolve::{resolve, strip_extension};
use super::scan::{audio_extension, scan, scan_with};
use super::tags::EmbeddedTags;
use crate::config::LibrarySettings;
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn entry(filename: &str, title: &str, artist: &str) -> OverrideEntry {
    OverrideEntry {
        filename: filename.into(),
        title: Some(title.into()),
        artist: Some(artist.into()),
        album: None,
        cover: None,
        duration: None,
        genre: None,
    }
}

fn tagged(title: &str, artist: &str) -> EmbeddedTags {
    EmbeddedTags {
        title: Some(title.into()),
        artist: Some(artist.into()),
        ..EmbeddedTags::default()
    }
}

#[test]
fn audio_extension_matches_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert_eq!(audio_extension("a.mp3", &settings).as_deref(), Some("mp3"));
    assert_eq!(audio_extension("a.MP3", &settings).as_deref(), Some("mp3"));
    assert_eq!(audio_extension("a.b.Opus", &settings).as_deref(), Some("opus"));
    assert_eq!(audio_extension("a.m4a", &settings).as_deref(), Some("m4a"));
    assert_eq!(audio_extension(".flac", &settings).as_deref(), Some("flac"));
    assert_eq!(audio_extension("a.txt", &settings), None);
    assert_eq!(audio_extension("mp3", &settings), None);
    assert_eq!(audio_extension("a.", &settings), None);
}

#[test]
fn track_id_is_a_pure_function_of_the_path() {
    assert_eq!(track_id("Album/01 Intro.mp3"), "Album_01_Intro_mp3");
    assert_eq!(track_id("Album/01 Intro.mp3"), track_id("Album/01 Intro.mp3"));
}

#[test]
fn track_id_can_collide_for_distinct_paths() {
    // Sanitization is lossy: ids are not a uniqueness guarantee.
    assert_eq!(track_id("a-b.mp3"), track_id("a_b.mp3"));
    assert_eq!(track_id("x/y.mp3"), track_id("x y.mp3"));
}

#[test]
fn stream_url_percent_encodes_the_relative_path() {
    assert_eq!(
        stream_url("Album One/track 1.mp3"),
        "/api/music/stream?file=Album%20One%2Ftrack%201.mp3"
    );
}

#[test]
fn strip_extension_removes_only_the_last_extension() {
    assert_eq!(strip_extension("song.final.mp3"), "song.final");
    assert_eq!(strip_extension("song"), "song");
    assert_eq!(strip_extension(".mp3"), ".mp3");
}

#[test]
fn resolve_prefers_override_then_tags_then_fallback() {
    let e = OverrideEntry {
        album: Some("Override Album".into()),
        ..entry("a.mp3", "Override", "")
    };
    let t = EmbeddedTags {
        album_artist: Some("Band".into()),
        album: Some("Tag Album".into()),
        genre: Some("Jazz".into()),
        duration: Some(181.0),
        ..tagged("", "")
    };

    let meta = resolve("a.mp3", Some(&e), Some(&t));
    assert_eq!(meta.title, "Override");
    // Blank override and tag artists fall through to the album artist.
    assert_eq!(meta.artist, "Band");
    assert_eq!(meta.album.as_deref(), Some("Override Album"));
    assert_eq!(meta.genre.as_deref(), Some("Jazz"));
    assert_eq!(meta.duration, Some(181.0));
    assert_eq!(meta.cover, None);
}

#[test]
fn resolve_without_any_metadata_uses_file_name_and_unknown_artist() {
    let meta = resolve("Some Song.flac", None, None);
    assert_eq!(meta.title, "Some Song");
    assert_eq!(meta.artist, UNKNOWN_ARTIST);
    assert_eq!(meta.album, None);
    assert_eq!(meta.duration, None);
}

#[test]
fn load_overrides_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let overrides = load_overrides(&dir.path().join("music-metadata.json"));
    assert!(overrides.is_empty());
}

#[test]
fn load_overrides_malformed_file_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("music-metadata.json");

    fs::write(&path, b"{ not json").unwrap();
    assert!(load_overrides(&path).is_empty());

    // Valid JSON, wrong shape.
    fs::write(&path, br#"{"filename": "a.mp3"}"#).unwrap();
    assert!(load_overrides(&path).is_empty());
}

#[test]
fn load_overrides_indexes_entries_and_last_duplicate_wins() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("music-metadata.json");
    fs::write(
        &path,
        br#"[
            {"filename": "a.mp3", "title": "First", "artist": "X"},
            {"filename": "b.mp3", "title": "B", "artist": "Y", "duration": 215.5, "genre": "Rock"},
            {"filename": "a.mp3", "title": "Second", "artist": "X"}
        ]"#,
    )
    .unwrap();

    let overrides = load_overrides(&path);
    assert_eq!(overrides.len(), 2);
    assert_eq!(
        overrides.lookup("a.mp3", "a.mp3").unwrap().title.as_deref(),
        Some("Second")
    );
    let b = overrides.lookup("sub/b.mp3", "b.mp3").unwrap();
    assert_eq!(b.duration, Some(215.5));
    assert_eq!(b.genre.as_deref(), Some("Rock"));
}

#[test]
fn lookup_prefers_relative_path_keys_over_bare_names() {
    let overrides = Overrides::from_entries([
        entry("intro.mp3", "Generic Intro", "A"),
        entry("Live/intro.mp3", "Live Intro", "A"),
    ]);

    assert_eq!(
        overrides.lookup("Live/intro.mp3", "intro.mp3").unwrap().title.as_deref(),
        Some("Live Intro")
    );
    assert_eq!(
        overrides.lookup("Studio/intro.mp3", "intro.mp3").unwrap().title.as_deref(),
        Some("Generic Intro")
    );
}

#[test]
fn scan_describes_every_supported_file_with_its_size() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("Album One");
    fs::create_dir_all(&sub).unwrap();

    fs::write(dir.path().join("a.mp3"), vec![0u8; 10]).unwrap();
    fs::write(dir.path().join("b.ogg"), vec![0u8; 20]).unwrap();
    fs::write(sub.join("c.FLAC"), vec![0u8; 30]).unwrap();
    fs::write(sub.join("d.wav"), vec![0u8; 40]).unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();
    fs::write(dir.path().join("README"), b"ignore me too").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default(), &Overrides::default());
    assert_eq!(tracks.len(), 4);

    let c = tracks
        .iter()
        .find(|t| t.filename == "c.FLAC")
        .expect("nested file is scanned");
    assert_eq!(c.relative_path, "Album One/c.FLAC");
    assert_eq!(c.id, "Album_One_c_FLAC");
    assert_eq!(c.format, "flac");
    assert_eq!(c.size_bytes, 30);
    assert_eq!(c.stream_url, "/api/music/stream?file=Album%20One%2Fc.FLAC");

    for t in &tracks {
        let on_disk = fs::metadata(dir.path().join(&t.relative_path)).unwrap().len();
        assert_eq!(t.size_bytes, on_disk);
    }
}

#[test]
fn scan_override_wins_and_skips_tag_parsing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("song.mp3"), b"not a real mp3").unwrap();

    let overrides = Overrides::from_entries([OverrideEntry {
        filename: "song.mp3".into(),
        title: Some("Override Title".into()),
        artist: Some("Override Artist".into()),
        album: Some("Override Album".into()),
        cover: Some("/covers/song.jpg".into()),
        duration: Some(200.0),
        genre: Some("Ambient".into()),
    }]);

    let calls = Cell::new(0);
    let tracks = scan_with(dir.path(), &LibrarySettings::default(), &overrides, |_| {
        calls.set(calls.get() + 1);
        Ok(tagged("Tagged Title", "Tagged Artist"))
    });

    assert_eq!(calls.get(), 0);
    assert_eq!(tracks.len(), 1);
    let t = &tracks[0];
    assert_eq!(t.title, "Override Title");
    assert_eq!(t.artist, "Override Artist");
    assert_eq!(t.album.as_deref(), Some("Override Album"));
    assert_eq!(t.cover.as_deref(), Some("/covers/song.jpg"));
    assert_eq!(t.duration, Some(200.0));
    assert_eq!(t.genre.as_deref(), Some("Ambient"));
}

#[test]
fn scan_uses_embedded_tags_when_no_override_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("song.mp3"), b"bytes").unwrap();

    let tracks = scan_with(
        dir.path(),
        &LibrarySettings::default(),
        &Overrides::default(),
        |_| Ok(tagged("Tagged Title", "Tagged Artist")),
    );

    assert_eq!(tracks[0].title, "Tagged Title");
    assert_eq!(tracks[0].artist, "Tagged Artist");
}

#[test]
fn scan_keeps_corrupt_files_with_fallback_metadata() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("good.mp3"), b"fine").unwrap();
    fs::write(dir.path().join("broken track.ogg"), b"\x00\x01garbage").unwrap();
    fs::write(dir.path().join("other.wav"), b"fine").unwrap();

    // Real tag reader: none of these files parse.
    let tracks = scan(dir.path(), &LibrarySettings::default(), &Overrides::default());
    assert_eq!(tracks.len(), 3);

    let broken = tracks
        .iter()
        .find(|t| t.filename == "broken track.ogg")
        .unwrap();
    assert_eq!(broken.title, "broken track");
    assert_eq!(broken.artist, UNKNOWN_ARTIST);
    assert_eq!(broken.size_bytes, 9);
}

#[test]
fn scan_missing_root_yields_empty_catalog() {
    let dir = tempdir().unwrap();
    let tracks = scan(
        &dir.path().join("does-not-exist"),
        &LibrarySettings::default(),
        &Overrides::default(),
    );
    assert!(tracks.is_empty());
}

#[test]
fn scan_respects_include_hidden_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        include_hidden: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings, &Overrides::default());

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "visible");
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings, &Overrides::default());
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "root");
}

#[test]
fn scan_respects_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    fs::write(d1.join("one.mp3"), b"not real").unwrap();
    fs::write(d2.join("two.mp3"), b"not real").unwrap();

    // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
    let settings = LibrarySettings {
        max_depth: Some(2),
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings, &Overrides::default());

    let names: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert!(names.contains(&"root"));
    assert!(names.contains(&"one"));
    assert!(!names.contains(&"two"));
}

#[test]
fn build_catalog_reads_the_sidecar_under_the_root() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"not real").unwrap();
    fs::write(
        dir.path().join("music-metadata.json"),
        br#"[{"filename": "a.mp3", "title": "From Sidecar", "artist": "Someone"}]"#,
    )
    .unwrap();

    let settings = LibrarySettings {
        root: dir.path().to_path_buf(),
        ..LibrarySettings::default()
    };
    let tracks = super::build_catalog(&settings);

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "From Sidecar");
    assert_eq!(tracks[0].artist, "Someone");
    assert!(Path::new(&tracks[0].relative_path).is_relative());
}

#[cfg(unix)]
#[test]
fn scan_skips_symlinks_that_leave_the_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("library");
    let nas = dir.path().join("nas");
    fs::create_dir_all(root.join("Local")).unwrap();
    fs::create_dir_all(&nas).unwrap();
    fs::write(nas.join("song.mp3"), b"elsewhere").unwrap();
    fs::write(root.join("Local/kept.mp3"), b"here").unwrap();
    std::os::unix::fs::symlink(&nas, root.join("Album")).unwrap();
    // A link that stays inside the library is still listed.
    std::os::unix::fs::symlink(root.join("Local"), root.join("Alias")).unwrap();

    let tracks = scan(&root, &LibrarySettings::default(), &Overrides::default());

    let paths: Vec<&str> = tracks.iter().map(|t| t.relative_path.as_str()).collect();
    assert_eq!(paths, vec!["Alias/kept.mp3", "Local/kept.mp3"]);
}

#[test]
fn scan_matches_path_keys_before_bare_names_for_repeated_filenames() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("Live")).unwrap();
    fs::create_dir_all(dir.path().join("Studio")).unwrap();
    fs::write(dir.path().join("Live/intro.mp3"), b"live").unwrap();
    fs::write(dir.path().join("Studio/intro.mp3"), b"studio").unwrap();

    let overrides = Overrides::from_entries([
        entry("intro.mp3", "Generic Intro", "Band"),
        entry("Live/intro.mp3", "Live Intro", "Band"),
    ]);
    let tracks = scan(dir.path(), &LibrarySettings::default(), &overrides);

    let title_of = |rel: &str| {
        tracks
            .iter()
            .find(|t| t.relative_path == rel)
            .map(|t| t.title.clone())
    };
    assert_eq!(tracks.len(), 2);
    assert_eq!(title_of("Live/intro.mp3").as_deref(), Some("Live Intro"));
    assert_eq!(title_of("Studio/intro.mp3").as_deref(), Some("Generic Intro"));
}

#[test]
fn resolve_keeps_override_text_as_written() {
    let e = OverrideEntry {
        album: Some("  Side A ".into()),
        ..entry("a.mp3", " Padded Title ", "Artist ")
    };

    let meta = resolve("a.mp3", Some(&e), None);
    assert_eq!(meta.title, " Padded Title ");
    assert_eq!(meta.artist, "Artist ");
    assert_eq!(meta.album.as_deref(), Some("  Side A "));
}
