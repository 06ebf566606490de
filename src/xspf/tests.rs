use std::fs;

use super::*;
use crate::error::Error;
use crate::session::UnresolvedPolicy;

const DOC_BASE: &str = "http://example.com/lists/mix.xspf";

fn uri(s: &str) -> Uri {
    Uri::parse(s).unwrap()
}

fn read(xml: &str) -> ReadOutcome {
    read_str(xml, Some(uri(DOC_BASE)), &ReadOptions::default()).unwrap()
}

fn skip_options() -> ReadOptions {
    ReadOptions {
        invalid_field: InvalidFieldPolicy::Skip,
        ..ReadOptions::default()
    }
}

// ============================================================================
// Reading
// ============================================================================

#[test]
fn test_read_relative_uris() {
    let outcome = read(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<playlist version="1" xmlns="http://xspf.org/ns/0/">
  <title>Mix &amp; Match</title>
  <info>../about.html</info>
  <license>http://creativecommons.org/licenses/by/4.0/</license>
  <trackList>
    <track>
      <location>songs/a.ogg</location>
      <title>A</title>
      <trackNum>3</trackNum>
      <duration>1000</duration>
    </track>
  </trackList>
</playlist>"#,
    );

    let playlist = outcome.playlist;
    assert!(outcome.skipped.is_empty());
    assert_eq!(playlist.version, 1);
    assert_eq!(playlist.title.as_deref(), Some("Mix & Match"));
    assert_eq!(playlist.info, Some(uri("http://example.com/about.html")));
    assert_eq!(
        playlist.license,
        Some(uri("http://creativecommons.org/licenses/by/4.0/"))
    );

    let track = &playlist.tracks[0];
    assert_eq!(track.locations, vec![uri("http://example.com/lists/songs/a.ogg")]);
    assert_eq!(track.title.as_deref(), Some("A"));
    assert_eq!(track.track_num, Some(3));
    assert_eq!(track.duration, Some(1000));
}

#[test]
fn test_read_nested_xml_base() {
    let outcome = read(
        r#"<playlist version="1" xmlns="http://xspf.org/ns/0/" xml:base="http://a.org/root/">
  <location>self.xspf</location>
  <trackList xml:base="media/">
    <track xml:base="rock/">
      <location>one.ogg</location>
      <location xml:base="/other/">two.ogg</location>
      <image>../cover.png</image>
    </track>
    <track>
      <location>three.ogg</location>
    </track>
  </trackList>
  <link rel="http://a.org/rel/next">after.html</link>
</playlist>"#,
    );

    let playlist = outcome.playlist;
    assert_eq!(playlist.location, Some(uri("http://a.org/root/self.xspf")));

    let rock = &playlist.tracks[0];
    assert_eq!(
        rock.locations,
        vec![
            uri("http://a.org/root/media/rock/one.ogg"),
            uri("http://a.org/other/two.ogg"),
        ]
    );
    assert_eq!(rock.image, Some(uri("http://a.org/root/media/cover.png")));

    // Sibling of an overriding element sees the parent's base again.
    assert_eq!(
        playlist.tracks[1].locations,
        vec![uri("http://a.org/root/media/three.ogg")]
    );

    // After trackList closes, the root override is back in effect.
    assert_eq!(
        playlist.links,
        vec![Link {
            rel: uri("http://a.org/rel/next"),
            content: uri("http://a.org/root/after.html"),
        }]
    );
}

#[test]
fn test_rel_resolves_against_own_xml_base() {
    let outcome = read(
        r#"<playlist version="1" xmlns="http://xspf.org/ns/0/">
  <meta xml:base="http://ns.example/terms/" rel="mood">calm</meta>
  <trackList>
    <track>
      <link rel="http://ns.example/terms/lyrics" xml:base="http://lyrics.example/">a.txt</link>
    </track>
  </trackList>
</playlist>"#,
    );

    let playlist = outcome.playlist;
    assert_eq!(
        playlist.metas,
        vec![Meta {
            rel: uri("http://ns.example/terms/mood"),
            content: "calm".to_string(),
        }]
    );
    assert_eq!(
        playlist.tracks[0].links[0].content,
        uri("http://lyrics.example/a.txt")
    );
}

#[test]
fn test_attribution_keeps_order() {
    let outcome = read(
        r#"<playlist version="1" xmlns="http://xspf.org/ns/0/">
  <attribution>
    <identifier>urn:x-list:42</identifier>
    <location>older.xspf</location>
  </attribution>
  <trackList/>
</playlist>"#,
    );

    assert_eq!(
        outcome.playlist.attribution,
        vec![
            Attribution::Identifier(uri("urn:x-list:42")),
            Attribution::Location(uri("http://example.com/lists/older.xspf")),
        ]
    );
}

#[test]
fn test_extension_is_tracked_but_ignored() {
    let outcome = read(
        r#"<playlist version="1" xmlns="http://xspf.org/ns/0/">
  <trackList>
    <track>
      <extension application="http://ext.example/">
        <clip xml:base="http://elsewhere/"><location>x.ogg</location></clip>
      </extension>
      <location>b.ogg</location>
    </track>
  </trackList>
</playlist>"#,
    );

    assert_eq!(
        outcome.playlist.tracks[0].locations,
        vec![uri("http://example.com/lists/b.ogg")]
    );
}

#[test]
fn test_foreign_namespace_elements_ignored() {
    let outcome = read(
        r#"<playlist version="1" xmlns="http://xspf.org/ns/0/" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <title>Right</title>
  <dc:title>Wrong</dc:title>
  <dc:source xml:base="http://elsewhere/"><location>x.ogg</location></dc:source>
  <trackList>
    <track><dc:location>y.ogg</dc:location><location>a.ogg</location></track>
  </trackList>
</playlist>"#,
    );

    assert_eq!(outcome.playlist.title.as_deref(), Some("Right"));
    assert_eq!(outcome.playlist.location, None);
    assert_eq!(
        outcome.playlist.tracks[0].locations,
        vec![uri("http://example.com/lists/a.ogg")]
    );
}

#[test]
fn test_prefixed_xspf_namespace() {
    let outcome = read(
        r#"<x:playlist version="1" xmlns:x="http://xspf.org/ns/0/">
  <x:title>Mix</x:title>
  <x:trackList><x:track><x:location>a.ogg</x:location></x:track></x:trackList>
</x:playlist>"#,
    );

    assert_eq!(outcome.playlist.title.as_deref(), Some("Mix"));
    assert_eq!(
        outcome.playlist.tracks[0].locations,
        vec![uri("http://example.com/lists/a.ogg")]
    );

    let err = read_str(
        r#"<playlist xmlns="http://example.com/other"/>"#,
        Some(uri(DOC_BASE)),
        &ReadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Structure(_)));
}

#[test]
fn test_empty_elements_open_and_close_scopes() {
    let outcome = read(
        r#"<playlist version="1" xmlns="http://xspf.org/ns/0/">
  <trackList>
    <track><title xml:base="http://other/"/><location>c.ogg</location></track>
  </trackList>
</playlist>"#,
    );

    let track = &outcome.playlist.tracks[0];
    assert_eq!(track.title.as_deref(), Some(""));
    assert_eq!(track.locations, vec![uri("http://example.com/lists/c.ogg")]);
}

#[test]
fn test_invalid_location_aborts_by_default() {
    let xml = r#"<playlist version="1"><trackList><track>
      <location>a b.ogg</location>
    </track></trackList></playlist>"#;

    let err = read_str(xml, Some(uri(DOC_BASE)), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidUriSyntax { .. }));
}

#[test]
fn test_invalid_fields_skipped() {
    let xml = r#"<playlist version="1"><trackList><track>
      <location>a b.ogg</location>
      <location>ok.ogg</location>
      <trackNum>three</trackNum>
    </track></trackList></playlist>"#;

    let outcome = read_str(xml, Some(uri(DOC_BASE)), &skip_options()).unwrap();
    let track = &outcome.playlist.tracks[0];
    assert_eq!(track.locations, vec![uri("http://example.com/lists/ok.ogg")]);
    assert_eq!(track.track_num, None);

    let skipped: Vec<_> = outcome.skipped.iter().map(|s| s.element.as_str()).collect();
    assert_eq!(skipped, ["location", "trackNum"]);
    assert_eq!(outcome.skipped[0].value, "a b.ogg");
}

#[test]
fn test_invalid_xml_base_skipped_keeps_parent_base() {
    let xml = r#"<playlist version="1"><trackList>
      <track xml:base="bad base/"><location>d.ogg</location></track>
    </trackList></playlist>"#;

    let outcome = read_str(xml, Some(uri(DOC_BASE)), &skip_options()).unwrap();
    assert_eq!(outcome.skipped[0].element, "xml:base");
    assert_eq!(
        outcome.playlist.tracks[0].locations,
        vec![uri("http://example.com/lists/d.ogg")]
    );
}

#[test]
fn test_lenient_encodes_illegal_characters() {
    let options = ReadOptions {
        resolve: crate::session::ResolveOptions {
            lenient: true,
            ..Default::default()
        },
        ..ReadOptions::default()
    };
    let xml = r#"<playlist version="1"><trackList><track>
      <location>My Song.ogg</location>
    </track></trackList></playlist>"#;

    let outcome = read_str(xml, Some(uri(DOC_BASE)), &options).unwrap();
    assert_eq!(
        outcome.playlist.tracks[0].locations,
        vec![uri("http://example.com/lists/My%20Song.ogg")]
    );
}

#[test]
fn test_unbound_document() {
    let xml = r#"<playlist version="1"><trackList><track>
      <location>a.ogg</location>
      <location>http://x/b.ogg</location>
    </track></trackList></playlist>"#;

    let err = read_str(xml, None, &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Unresolvable(_)));

    let options = ReadOptions {
        resolve: crate::session::ResolveOptions {
            unresolved: UnresolvedPolicy::KeepRelative,
            ..Default::default()
        },
        ..ReadOptions::default()
    };
    let outcome = read_str(xml, None, &options).unwrap();
    assert_eq!(
        outcome.playlist.tracks[0].locations,
        vec![uri("a.ogg"), uri("http://x/b.ogg")]
    );
}

#[test]
fn test_root_must_be_playlist() {
    let err = read_str("<list/>", Some(uri(DOC_BASE)), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Structure(_)));

    let err = read_str("", Some(uri(DOC_BASE)), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Structure(_)));
}

#[test]
fn test_malformed_xml() {
    let err = read_str(
        "<playlist><title></playlist>",
        Some(uri(DOC_BASE)),
        &ReadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Malformed { .. }));
}

#[test]
fn test_read_file_uses_file_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.xspf");
    fs::write(
        &path,
        r#"<playlist version="1"><trackList><track><location>a.ogg</location></track></trackList></playlist>"#,
    )
    .unwrap();

    let outcome = read_file(&path, None, &ReadOptions::default()).unwrap();
    let expected = Uri::from_file_path(&fs::canonicalize(dir.path()).unwrap().join("a.ogg")).unwrap();
    assert_eq!(outcome.playlist.tracks[0].locations, vec![expected]);

    let outcome = read_file(&path, Some(uri("http://mirror/lists/")), &ReadOptions::default()).unwrap();
    assert_eq!(
        outcome.playlist.tracks[0].locations,
        vec![uri("http://mirror/lists/a.ogg")]
    );
}

#[test]
fn test_read_file_with_reserved_path_characters() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("Music [FLAC]");
    fs::create_dir(&folder).unwrap();
    let xml = r#"<playlist version="1"><trackList><track><location>a.ogg</location></track></trackList></playlist>"#;

    for name in ["list.xspf", "a|b^c.xspf"] {
        let path = folder.join(name);
        fs::write(&path, xml).unwrap();

        let outcome = read_file(&path, None, &ReadOptions::default()).unwrap();
        let location = &outcome.playlist.tracks[0].locations[0];
        assert!(location.path().ends_with("/Music%20%5BFLAC%5D/a.ogg"));
        assert_eq!(
            *location,
            Uri::from_file_path(&fs::canonicalize(&folder).unwrap().join("a.ogg")).unwrap()
        );
    }
}

// ============================================================================
// Writing
// ============================================================================

fn sample() -> Playlist {
    Playlist {
        title: Some("Rock & Roll".to_string()),
        info: Some(uri("http://example.com/about.html")),
        links: vec![Link {
            rel: uri("http://example.com/rel/next"),
            content: uri("http://example.com/lists/next.xspf"),
        }],
        tracks: vec![
            Track {
                locations: vec![uri("http://example.com/music/a.ogg")],
                title: Some("A".to_string()),
                track_num: Some(1),
                duration: Some(215_000),
                ..Track::default()
            },
            Track {
                locations: vec![uri("http://cdn.example/b.ogg")],
                metas: vec![Meta {
                    rel: uri("http://example.com/rel/mood"),
                    content: "calm".to_string(),
                }],
                ..Track::default()
            },
        ],
        ..Playlist::default()
    }
}

#[test]
fn test_write_relativizes_against_base() {
    let options = WriteOptions {
        base: Some(uri("http://example.com/lists/out.xspf")),
        ..WriteOptions::default()
    };
    let xml = write_string(&sample(), &options).unwrap();

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"xmlns="http://xspf.org/ns/0/""#));
    assert!(!xml.contains("xml:base"));
    assert!(xml.contains("<title>Rock &amp; Roll</title>"));
    assert!(xml.contains("<info>../about.html</info>"));
    assert!(xml.contains("<location>../music/a.ogg</location>"));
    assert!(xml.contains("<location>http://cdn.example/b.ogg</location>"));
    assert!(xml.contains(r#"<link rel="http://example.com/rel/next">next.xspf</link>"#));
}

#[test]
fn test_written_relative_uris_read_back_equal() {
    let base = uri("http://example.com/lists/out.xspf");
    let options = WriteOptions {
        base: Some(base.clone()),
        ..WriteOptions::default()
    };
    let xml = write_string(&sample(), &options).unwrap();

    let outcome = read_str(&xml, Some(base), &ReadOptions::default()).unwrap();
    assert_eq!(outcome.playlist, sample());
}

#[test]
fn test_root_xml_base_makes_document_portable() {
    let options = WriteOptions {
        base: Some(uri("http://example.com/lists/out.xspf")),
        emit_xml_base: true,
        indent: 0,
    };
    let xml = write_string(&sample(), &options).unwrap();
    assert!(xml.contains(r#"xml:base="http://example.com/lists/out.xspf""#));
    assert!(xml.contains("<location>../music/a.ogg</location>"));

    // A different retrieval location does not change what the URIs mean.
    let outcome = read_str(&xml, Some(uri("file:///tmp/copy.xspf")), &ReadOptions::default()).unwrap();
    assert_eq!(outcome.playlist, sample());
}

#[test]
fn test_write_without_base_is_absolute() {
    let xml = write_string(&sample(), &WriteOptions::default()).unwrap();
    assert!(xml.contains("<location>http://example.com/music/a.ogg</location>"));
    assert!(xml.contains("<info>http://example.com/about.html</info>"));
}

#[test]
fn test_write_empty_track_list() {
    let xml = write_string(&Playlist::default(), &WriteOptions::default()).unwrap();
    assert!(xml.contains("<trackList/>"));

    let outcome = read_str(&xml, None, &ReadOptions::default()).unwrap();
    assert_eq!(outcome.playlist, Playlist::default());
}

#[test]
fn test_write_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xspf");
    let base = Uri::from_file_path(&fs::canonicalize(dir.path()).unwrap().join("out.xspf")).unwrap();

    let mut playlist = Playlist::default();
    playlist.tracks.push(Track {
        locations: vec![Uri::from_file_path(&fs::canonicalize(dir.path()).unwrap().join("music/a.ogg")).unwrap()],
        ..Track::default()
    });

    let options = WriteOptions {
        base: Some(base),
        ..WriteOptions::default()
    };
    write_file(&playlist, &path, &options).unwrap();

    let xml = fs::read_to_string(&path).unwrap();
    assert!(xml.contains("<location>music/a.ogg</location>"));

    let outcome = read_file(&path, None, &ReadOptions::default()).unwrap();
    assert_eq!(outcome.playlist, playlist);
}
