//! Event-driven XSPF reader.
//!
//! The quick-xml event loop feeds every element start and end through a
//! [`ReadSession`], so each field is resolved against the base in scope at
//! the exact point it appears.

use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};

use super::{
    Attribution, InvalidFieldPolicy, Link, Meta, Playlist, ReadOptions, ReadOutcome, SkippedField,
    Track, XSPF_NAMESPACE,
};
use crate::error::{Error, Result};
use crate::session::ReadSession;
use crate::uri::Uri;

const TRACK: &str = "playlist/trackList/track";
const TRACK_CHILD: &str = "playlist/trackList/track/";

/// Path entry for elements outside the XSPF namespace. `#` cannot occur in
/// an XML name, so no field key ever matches it.
const FOREIGN: &str = "#foreign";

/// Parse a playlist document.
///
/// `base` is the document's retrieval location (or an override). Without
/// one, relative references follow the session's unresolved policy.
pub fn read_str(xml: &str, base: Option<Uri>, options: &ReadOptions) -> Result<ReadOutcome> {
    let session = ReadSession::new(base, options.resolve)?;
    let mut builder = PlaylistBuilder::new(session, options.invalid_field);
    let mut reader = NsReader::from_str(xml);

    loop {
        let resolved = reader
            .read_resolved_event()
            .map(|(namespace, event)| (is_foreign(&namespace), event));
        let (foreign, event) = match resolved {
            Ok(resolved) => resolved,
            Err(source) => {
                return Err(Error::Malformed {
                    position: reader.error_position(),
                    source,
                });
            }
        };

        match event {
            Event::Start(element) => builder.start(&element, foreign)?,
            Event::Empty(element) => {
                builder.start(&element, foreign)?;
                builder.end()?;
            }
            Event::End(_) => builder.end()?,
            Event::Text(text) => builder.text(&unescape_text(&String::from_utf8_lossy(&text))?),
            Event::CData(data) => builder.text(&String::from_utf8_lossy(&data)),
            Event::GeneralRef(reference) => {
                let name = String::from_utf8_lossy(&reference);
                builder.text(&unescape_text(&format!("&{name};"))?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    builder.finish()
}

/// Read a playlist file. Without a `base` override, the file's own
/// location (as a `file:` URI) is the document base.
pub fn read_file(path: &Path, base: Option<Uri>, options: &ReadOptions) -> Result<ReadOutcome> {
    let xml = fs::read_to_string(path)?;
    let base = match base {
        Some(base) => base,
        None => Uri::from_file_path(&fs::canonicalize(path)?)?,
    };
    crate::debug!("resolve"; "{} with base {}", path.display(), base);
    read_str(&xml, Some(base), options)
}

/// Unprefixed names without a default namespace count as XSPF.
fn is_foreign(namespace: &ResolveResult<'_>) -> bool {
    match namespace {
        ResolveResult::Bound(Namespace(uri)) => *uri != XSPF_NAMESPACE.as_bytes(),
        ResolveResult::Unbound => false,
        ResolveResult::Unknown(_) => true,
    }
}

fn unescape_text(raw: &str) -> Result<String> {
    let text = unescape(raw).map_err(quick_xml::Error::from)?;
    Ok(text.into_owned())
}

// ============================================================================
// Attributes
// ============================================================================

/// The attributes the reader cares about, unescaped.
#[derive(Debug, Default)]
struct ElementAttributes {
    xml_base: Option<String>,
    rel: Option<String>,
    version: Option<String>,
}

impl ElementAttributes {
    fn read(element: &BytesStart<'_>) -> Result<Self> {
        let mut attributes = Self::default();
        for attr in element.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let slot = match attr.key.as_ref() {
                b"xml:base" => &mut attributes.xml_base,
                b"rel" => &mut attributes.rel,
                b"version" => &mut attributes.version,
                _ => continue,
            };
            *slot = Some(unescape_text(&String::from_utf8_lossy(&attr.value))?);
        }
        Ok(attributes)
    }
}

// ============================================================================
// Builder
// ============================================================================

struct PlaylistBuilder {
    session: ReadSession,
    policy: InvalidFieldPolicy,
    /// Local names of the open elements, root first. Foreign elements
    /// appear as [`FOREIGN`].
    path: Vec<String>,
    text: String,
    /// Resolved `rel` of the open `<link>` or `<meta>`.
    rel: Option<Uri>,
    playlist: Playlist,
    track: Option<Track>,
    seen_root: bool,
    skipped: Vec<SkippedField>,
}

impl PlaylistBuilder {
    fn new(session: ReadSession, policy: InvalidFieldPolicy) -> Self {
        Self {
            session,
            policy,
            path: Vec::new(),
            text: String::new(),
            rel: None,
            playlist: Playlist::default(),
            track: None,
            seen_root: false,
            skipped: Vec::new(),
        }
    }

    fn start(&mut self, element: &BytesStart<'_>, foreign: bool) -> Result<()> {
        let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
        if self.path.is_empty() {
            if foreign {
                return Err(Error::Structure(format!(
                    "root element <{name}> is not in the XSPF namespace"
                )));
            }
            if self.seen_root {
                return Err(Error::Structure(format!(
                    "unexpected <{name}> after the root element"
                )));
            }
            if name != "playlist" {
                return Err(Error::Structure(format!(
                    "root element must be <playlist>, found <{name}>"
                )));
            }
            self.seen_root = true;
        }

        let attributes = ElementAttributes::read(element)?;
        self.path.push(if foreign { FOREIGN.to_string() } else { name });
        self.text.clear();

        // The element's own override is in scope for its attributes.
        if let Err(err) = self.session.start_element(attributes.xml_base.as_deref()) {
            let value = attributes.xml_base.clone().unwrap_or_default();
            self.recover("xml:base", &value, err)?;
        }

        match self.key().as_str() {
            "playlist" => {
                if let Some(version) = attributes.version
                    && let Some(version) = self.number::<u8>("playlist", &version)?
                {
                    self.playlist.version = version;
                }
            }
            TRACK => self.track = Some(Track::default()),
            "playlist/link"
            | "playlist/meta"
            | "playlist/trackList/track/link"
            | "playlist/trackList/track/meta" => {
                self.rel = self.resolve_rel(attributes.rel)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        let key = self.key();
        let text = std::mem::take(&mut self.text);
        let value = text.trim();

        // Fields resolve before the element's own scope closes.
        match key.strip_prefix(TRACK_CHILD) {
            Some(field) => self.track_field(field, value)?,
            None => self.playlist_field(&key, value)?,
        }

        self.session.end_element()?;
        self.path.pop();
        Ok(())
    }

    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn finish(self) -> Result<ReadOutcome> {
        if !self.seen_root {
            return Err(Error::Structure("document has no <playlist> element".to_string()));
        }
        self.session.finish()?;
        Ok(ReadOutcome {
            playlist: self.playlist,
            skipped: self.skipped,
        })
    }

    fn key(&self) -> String {
        self.path.join("/")
    }

    fn playlist_field(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "playlist/title" => self.playlist.title = Some(value.to_string()),
            "playlist/creator" => self.playlist.creator = Some(value.to_string()),
            "playlist/annotation" => self.playlist.annotation = Some(value.to_string()),
            "playlist/date" => self.playlist.date = Some(value.to_string()),
            "playlist/info" => {
                if let Some(uri) = self.resolve_field("info", value)? {
                    self.playlist.info = Some(uri);
                }
            }
            "playlist/location" => {
                if let Some(uri) = self.resolve_field("location", value)? {
                    self.playlist.location = Some(uri);
                }
            }
            "playlist/identifier" => {
                if let Some(uri) = self.resolve_field("identifier", value)? {
                    self.playlist.identifier = Some(uri);
                }
            }
            "playlist/image" => {
                if let Some(uri) = self.resolve_field("image", value)? {
                    self.playlist.image = Some(uri);
                }
            }
            "playlist/license" => {
                if let Some(uri) = self.resolve_field("license", value)? {
                    self.playlist.license = Some(uri);
                }
            }
            "playlist/attribution/location" => {
                if let Some(uri) = self.resolve_field("location", value)? {
                    self.playlist.attribution.push(Attribution::Location(uri));
                }
            }
            "playlist/attribution/identifier" => {
                if let Some(uri) = self.resolve_field("identifier", value)? {
                    self.playlist.attribution.push(Attribution::Identifier(uri));
                }
            }
            "playlist/link" => {
                if let Some(link) = self.link(value)? {
                    self.playlist.links.push(link);
                }
            }
            "playlist/meta" => {
                if let Some(meta) = self.meta(value) {
                    self.playlist.metas.push(meta);
                }
            }
            TRACK => {
                if let Some(track) = self.track.take() {
                    self.playlist.tracks.push(track);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn track_field(&mut self, field: &str, value: &str) -> Result<()> {
        let Some(mut track) = self.track.take() else {
            return Ok(());
        };

        match field {
            "location" => {
                if let Some(uri) = self.resolve_field("location", value)? {
                    track.locations.push(uri);
                }
            }
            "identifier" => {
                if let Some(uri) = self.resolve_field("identifier", value)? {
                    track.identifiers.push(uri);
                }
            }
            "title" => track.title = Some(value.to_string()),
            "creator" => track.creator = Some(value.to_string()),
            "annotation" => track.annotation = Some(value.to_string()),
            "album" => track.album = Some(value.to_string()),
            "info" => {
                if let Some(uri) = self.resolve_field("info", value)? {
                    track.info = Some(uri);
                }
            }
            "image" => {
                if let Some(uri) = self.resolve_field("image", value)? {
                    track.image = Some(uri);
                }
            }
            "trackNum" => {
                if let Some(num) = self.number("trackNum", value)? {
                    track.track_num = Some(num);
                }
            }
            "duration" => {
                if let Some(duration) = self.number("duration", value)? {
                    track.duration = Some(duration);
                }
            }
            "link" => {
                if let Some(link) = self.link(value)? {
                    track.links.push(link);
                }
            }
            "meta" => {
                if let Some(meta) = self.meta(value) {
                    track.metas.push(meta);
                }
            }
            _ => {}
        }

        self.track = Some(track);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Field helpers
    // ------------------------------------------------------------------------

    /// Resolve a URI field. `Ok(None)` means it was skipped.
    fn resolve_field(&mut self, element: &str, value: &str) -> Result<Option<Uri>> {
        match self.session.resolve(value) {
            Ok(reference) => Ok(Some(reference.into_uri())),
            Err(err) => self.recover(element, value, err).map(|()| None),
        }
    }

    fn resolve_rel(&mut self, rel: Option<String>) -> Result<Option<Uri>> {
        let element = self.path.last().cloned().unwrap_or_default();
        match rel {
            Some(rel) => self.resolve_field(&element, &rel),
            None => {
                let err = Error::InvalidField {
                    element: element.clone(),
                    reason: "missing rel attribute".to_string(),
                };
                self.recover(&element, "", err).map(|()| None)
            }
        }
    }

    fn link(&mut self, value: &str) -> Result<Option<Link>> {
        let Some(rel) = self.rel.take() else {
            return Ok(None);
        };
        Ok(self
            .resolve_field("link", value)?
            .map(|content| Link { rel, content }))
    }

    fn meta(&mut self, value: &str) -> Option<Meta> {
        self.rel.take().map(|rel| Meta {
            rel,
            content: value.to_string(),
        })
    }

    fn number<T>(&mut self, element: &str, value: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match value.trim().parse::<T>() {
            Ok(number) => Ok(Some(number)),
            Err(e) => {
                let err = Error::InvalidField {
                    element: element.to_string(),
                    reason: format!("`{value}` is not a non-negative integer: {e}"),
                };
                self.recover(element, value, err).map(|()| None)
            }
        }
    }

    /// Apply the invalid-field policy to a failed field.
    fn recover(&mut self, element: &str, value: &str, err: Error) -> Result<()> {
        if self.policy == InvalidFieldPolicy::Abort || !err.is_recoverable() {
            return Err(err);
        }
        crate::debug!("resolve"; "skipping <{}>: {}", element, err);
        self.skipped.push(SkippedField {
            element: element.to_string(),
            value: value.to_string(),
            reason: err.to_string(),
        });
        Ok(())
    }
}
