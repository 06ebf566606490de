//! XSPF writer.
//!
//! Every URI field goes through [`WriteSession::output`], so the document
//! holds the shortest reference that resolves back to the model's value.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{Link, Meta, Playlist, Track, WriteOptions, XSPF_NAMESPACE};
use crate::error::Result;
use crate::session::WriteSession;
use crate::uri::Uri;

/// Serialize a playlist to a UTF-8 document.
pub fn write_string(playlist: &Playlist, options: &WriteOptions) -> Result<String> {
    let mut writer = PlaylistWriter::new(options)?;
    writer.playlist(playlist, options)?;
    writer.into_string()
}

pub fn write_file(playlist: &Playlist, path: &Path, options: &WriteOptions) -> Result<()> {
    let xml = write_string(playlist, options)?;
    fs::write(path, xml)?;
    crate::debug!("rewrite"; "wrote {}", path.display());
    Ok(())
}

struct PlaylistWriter {
    writer: Writer<Cursor<Vec<u8>>>,
    session: WriteSession,
}

impl PlaylistWriter {
    fn new(options: &WriteOptions) -> Result<Self> {
        let buffer = Cursor::new(Vec::new());
        let writer = if options.indent > 0 {
            Writer::new_with_indent(buffer, b' ', options.indent)
        } else {
            Writer::new(buffer)
        };

        // A root xml:base is written absolute, so the session starts unbound
        // and picks the base up from the root scope.
        let document_base = if options.emit_xml_base {
            None
        } else {
            options.base.clone()
        };

        Ok(Self {
            writer,
            session: WriteSession::new(document_base)?,
        })
    }

    fn playlist(&mut self, playlist: &Playlist, options: &WriteOptions) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let version = playlist.version.to_string();
        let mut root = BytesStart::new("playlist");
        root.push_attribute(("version", version.as_str()));
        root.push_attribute(("xmlns", XSPF_NAMESPACE));
        let override_base = options.base.as_ref().filter(|_| options.emit_xml_base);
        if let Some(xml_base) = self.session.open_scope(override_base)? {
            root.push_attribute(("xml:base", xml_base.as_str()));
        }
        self.writer.write_event(Event::Start(root))?;

        self.text("title", playlist.title.as_deref())?;
        self.text("creator", playlist.creator.as_deref())?;
        self.text("annotation", playlist.annotation.as_deref())?;
        self.uri("info", playlist.info.as_ref())?;
        self.uri("location", playlist.location.as_ref())?;
        self.uri("identifier", playlist.identifier.as_ref())?;
        self.uri("image", playlist.image.as_ref())?;
        self.text("date", playlist.date.as_deref())?;
        self.uri("license", playlist.license.as_ref())?;

        if !playlist.attribution.is_empty() {
            self.start("attribution")?;
            for entry in &playlist.attribution {
                self.uri(entry.element_name(), Some(entry.uri()))?;
            }
            self.end("attribution")?;
        }

        self.links(&playlist.links)?;
        self.metas(&playlist.metas)?;

        if playlist.tracks.is_empty() {
            self.writer
                .write_event(Event::Empty(BytesStart::new("trackList")))?;
        } else {
            self.start("trackList")?;
            for track in &playlist.tracks {
                self.track(track)?;
            }
            self.end("trackList")?;
        }

        self.end("playlist")?;
        self.session.close_scope()
    }

    fn track(&mut self, track: &Track) -> Result<()> {
        self.start("track")?;
        for location in &track.locations {
            self.uri("location", Some(location))?;
        }
        for identifier in &track.identifiers {
            self.uri("identifier", Some(identifier))?;
        }
        self.text("title", track.title.as_deref())?;
        self.text("creator", track.creator.as_deref())?;
        self.text("annotation", track.annotation.as_deref())?;
        self.uri("info", track.info.as_ref())?;
        self.uri("image", track.image.as_ref())?;
        self.text("album", track.album.as_deref())?;
        if let Some(num) = track.track_num {
            self.text("trackNum", Some(&num.to_string()))?;
        }
        if let Some(duration) = track.duration {
            self.text("duration", Some(&duration.to_string()))?;
        }
        self.links(&track.links)?;
        self.metas(&track.metas)?;
        self.end("track")
    }

    fn links(&mut self, links: &[Link]) -> Result<()> {
        for link in links {
            let rel = link.rel.to_string();
            let content = self.session.output(&link.content);
            self.element("link", &[("rel", rel.as_str())], &content)?;
        }
        Ok(())
    }

    fn metas(&mut self, metas: &[Meta]) -> Result<()> {
        for meta in metas {
            let rel = meta.rel.to_string();
            self.element("meta", &[("rel", rel.as_str())], &meta.content)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Event helpers
    // ------------------------------------------------------------------------

    fn text(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.element(name, &[], value),
            None => Ok(()),
        }
    }

    fn uri(&mut self, name: &str, uri: Option<&Uri>) -> Result<()> {
        match uri {
            Some(uri) => {
                let value = self.session.output(uri);
                self.element(name, &[], &value)
            }
            None => Ok(()),
        }
    }

    fn element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        self.writer.write_event(Event::Start(start))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn into_string(self) -> Result<String> {
        self.session.finish()?;
        let mut xml = String::from_utf8(self.writer.into_inner().into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}
