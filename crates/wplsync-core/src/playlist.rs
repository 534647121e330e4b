//! Windows Media Player playlist (WPL) reader
//!
//! A WPL document is a small SMIL dialect:
//!
//! ```text
//! <smil>
//!   <head>
//!     <meta name="Generator" content="Microsoft Windows Media Player -- 12.0"/>
//!     <title>Road trip</title>
//!   </head>
//!   <body>
//!     <seq>
//!       <media src="..\Music\Artist\Album\01 Track.mp3"/>
//!     </seq>
//!   </body>
//! </smil>
//! ```
//!
//! Only the title, the generator and the ordered `src` references are read.

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use wplsync_fs::canonicalize;

use crate::{Error, Result};

/// Playlist formats with a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistFormat {
    Wpl,
}

impl PlaylistFormat {
    /// Pick the reader from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "wpl" => Ok(Self::Wpl),
            _ => Err(Error::UnsupportedPlaylist {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// A parsed playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// Location of the playlist file
    pub path: PathBuf,
    /// `head/title`
    pub title: Option<String>,
    /// `head/meta[@name='Generator']/@content`
    pub generator: Option<String>,
    /// `body/seq/media/@src` in document order, exactly as written
    pub sources: Vec<String>,
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

impl Playlist {
    /// Read and parse the playlist at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| wplsync_fs::Error::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Parse WPL `content`; `path` is used for error messages and for
    /// resolving relative references.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let parse_error = |message: String| Error::PlaylistParse {
            path: path.to_path_buf(),
            message,
        };

        let text = content.strip_prefix('\u{feff}').unwrap_or(content);
        let doc = Document::parse(text).map_err(|e| parse_error(e.to_string()))?;
        let root = doc.root_element();

        let head = child(root, "head");
        let title = head
            .and_then(|h| child(h, "title"))
            .and_then(|t| t.text())
            .map(|t| t.trim().to_string());
        let generator = head
            .and_then(|h| {
                h.children()
                    .find(|n| n.has_tag_name("meta") && n.attribute("name") == Some("Generator"))
            })
            .and_then(|m| m.attribute("content"))
            .map(str::to_string);

        let seq = child(root, "body")
            .and_then(|b| child(b, "seq"))
            .ok_or_else(|| parse_error("missing body/seq element".to_string()))?;

        let mut sources = Vec::new();
        for media in seq.children().filter(|n| n.has_tag_name("media")) {
            match media.attribute("src") {
                Some(src) => sources.push(src.to_string()),
                None => tracing::warn!(
                    playlist = %path.display(),
                    line = doc.text_pos_at(media.range().start).row,
                    "media element without src attribute"
                ),
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            title,
            generator,
            sources,
        })
    }

    /// Folder that relative references are resolved against.
    pub fn folder(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Resolve every reference to a canonical absolute path.
    ///
    /// Relative references are taken relative to the playlist's folder.
    /// Backslash separators are accepted on every platform.
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        self.sources
            .iter()
            .map(|src| {
                let native = native_separators(src);
                let path = Path::new(&native);
                let absolute = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.folder().join(path)
                };
                Ok(canonicalize(absolute)?)
            })
            .collect()
    }
}

#[cfg(windows)]
fn native_separators(src: &str) -> String {
    src.to_string()
}

#[cfg(not(windows))]
fn native_separators(src: &str) -> String {
    src.replace('\\', "/")
}
