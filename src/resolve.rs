// src/resolve.rs

//! Project root resolution.
//!
//! Given an anchor path that is known to live somewhere inside the project
//! (typically the directory the launcher itself runs from) and the name of
//! the marker directory (the UI module's own folder), locate the project root.
//!
//! This is a pure string computation: no filesystem access, no process-global
//! state. The anchor is always passed in explicitly.

use std::fmt;

/// Which separator a path string uses.
///
/// No normalisation happens between styles: a `C:\...` anchor must be
/// resolved with [`PathStyle::Windows`], a `/home/...` anchor with
/// [`PathStyle::Posix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
    Windows,
    Posix,
}

impl PathStyle {
    /// Style of the host platform.
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    pub fn separator(self) -> char {
        match self {
            PathStyle::Windows => '\\',
            PathStyle::Posix => '/',
        }
    }

    /// Resolve `anchor` against `marker` using this separator style.
    ///
    /// The leftmost occurrence of `separator + marker` wins, even when a
    /// deeper occurrence exists. Matching is plain substring matching, so a
    /// directory that merely starts with the marker name also matches.
    pub fn resolve(self, anchor: &str, marker: &str) -> Resolution {
        if marker.is_empty() {
            return Resolution::NotFound;
        }

        let token = format!("{}{}", self.separator(), marker);
        match anchor.find(&token) {
            Some(idx) => Resolution::Found(ProjectLocation {
                root_path: anchor[..idx].to_string(),
                marker_segment: marker.to_string(),
                style: self,
            }),
            None => Resolution::NotFound,
        }
    }
}

/// Resolve using the host's separator style.
pub fn resolve_project_location(anchor: &str, marker: &str) -> Resolution {
    PathStyle::native().resolve(anchor, marker)
}

/// Where the project lives, as found from an anchor path.
///
/// Invariant: `root_path + separator + marker_segment` is a prefix of the
/// anchor it was computed from, and `root_path` does not contain that token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectLocation {
    root_path: String,
    marker_segment: String,
    style: PathStyle,
}

impl ProjectLocation {
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn marker_segment(&self) -> &str {
        &self.marker_segment
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// The separator-prefixed marker exactly as it appeared in the anchor.
    pub fn marker_token(&self) -> String {
        format!("{}{}", self.style.separator(), self.marker_segment)
    }

    /// `root + separator + child`.
    pub fn join(&self, child: &str) -> String {
        format!("{}{}{}", self.root_path, self.style.separator(), child)
    }
}

impl fmt::Display for ProjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (marker {})", self.root_path, self.marker_token())
    }
}

/// Outcome of a resolution attempt.
///
/// `NotFound` means orchestration cannot proceed; callers must not try to
/// synthesise a working directory from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ProjectLocation),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn into_option(self) -> Option<ProjectLocation> {
        match self {
            Resolution::Found(loc) => Some(loc),
            Resolution::NotFound => None,
        }
    }

    /// Convert into a `Result`, using `err` for the `NotFound` case.
    pub fn found_or<E>(self, err: E) -> Result<ProjectLocation, E> {
        self.into_option().ok_or(err)
    }

    pub fn found_or_else<E>(self, err: impl FnOnce() -> E) -> Result<ProjectLocation, E> {
        self.into_option().ok_or_else(err)
    }
}
