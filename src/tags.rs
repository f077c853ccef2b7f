//! ID3 metadata setters
//!
//! libmp3lame emits the ID3v2 tag in front of the first frame and the
//! ID3v1 tag after `flush`, so tags belong before `init_params`. The native
//! setters report nothing for text fields; the cases where data would not
//! survive are reported here as [`TagStatus`] values instead of being
//! dropped silently.

use crate::error::{Result, TagError};
use crate::ffi;
use crate::session::Session;
use lazy_static::lazy_static;
use log::warn;
use std::ffi::{c_void, CStr, CString};
use std::os::raw::{c_char, c_int};

/// Which ID3 versions libmp3lame writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize, serde::Deserialize))]
pub enum TagLayout {
    /// ID3v1, plus ID3v2 when a field does not fit ID3v1
    #[default]
    Automatic,
    /// Always write both versions
    AddV2,
    /// ID3v1 only; long fields are cut to the ID3v1 width
    V1Only,
    /// ID3v2 only
    V2Only,
}

/// Outcome of a successful tag write
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagStatus {
    /// Stored in every tag version being written
    Stored,
    /// Stored, but the ID3v1 copy will be cut to `limit` bytes
    Truncated { limit: usize },
    /// The value has no ID3v1 representation; only an ID3v2 tag keeps it
    NotInV1,
}

const V1_TEXT_WIDTH: usize = 30;
const V1_YEAR_WIDTH: usize = 4;
// The ID3v1.1 track byte takes the last two bytes of the comment field
const V1_COMMENT_WITH_TRACK: usize = 28;

type TextSetter = unsafe extern "C" fn(*mut ffi::LameGlobalFlags, *const c_char);

lazy_static! {
    /// ID3v1 genre names as libmp3lame lists them
    static ref GENRES: Vec<String> = load_genres();
}

unsafe extern "C" fn push_genre(_index: c_int, name: *const c_char, cookie: *mut c_void) {
    if name.is_null() || cookie.is_null() {
        return;
    }
    let names = &mut *(cookie as *mut Vec<String>);
    names.push(CStr::from_ptr(name).to_string_lossy().into_owned());
}

fn load_genres() -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    unsafe {
        ffi::id3tag_genre_list(Some(push_genre), &mut names as *mut Vec<String> as *mut c_void)
    };
    names
}

impl Session {
    /// Reset all tag fields (native `id3tag_init`).
    ///
    /// Called automatically before the first setter.
    pub fn init_tags(&mut self) -> Result<()> {
        let gfp = self.handle()?;
        unsafe { ffi::id3tag_init(gfp) };
        self.tags_initialized = true;
        self.track_set = false;
        self.apply_layout(gfp);
        Ok(())
    }

    /// Choose which tag versions are written
    pub fn set_tag_layout(&mut self, layout: TagLayout) -> Result<()> {
        let gfp = self.tag_handle()?;
        self.tag_layout = layout;
        self.apply_layout(gfp);
        Ok(())
    }

    pub fn tag_layout(&self) -> TagLayout {
        self.tag_layout
    }

    pub fn set_title(&mut self, title: &str) -> Result<TagStatus> {
        self.set_text("title", title, V1_TEXT_WIDTH, ffi::id3tag_set_title)
    }

    pub fn set_artist(&mut self, artist: &str) -> Result<TagStatus> {
        self.set_text("artist", artist, V1_TEXT_WIDTH, ffi::id3tag_set_artist)
    }

    pub fn set_album(&mut self, album: &str) -> Result<TagStatus> {
        self.set_text("album", album, V1_TEXT_WIDTH, ffi::id3tag_set_album)
    }

    /// Release year.
    ///
    /// ID3v1 keeps the leading number capped at 9999 and nothing for text
    /// that does not start with one. Unless the layout forces ID3v2, any
    /// other value is reported.
    pub fn set_year(&mut self, year: &str) -> Result<TagStatus> {
        let text = to_c_string("year", year)?;
        let gfp = self.tag_handle()?;
        unsafe { ffi::id3tag_set_year(gfp, text.as_ptr()) };

        if year.is_empty() || matches!(self.tag_layout, TagLayout::AddV2 | TagLayout::V2Only) {
            return Ok(TagStatus::Stored);
        }
        match v1_year(year) {
            Some(kept) if kept == year => Ok(TagStatus::Stored),
            Some(kept) => {
                warn!("year {:?} is written as {:?} in ID3v1", year, kept);
                Ok(TagStatus::Truncated {
                    limit: V1_YEAR_WIDTH,
                })
            }
            None => {
                warn!("year {:?} has no ID3v1 representation", year);
                Ok(TagStatus::NotInV1)
            }
        }
    }

    pub fn set_comment(&mut self, comment: &str) -> Result<TagStatus> {
        let width = if self.track_set {
            V1_COMMENT_WITH_TRACK
        } else {
            V1_TEXT_WIDTH
        };
        self.set_text("comment", comment, width, ffi::id3tag_set_comment)
    }

    /// Track number, optionally as `"n/total"`
    pub fn set_track(&mut self, track: &str) -> Result<TagStatus> {
        let text = to_c_string("track", track)?;
        let gfp = self.tag_handle()?;
        let code = unsafe { ffi::id3tag_set_track(gfp, text.as_ptr()) };
        if code == 0 && !track.is_empty() {
            self.track_set = true;
        }
        if code != 0 {
            warn!("track {:?} is outside the ID3v1 range and is kept for ID3v2 only", track);
            return Ok(TagStatus::NotInV1);
        }
        Ok(TagStatus::Stored)
    }

    /// Genre by ID3v1 name or number.
    ///
    /// libmp3lame accepts any name; one it does not know becomes "Other" in
    /// ID3v1 and is reported as [`TagStatus::NotInV1`].
    pub fn set_genre(&mut self, genre: &str) -> Result<TagStatus> {
        let text = to_c_string("genre", genre)?;
        let gfp = self.tag_handle()?;
        if unsafe { ffi::id3tag_set_genre(gfp, text.as_ptr()) } == -1 {
            return Err(TagError::GenreOutOfRange(genre.to_string()).into());
        }
        if genre.is_empty() || is_genre_number(genre) || is_v1_genre(genre) {
            return Ok(TagStatus::Stored);
        }
        warn!("genre {:?} is not an ID3v1 genre; ID3v1 will say \"Other\"", genre);
        Ok(TagStatus::NotInV1)
    }

    fn set_text(
        &mut self,
        field: &'static str,
        value: &str,
        v1_width: usize,
        setter: TextSetter,
    ) -> Result<TagStatus> {
        let text = to_c_string(field, value)?;
        let gfp = self.tag_handle()?;
        unsafe { setter(gfp, text.as_ptr()) };

        if self.tag_layout == TagLayout::V1Only && value.len() > v1_width {
            warn!(
                "{} is {} bytes; ID3v1 keeps only the first {}",
                field,
                value.len(),
                v1_width
            );
            return Ok(TagStatus::Truncated { limit: v1_width });
        }
        Ok(TagStatus::Stored)
    }

    /// Live handle with the tag block initialized
    fn tag_handle(&mut self) -> Result<*mut ffi::LameGlobalFlags> {
        let gfp = self.handle()?;
        if !self.tags_initialized {
            self.init_tags()?;
        }
        if self.is_locked() {
            warn!("tag set after init_params; the ID3v2 block may already be written");
        }
        Ok(gfp)
    }

    fn apply_layout(&self, gfp: *mut ffi::LameGlobalFlags) {
        unsafe {
            match self.tag_layout {
                TagLayout::Automatic => {}
                TagLayout::AddV2 => ffi::id3tag_add_v2(gfp),
                TagLayout::V1Only => ffi::id3tag_v1_only(gfp),
                TagLayout::V2Only => ffi::id3tag_v2_only(gfp),
            }
        }
    }
}

fn to_c_string(field: &'static str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| TagError::InteriorNul(field).into())
}

/// Year text as the ID3v1 tag will hold it, `None` when it holds none
fn v1_year(year: &str) -> Option<String> {
    let trimmed = year.trim_start();
    if trimmed.starts_with('-') {
        return None;
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = &unsigned[..unsigned.bytes().take_while(u8::is_ascii_digit).count()];
    let value = digits.trim_start_matches('0');
    match value.len() {
        0 => None,
        1..=V1_YEAR_WIDTH => Some(value.to_string()),
        _ => Some("9999".to_string()),
    }
}

/// Whole-string integer, which libmp3lame treats as a genre number
fn is_genre_number(genre: &str) -> bool {
    let trimmed = genre.trim_start();
    let digits = trimmed
        .strip_prefix(|c| c == '+' || c == '-')
        .unwrap_or(trimmed);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Whether libmp3lame resolves `name` to an entry of its genre table
fn is_v1_genre(name: &str) -> bool {
    GENRES
        .iter()
        .any(|genre| genre.eq_ignore_ascii_case(name) || loose_match(name, genre))
}

/// libmp3lame's fallback genre comparison. Only ASCII letters count, case
/// and repeated letters are ignored, and a letter followed by '.' stands
/// for the rest of a word.
fn loose_match(name: &str, genre: &str) -> bool {
    let (p, q) = (name.as_bytes(), genre.as_bytes());
    let upper_at = |s: &[u8], i: usize| s.get(i).map_or(0, u8::to_ascii_uppercase);
    let mut i = next_letter(p, 0, 0);
    let mut j = next_letter(q, 0, 0);
    loop {
        let (cp, cq) = (upper_at(p, i), upper_at(q, j));
        if cp != cq {
            return false;
        }
        if cp == 0 {
            return true;
        }
        if p.get(i + 1) == Some(&b'.') {
            while j < q.len() {
                j += 1;
                if q[j - 1] == b' ' {
                    break;
                }
            }
        }
        i = next_letter(p, i, cp);
        j = next_letter(q, j, cq);
    }
}

/// Index of the next ASCII letter at or after `from` that differs from `skip`
fn next_letter(s: &[u8], from: usize, skip: u8) -> usize {
    s.iter()
        .skip(from)
        .position(|b| {
            let c = b.to_ascii_uppercase();
            c.is_ascii_uppercase() && c != skip
        })
        .map_or(s.len(), |offset| from + offset)
}
