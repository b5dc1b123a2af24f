use std::fmt;

use crate::config::Markers;

/// Which part of the source ended up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Both markers found, in order. Output is the text strictly between them.
    Region,
    /// Begin marker found without an end marker after it. Output runs to EOF.
    BeginOnly,
    /// No begin marker. Output is the whole source.
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extracted<'a> {
    pub text: &'a [u8],
    pub kind: Extraction,
}

/// Cut the region between the first begin marker and the first end marker
/// following it.
///
/// Works on raw bytes so sources in any encoding pass through unchanged.
/// An end marker without a begin marker before it does not count: the
/// source is passed through untouched.
pub fn extract<'a>(content: &'a [u8], markers: &Markers) -> Extracted<'a> {
    let Some((_, rest)) = split_once(content, markers.begin.as_bytes()) else {
        return Extracted {
            text: content,
            kind: Extraction::Passthrough,
        };
    };

    match split_once(rest, markers.end.as_bytes()) {
        Some((region, _)) => Extracted {
            text: region,
            kind: Extraction::Region,
        },
        None => Extracted {
            text: rest,
            kind: Extraction::BeginOnly,
        },
    }
}

fn split_once<'a>(haystack: &'a [u8], needle: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
    if needle.is_empty() {
        return Some((&haystack[..0], haystack));
    }
    let pos = haystack
        .windows(needle.len())
        .position(|window| window == needle)?;
    Some((&haystack[..pos], &haystack[pos + needle.len()..]))
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Region => "region",
            Self::BeginOnly => "begin marker only",
            Self::Passthrough => "passthrough",
        };
        f.write_str(s)
    }
}
