//! Signature scanning for containers without a usable structural index
//!
//! Every occurrence of a known start signature is considered once, in
//! increasing offset order, and its end is found with a format-specific
//! termination rule:
//!
//! - PNG ends with the 12-byte IEND chunk
//! - JPEG ends with the first end-of-image marker after the start
//! - GIF ends with the first trailer byte after the version string
//!
//! The GIF rule does not walk the block structure and can stop early on a
//! trailer byte inside image data. Passes run in the fixed order PNG, JPEG,
//! GIF and share one `ClaimedRegions`, so output order is deterministic and
//! no two candidates overlap.

use std::fmt;
use std::ops::Range;

use lazy_static::lazy_static;
use log::debug;
use memchr::memchr;
use memchr::memmem::Finder;

use crate::workbook::constants::limits::DEFAULT_MIN_IMAGE_BYTES;
use crate::workbook::constants::signatures::{
    GIF87A, GIF89A, GIF_TRAILER, GIF_TRAILER_SKIP, JPEG_EOI, JPEG_SOI, PNG,
    PNG_CHUNK_LENGTH_FIELD, PNG_IEND, PNG_IEND_CHUNK_LEN,
};
use crate::workbook::types::{ImageCandidate, ImageFormat};

use super::claims::ClaimedRegions;

lazy_static! {
    static ref PNG_START: Finder<'static> = Finder::new(&PNG);
    static ref PNG_END: Finder<'static> = Finder::new(&PNG_IEND);
    static ref JPEG_START: Finder<'static> = Finder::new(&JPEG_SOI);
    static ref JPEG_END: Finder<'static> = Finder::new(&JPEG_EOI);
    static ref GIF87_START: Finder<'static> = Finder::new(&GIF87A);
    static ref GIF89_START: Finder<'static> = Finder::new(&GIF89A);
}

/// Format passes in the order they are applied
pub const PASS_ORDER: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif];

/// Why a start signature did not become a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Start offset lies inside an already accepted range
    Claimed,
    /// The byte after the start marker is not a plausible first segment
    WeakSignature,
    /// No terminator found before the end of the container
    Unterminated,
    /// Candidate shorter than the minimum-size floor
    BelowFloor(usize),
    /// Candidate range intersects an already accepted range
    Overlap,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Claimed => write!(f, "start lies inside an accepted image"),
            Rejection::WeakSignature => write!(f, "signature not followed by a segment marker"),
            Rejection::Unterminated => write!(f, "no terminator found"),
            Rejection::BelowFloor(len) => write!(f, "{} bytes is below the minimum size", len),
            Rejection::Overlap => write!(f, "range overlaps an accepted image"),
        }
    }
}

/// A start signature that was inspected but not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedMatch {
    pub offset: usize,
    pub format: ImageFormat,
    pub reason: Rejection,
}

/// Accepted candidates plus every rejected match
#[derive(Debug, Default)]
pub struct ScanOutcome<'a> {
    pub candidates: Vec<ImageCandidate<'a>>,
    pub rejected: Vec<RejectedMatch>,
}

impl<'a> ScanOutcome<'a> {
    /// Number of accepted candidates of `format`
    pub fn accepted_count(&self, format: ImageFormat) -> usize {
        self.candidates.iter().filter(|c| c.format == format).count()
    }

    /// Number of rejected matches of `format`
    pub fn rejected_count(&self, format: ImageFormat) -> usize {
        self.rejected.iter().filter(|r| r.format == format).count()
    }
}

/// Heuristic scanner for embedded PNG, JPEG and GIF images
#[derive(Debug, Clone)]
pub struct SignatureScanner {
    min_image_bytes: usize,
}

impl Default for SignatureScanner {
    fn default() -> Self {
        SignatureScanner::new(DEFAULT_MIN_IMAGE_BYTES)
    }
}

impl SignatureScanner {
    /// Create a scanner that discards candidates shorter than `min_image_bytes`
    pub fn new(min_image_bytes: usize) -> Self {
        SignatureScanner { min_image_bytes }
    }

    pub fn min_image_bytes(&self) -> usize {
        self.min_image_bytes
    }

    /// Scan `data` and return accepted candidates
    pub fn scan<'a>(&self, data: &'a [u8]) -> Vec<ImageCandidate<'a>> {
        self.scan_detailed(data).candidates
    }

    /// Scan `data` and return accepted candidates with every rejection
    pub fn scan_detailed<'a>(&self, data: &'a [u8]) -> ScanOutcome<'a> {
        let mut claims = ClaimedRegions::new();
        let mut outcome = ScanOutcome::default();

        for format in PASS_ORDER {
            self.scan_pass(format, data, &mut claims, &mut outcome);
        }

        debug!(
            "Scanned {} bytes: {} candidates accepted, {} matches rejected",
            data.len(),
            outcome.candidates.len(),
            outcome.rejected.len()
        );
        outcome
    }

    fn scan_pass<'a>(&self, format: ImageFormat, data: &'a [u8],
                     claims: &mut ClaimedRegions, outcome: &mut ScanOutcome<'a>) {
        let mut terminators = TerminatorSearch::default();
        for start in start_offsets(format, data) {
            match self.inspect(format, data, start, claims, &mut terminators) {
                Ok(range) => {
                    debug!("Accepted {} candidate at {}..{}", format, range.start, range.end);
                    outcome.candidates.push(ImageCandidate::scanned(data, range, format));
                }
                Err(reason) => {
                    debug!("Rejected {} signature at {}: {}", format, start, reason);
                    outcome.rejected.push(RejectedMatch { offset: start, format, reason });
                }
            }
        }
    }

    /// Decide whether the signature at `start` is an image, claiming its range if so
    fn inspect(&self, format: ImageFormat, data: &[u8], start: usize,
               claims: &mut ClaimedRegions,
               terminators: &mut TerminatorSearch) -> Result<Range<usize>, Rejection> {
        if claims.contains(start) {
            return Err(Rejection::Claimed);
        }

        let end = match format {
            ImageFormat::Png => png_end(data, start, terminators),
            ImageFormat::Jpeg => {
                if !has_jpeg_lead_marker(data, start) {
                    return Err(Rejection::WeakSignature);
                }
                jpeg_end(data, start, terminators)
            }
            ImageFormat::Gif => gif_end(data, start, terminators),
            ImageFormat::Webp | ImageFormat::Bmp => None,
        }
        .ok_or(Rejection::Unterminated)?;

        let len = end - start;
        if len < self.min_image_bytes {
            return Err(Rejection::BelowFloor(len));
        }

        let range = start..end;
        if !claims.claim(range.clone()) {
            return Err(Rejection::Overlap);
        }
        Ok(range)
    }
}

/// Offsets of every start signature of `format`, in increasing order
fn start_offsets(format: ImageFormat, data: &[u8]) -> Vec<usize> {
    match format {
        ImageFormat::Png => PNG_START.find_iter(data).collect(),
        ImageFormat::Jpeg => JPEG_START.find_iter(data).collect(),
        ImageFormat::Gif => {
            let mut offsets: Vec<usize> = GIF87_START
                .find_iter(data)
                .chain(GIF89_START.find_iter(data))
                .collect();
            offsets.sort_unstable();
            offsets
        }
        ImageFormat::Webp | ImageFormat::Bmp => Vec::new(),
    }
}

/// The last terminator search of one format pass
///
/// Start offsets arrive in increasing order. A search from an offset at or
/// after the previous one but not past its hit returns the same hit, and a
/// search after one that found nothing finds nothing, so each pass reads the
/// container at most once.
#[derive(Debug, Default)]
struct TerminatorSearch {
    last: Option<(usize, Option<usize>)>,
}

impl TerminatorSearch {
    /// Absolute offset of the first terminator at or after `from`
    fn find<F>(&mut self, data: &[u8], from: usize, search: F) -> Option<usize>
    where
        F: FnOnce(&[u8]) -> Option<usize>,
    {
        if let Some((searched, hit)) = self.last {
            if from >= searched {
                match hit {
                    None => return None,
                    Some(pos) if pos >= from => return Some(pos),
                    Some(_) => {}
                }
            }
        }

        let hit = data.get(from..).and_then(search).map(|offset| from + offset);
        self.last = Some((from, hit));
        hit
    }
}

/// End of a PNG: the IEND chunk's length field starts 4 bytes before the
/// marker and the chunk is 12 bytes long
fn png_end(data: &[u8], start: usize, terminators: &mut TerminatorSearch) -> Option<usize> {
    let marker = terminators.find(data, start + PNG.len(), |rest| PNG_END.find(rest))?;
    let end = marker - PNG_CHUNK_LENGTH_FIELD + PNG_IEND_CHUNK_LEN;
    (end <= data.len()).then_some(end)
}

/// End of a JPEG: first end-of-image marker after the start, inclusive
fn jpeg_end(data: &[u8], start: usize, terminators: &mut TerminatorSearch) -> Option<usize> {
    let marker = terminators.find(data, start + 2, |rest| JPEG_END.find(rest))?;
    Some(marker + JPEG_EOI.len())
}

/// End of a GIF: first trailer byte at least six bytes after the start, inclusive
fn gif_end(data: &[u8], start: usize, terminators: &mut TerminatorSearch) -> Option<usize> {
    let trailer = terminators.find(data, start + GIF_TRAILER_SKIP, |rest| memchr(GIF_TRAILER, rest))?;
    Some(trailer + 1)
}

/// Whether the byte after `FF D8 FF` opens a segment a real JPEG starts with
///
/// Accepts APPn, DQT, DHT, SOF0/SOF2 and COM.
fn has_jpeg_lead_marker(data: &[u8], start: usize) -> bool {
    match data.get(start + JPEG_SOI.len()) {
        Some(&marker) => matches!(marker, 0xE0..=0xEF | 0xDB | 0xC4 | 0xC0 | 0xC2 | 0xFE),
        None => false,
    }
}
