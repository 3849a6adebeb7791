//! Validated transcoding between UTF-16 code units and other encodings.
//!
//! Every conversion is two-pass. A `measure_*` function validates the input
//! and returns the exact destination length; the matching `decode_*` function
//! then fills a buffer of that length. Encoders do the same internally and
//! return an exactly-sized `Vec`.
//!
//! Malformed input is always an [`Error`] carrying the position of the first
//! offending unit, never an empty result.
//!
//! ```
//! use plinth_text::encoding;
//!
//! let bytes = "héllo".as_bytes();
//! let len = encoding::measure_utf8(bytes).unwrap();
//! let mut units = vec![0u16; len];
//! encoding::decode_utf8(bytes, &mut units).unwrap();
//!
//! assert_eq!(len, 5);
//! assert_eq!(encoding::encode_utf8(&units).unwrap(), bytes);
//! ```

use std::char::DecodeUtf16Error;

use plinth_log::debug;

use crate::error::{Encoding, Error, Result};
use crate::uchar::{UChar, UCharExt};

fn malformed(encoding: Encoding, position: usize) -> Error {
    debug!("rejected {} input at position {}", encoding, position);
    Error::Malformed { encoding, position }
}

fn unrepresentable(encoding: Encoding, position: usize, unit: u32) -> Error {
    debug!(
        "U+{:04X} at position {} has no {} form",
        unit, position, encoding
    );
    Error::Unrepresentable {
        encoding,
        position,
        unit,
    }
}

#[track_caller]
fn check_room(needed: usize, out: &[UChar]) {
    plinth_mem::ensure!(
        out.len() >= needed,
        "decode buffer holds {} units, {} needed",
        out.len(),
        needed
    );
}

/// Number of units needed to hold Latin-1 `bytes`. Latin-1 never expands.
pub fn measure_latin1(bytes: &[u8]) -> usize {
    bytes.len()
}

/// Zero-extends each Latin-1 byte into `out`. Returns the units written.
///
/// # Panics
///
/// If `out` is shorter than `bytes`.
pub fn decode_latin1(bytes: &[u8], out: &mut [UChar]) -> usize {
    check_room(bytes.len(), out);
    for (dst, &byte) in out.iter_mut().zip(bytes) {
        *dst = UChar::from(byte);
    }
    bytes.len()
}

fn validate_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|err| malformed(Encoding::Utf8, err.valid_up_to()))
}

/// Validates UTF-8 `bytes` and returns the number of UTF-16 units they decode
/// to.
///
/// # Errors
///
/// [`Error::Malformed`] for overlong forms, encoded surrogates, code points
/// past U+10FFFF, stray continuation bytes and truncated sequences. The
/// position is the byte offset where the invalid sequence starts.
pub fn measure_utf8(bytes: &[u8]) -> Result<usize> {
    Ok(validate_utf8(bytes)?.encode_utf16().count())
}

/// Decodes UTF-8 `bytes` into `out`. Returns the units written.
///
/// # Errors
///
/// As [`measure_utf8`].
pub fn decode_utf8(bytes: &[u8], out: &mut [UChar]) -> Result<usize> {
    let text = validate_utf8(bytes)?;
    let mut written = 0;
    for unit in text.encode_utf16() {
        check_room(written + 1, out);
        out[written] = unit;
        written += 1;
    }
    Ok(written)
}

fn validate_utf16(units: &[UChar]) -> Result<()> {
    let mut index = 0;
    while index < units.len() {
        let unit = units[index];
        if unit.is_high_surrogate() {
            match units.get(index + 1) {
                Some(next) if next.is_low_surrogate() => index += 2,
                _ => return Err(malformed(Encoding::Utf16, index)),
            }
        } else if unit.is_low_surrogate() {
            return Err(malformed(Encoding::Utf16, index));
        } else {
            index += 1;
        }
    }
    Ok(())
}

/// Validates UTF-16 `units` and returns their length.
///
/// # Errors
///
/// [`Error::Malformed`] at the first unpaired surrogate.
pub fn measure_utf16(units: &[u16]) -> Result<usize> {
    validate_utf16(units)?;
    Ok(units.len())
}

/// Copies validated UTF-16 `units` into `out`. Returns the units written.
///
/// # Errors
///
/// As [`measure_utf16`].
pub fn decode_utf16(units: &[u16], out: &mut [UChar]) -> Result<usize> {
    validate_utf16(units)?;
    check_room(units.len(), out);
    out[..units.len()].copy_from_slice(units);
    Ok(units.len())
}

fn utf32_char(position: usize, code_point: u32) -> Result<char> {
    char::from_u32(code_point).ok_or_else(|| malformed(Encoding::Utf32, position))
}

/// Validates UTF-32 `code_points` and returns the number of UTF-16 units they
/// encode to.
///
/// # Errors
///
/// [`Error::Malformed`] at the first surrogate or value above U+10FFFF.
pub fn measure_utf32(code_points: &[u32]) -> Result<usize> {
    code_points
        .iter()
        .enumerate()
        .try_fold(0, |len, (position, &cp)| {
            Ok(len + utf32_char(position, cp)?.len_utf16())
        })
}

/// Encodes UTF-32 `code_points` as UTF-16 into `out`. Returns the units
/// written.
///
/// # Errors
///
/// As [`measure_utf32`].
pub fn decode_utf32(code_points: &[u32], out: &mut [UChar]) -> Result<usize> {
    let mut written = 0;
    for (position, &cp) in code_points.iter().enumerate() {
        let c = utf32_char(position, cp)?;
        check_room(written + c.len_utf16(), out);
        written += c.encode_utf16(&mut out[written..]).len();
    }
    Ok(written)
}

/// Walks `units` as UTF-16, yielding each scalar with its unit position.
fn scalars(
    units: &[UChar],
) -> impl Iterator<Item = (usize, std::result::Result<char, DecodeUtf16Error>)> + '_ {
    let mut position = 0;
    char::decode_utf16(units.iter().copied()).map(move |item| {
        let at = position;
        position += match &item {
            Ok(c) => c.len_utf16(),
            Err(_) => 1,
        };
        (at, item)
    })
}

/// Encodes `units` as Latin-1.
///
/// # Errors
///
/// [`Error::Unrepresentable`] at the first unit above U+00FF.
pub fn encode_latin1(units: &[UChar]) -> Result<Vec<u8>> {
    if let Some(position) = units.iter().position(|&u| u > 0xFF) {
        return Err(unrepresentable(
            Encoding::Latin1,
            position,
            u32::from(units[position]),
        ));
    }
    Ok(units.iter().map(|&u| u as u8).collect())
}

/// Encodes `units` as UTF-8.
///
/// # Errors
///
/// [`Error::Malformed`] with [`Encoding::Utf16`] at the first unpaired
/// surrogate in the source.
pub fn encode_utf8(units: &[UChar]) -> Result<Vec<u8>> {
    let mut len = 0;
    for (position, item) in scalars(units) {
        match item {
            Ok(c) => len += c.len_utf8(),
            Err(_) => return Err(malformed(Encoding::Utf16, position)),
        }
    }

    let mut bytes = Vec::with_capacity(len);
    let mut buf = [0u8; 4];
    for c in char::decode_utf16(units.iter().copied()).flatten() {
        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
    Ok(bytes)
}

/// Encodes `units` as UTF-32.
///
/// # Errors
///
/// [`Error::Malformed`] with [`Encoding::Utf16`] at the first unpaired
/// surrogate in the source.
pub fn encode_utf32(units: &[UChar]) -> Result<Vec<u32>> {
    let mut len = 0;
    for (position, item) in scalars(units) {
        if item.is_err() {
            return Err(malformed(Encoding::Utf16, position));
        }
        len += 1;
    }

    let mut code_points = Vec::with_capacity(len);
    code_points.extend(char::decode_utf16(units.iter().copied()).flatten().map(u32::from));
    Ok(code_points)
}

/// Decodes `units` into a `String`.
///
/// # Errors
///
/// [`Error::Malformed`] with [`Encoding::Utf16`] at the first unpaired
/// surrogate.
pub fn to_std_string(units: &[UChar]) -> Result<String> {
    scalars(units)
        .map(|(position, item)| item.map_err(|_| malformed(Encoding::Utf16, position)))
        .collect()
}

/// Decodes `units` into a `String`, replacing unpaired surrogates with
/// U+FFFD.
pub fn to_string_lossy(units: &[UChar]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|item| item.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
