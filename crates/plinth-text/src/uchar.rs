//! Code-unit classification and simple case mapping.
//!
//! Strings store UTF-16 code units ([`UChar`]). Case mapping works one unit
//! at a time and only applies mappings that stay a single BMP unit; anything
//! else (surrogates, multi-character expansions such as `ß` → `SS`) maps to
//! itself.

/// One UTF-16 code unit.
pub type UChar = u16;

/// Classification and case mapping on a single code unit.
///
/// ```
/// use plinth_text::UCharExt;
///
/// let a = b'a' as u16;
/// assert_eq!(a.to_upper(), b'A' as u16);
/// assert!(a.is_lower());
/// assert!(!a.is_upper());
///
/// // Caseless units count as both.
/// let digit = b'7' as u16;
/// assert!(digit.is_upper() && digit.is_lower());
/// ```
pub trait UCharExt: Copy {
    /// Upper-case mapping, or the unit itself if there is none.
    fn to_upper(self) -> Self;
    /// Lower-case mapping, or the unit itself if there is none.
    fn to_lower(self) -> Self;
    /// Case-folded form used by case-insensitive comparison.
    fn fold_case(self) -> Self;
    /// Whether upper-casing leaves the unit unchanged.
    fn is_upper(self) -> bool;
    /// Whether lower-casing leaves the unit unchanged.
    fn is_lower(self) -> bool;
    /// Whether the unit is Unicode whitespace.
    fn is_space(self) -> bool;
    /// Whether the unit is half of a surrogate pair.
    fn is_surrogate(self) -> bool;
    /// Whether the unit is a leading (high) surrogate.
    fn is_high_surrogate(self) -> bool;
    /// Whether the unit is a trailing (low) surrogate.
    fn is_low_surrogate(self) -> bool;
}

fn single_unit<I: Iterator<Item = char>>(mut mapped: I, unit: UChar) -> UChar {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => u16::try_from(u32::from(c)).unwrap_or(unit),
        _ => unit,
    }
}

impl UCharExt for UChar {
    #[inline]
    fn to_upper(self) -> Self {
        if self < 0x80 {
            return (self as u8).to_ascii_uppercase().into();
        }
        match char::from_u32(u32::from(self)) {
            Some(c) => single_unit(c.to_uppercase(), self),
            None => self,
        }
    }

    #[inline]
    fn to_lower(self) -> Self {
        if self < 0x80 {
            return (self as u8).to_ascii_lowercase().into();
        }
        match char::from_u32(u32::from(self)) {
            Some(c) => single_unit(c.to_lowercase(), self),
            None => self,
        }
    }

    #[inline]
    fn fold_case(self) -> Self {
        self.to_upper().to_lower()
    }

    #[inline]
    fn is_upper(self) -> bool {
        self.to_upper() == self
    }

    #[inline]
    fn is_lower(self) -> bool {
        self.to_lower() == self
    }

    #[inline]
    fn is_space(self) -> bool {
        char::from_u32(u32::from(self)).is_some_and(char::is_whitespace)
    }

    #[inline]
    fn is_surrogate(self) -> bool {
        (0xD800..=0xDFFF).contains(&self)
    }

    #[inline]
    fn is_high_surrogate(self) -> bool {
        (0xD800..=0xDBFF).contains(&self)
    }

    #[inline]
    fn is_low_surrogate(self) -> bool {
        (0xDC00..=0xDFFF).contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(c: char) -> UChar {
        c as u32 as UChar
    }

    #[test]
    fn test_ascii_case_mapping() {
        assert_eq!(u('q').to_upper(), u('Q'));
        assert_eq!(u('Q').to_lower(), u('q'));
        assert_eq!(u('_').to_upper(), u('_'));
    }

    #[test]
    fn test_bmp_case_mapping() {
        assert_eq!(u('é').to_upper(), u('É'));
        assert_eq!(u('Σ').to_lower(), u('σ'));
        assert_eq!(u('ж').to_upper(), u('Ж'));
    }

    #[test]
    fn test_expanding_mapping_is_identity() {
        // 'ß' upper-cases to "SS"; per-unit mapping leaves it alone.
        assert_eq!(u('ß').to_upper(), u('ß'));
        assert!(u('ß').is_upper());
    }

    #[test]
    fn test_fold_case_unifies() {
        assert_eq!(u('A').fold_case(), u('a').fold_case());
        assert_eq!(u('Ω').fold_case(), u('ω').fold_case());
        assert_ne!(u('a').fold_case(), u('b').fold_case());
    }

    #[test]
    fn test_surrogates_map_to_themselves() {
        assert!(0xD83Du16.is_surrogate());
        assert!(0xD83Du16.is_high_surrogate());
        assert!(0xDE00u16.is_low_surrogate());
        assert_eq!(0xD83Du16.to_upper(), 0xD83D);
        assert_eq!(0xDE00u16.to_lower(), 0xDE00);
    }

    #[test]
    fn test_is_space() {
        assert!(u(' ').is_space());
        assert!(u('\t').is_space());
        assert!(0x3000u16.is_space());
        assert!(!u('x').is_space());
        assert!(!0xD800u16.is_space());
    }
}
