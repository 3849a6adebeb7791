//! Plinth text engine
//!
//! UTF-16 string handling for the plinth foundation layer:
//!
//! - **[`UString`]**: a growable, zero-terminated string of UTF-16 code
//!   units with search, split, replace and case mapping
//! - **[`StringMatcher`]**: a reusable prepared pattern for repeated searches
//! - **Transcoding**: validated two-pass conversion from and to Latin-1,
//!   UTF-8, UTF-16 and UTF-32 in [`encoding`], reporting malformed input as an
//!   [`Error`]
//! - **[`FixedString`]**: names interned in a
//!   [`SharedStringPool`](plinth_mem::SharedStringPool), compared by id and
//!   numeric suffix
//!
//! # Examples
//!
//! ```
//! use plinth_text::{CaseSensitivity, SplitBehavior, UString};
//!
//! let path = UString::from("assets/meshes//crate.mesh");
//! let parts = path.split(&UString::from("/"), SplitBehavior::SkipEmptyParts, CaseSensitivity::Sensitive);
//!
//! assert_eq!(parts.len(), 3);
//! assert!(parts[2].ends_with(&UString::from(".MESH"), CaseSensitivity::Insensitive));
//! ```

pub mod algorithm;
pub mod char_traits;
pub mod encoding;
pub mod error;
pub mod fixed_string;
pub mod matcher;
pub mod uchar;
pub mod ustring;

pub use char_traits::{CaseSensitivity, SplitBehavior};
pub use error::{Encoding, Error, Result};
pub use fixed_string::FixedString;
pub use matcher::StringMatcher;
pub use uchar::{UChar, UCharExt};
pub use ustring::UString;
