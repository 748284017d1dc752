//! Domain names.
//!
//! Every name handled by this crate is absolute. Relative names only exist
//! while scanning a zone file where they are completed with the current
//! origin via a [`NameBuilder`].

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::str::FromStr;
use core::{fmt, iter};

use bytes::Bytes;

use super::scan::Symbol;

//------------ Name ----------------------------------------------------------

/// An absolute domain name.
///
/// The name is kept in its uncompressed wire format, i.e., as a sequence of
/// labels each preceded by a length octet and ending in the empty root
/// label. Comparison and hashing ignore ASCII case as required by
/// [RFC 4343] while the original spelling is kept for display.
///
/// [RFC 4343]: https://tools.ietf.org/html/rfc4343
#[derive(Clone)]
pub struct Name {
    octets: Bytes,
}

/// The maximum length of a domain name in wire format.
pub const MAX_NAME_LEN: usize = 255;

/// The maximum length of the content of a single label.
pub const MAX_LABEL_LEN: usize = 63;

impl Name {
    /// Returns the root name.
    pub fn root() -> Self {
        Name {
            octets: Bytes::from_static(b"\0"),
        }
    }

    /// Creates a name from an iterator over label contents.
    ///
    /// The root label is added at the end and must not be part of `labels`.
    pub fn from_labels<I, L>(labels: I) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut builder = NameBuilder::new();
        for label in labels {
            for &ch in label.as_ref() {
                builder.push(ch)?;
            }
            builder.end_label()?;
        }
        builder.into_name()
    }

    /// Returns whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.octets.len() == 1
    }

    /// Returns the wire format representation of the name.
    pub fn as_octets(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns an iterator over the contents of the non-root labels.
    pub fn labels(&self) -> Labels {
        Labels {
            octets: self.octets.as_ref(),
        }
    }

    /// Returns the number of non-root labels.
    pub fn label_count(&self) -> usize {
        self.labels().count()
    }

    /// Returns the name with the leftmost label removed.
    ///
    /// Returns `None` for the root name.
    pub fn parent(&self) -> Option<Name> {
        let len = *self.octets.first()? as usize;
        if len == 0 {
            return None;
        }
        Some(Name {
            octets: self.octets.slice(len + 1..),
        })
    }

    /// Returns whether `base` is equal to or a parent of this name.
    pub fn ends_with(&self, base: &Name) -> bool {
        let mut name = Some(self.clone());
        while let Some(current) = name {
            if current.octets.len() < base.octets.len() {
                return false;
            }
            if current.octets.len() == base.octets.len() {
                return current == *base;
            }
            name = current.parent();
        }
        false
    }

    /// Returns an iterator over this name and all its parents up to `apex`.
    ///
    /// The iterator is empty if the name isn’t below `apex`.
    pub fn ancestors_to<'a>(
        &self,
        apex: &'a Name,
    ) -> impl Iterator<Item = Name> + 'a {
        let mut next = if self.ends_with(apex) {
            Some(self.clone())
        } else {
            None
        };
        iter::from_fn(move || {
            let current = next.take()?;
            if current != *apex {
                next = current.parent();
            }
            Some(current)
        })
    }

    fn cmp_key(&self) -> impl Iterator<Item = u8> + '_ {
        self.octets.iter().map(u8::to_ascii_lowercase)
    }
}

//--- PartialEq, Eq, PartialOrd, Ord, Hash

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.octets.eq_ignore_ascii_case(&other.octets)
    }
}

impl Eq for Name {}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key().cmp(other.cmp_key())
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for ch in self.cmp_key() {
            state.write_u8(ch)
        }
    }
}

//--- FromStr

impl FromStr for Name {
    type Err = NameError;

    /// Parses a name in presentation format.
    ///
    /// Since there is no origin to append, names without a trailing dot are
    /// treated as absolute as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "." {
            return Ok(Name::root());
        }
        let mut builder = NameBuilder::new();
        let mut chars = s.chars();
        let mut last_was_dot = false;
        while let Some(sym) =
            Symbol::from_chars(&mut chars).map_err(|_| NameError::BadEscape)?
        {
            last_was_dot = false;
            match sym {
                Symbol::Char('.') => {
                    builder.end_label()?;
                    last_was_dot = true;
                }
                sym => builder.push_symbol(sym)?,
            }
        }
        if !last_was_dot && builder.in_label() {
            builder.end_label()?;
        }
        builder.into_name()
    }
}

//--- Display and Debug

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for label in self.labels() {
            for &ch in label {
                if ch == b'.'
                    || ch == b'\\'
                    || ch == b'"'
                    || ch == b';'
                    || ch == b'('
                    || ch == b')'
                    || ch == b'@'
                    || ch == b'$'
                {
                    write!(f, "\\{}", ch as char)?;
                } else if ch.is_ascii_graphic() {
                    write!(f, "{}", ch as char)?;
                } else {
                    write!(f, "\\{:03}", ch)?;
                }
            }
            f.write_str(".")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

//------------ Labels --------------------------------------------------------

/// An iterator over the contents of the non-root labels of a name.
#[derive(Clone, Debug)]
pub struct Labels<'a> {
    octets: &'a [u8],
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, tail) = self.octets.split_first()?;
        if len == 0 {
            return None;
        }
        let (label, tail) = tail.split_at(len as usize);
        self.octets = tail;
        Some(label)
    }
}

//------------ NameBuilder ---------------------------------------------------

/// Assembles a name label by label.
///
/// Octets are pushed one by one into the current label. A label is closed
/// with [`end_label`][Self::end_label]. The name is completed either as an
/// absolute name via [`into_name`][Self::into_name] or by appending an
/// origin via [`append_origin`][Self::append_origin].
#[derive(Clone, Debug, Default)]
pub struct NameBuilder {
    octets: Vec<u8>,

    /// The index of the length octet of the label currently being built.
    label_start: Option<usize>,
}

impl NameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether nothing at all has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    /// Returns whether a label has been started but not ended.
    pub fn in_label(&self) -> bool {
        self.label_start.is_some()
    }

    /// Appends an octet to the current label, starting one if necessary.
    pub fn push(&mut self, ch: u8) -> Result<(), NameError> {
        let start = match self.label_start {
            Some(start) => start,
            None => {
                self.octets.push(0);
                let start = self.octets.len() - 1;
                self.label_start = Some(start);
                start
            }
        };
        if self.octets.len() - start > MAX_LABEL_LEN {
            return Err(NameError::LongLabel);
        }
        if self.octets.len() + 1 >= MAX_NAME_LEN {
            return Err(NameError::LongName);
        }
        self.octets.push(ch);
        Ok(())
    }

    /// Appends the octets a symbol stands for.
    ///
    /// Unescaped non-ASCII characters are added in their UTF-8 encoding.
    pub fn push_symbol(&mut self, sym: Symbol) -> Result<(), NameError> {
        match sym {
            Symbol::Char(ch) => {
                let mut buf = [0u8; 4];
                for &octet in ch.encode_utf8(&mut buf).as_bytes() {
                    self.push(octet)?;
                }
                Ok(())
            }
            Symbol::SimpleEscape(ch) | Symbol::DecimalEscape(ch) => {
                self.push(ch)
            }
        }
    }

    /// Ends the current label.
    ///
    /// Fails if no octets have been pushed since the last label ended,
    /// since empty labels are only allowed as the final root label.
    pub fn end_label(&mut self) -> Result<(), NameError> {
        match self.label_start.take() {
            Some(start) => {
                self.octets[start] = (self.octets.len() - start - 1) as u8;
                Ok(())
            }
            None => Err(NameError::EmptyLabel),
        }
    }

    /// Finishes an absolute name.
    pub fn into_name(mut self) -> Result<Name, NameError> {
        if self.label_start.is_some() {
            self.end_label()?;
        }
        self.octets.push(0);
        if self.octets.len() > MAX_NAME_LEN {
            return Err(NameError::LongName);
        }
        Ok(Name {
            octets: self.octets.into(),
        })
    }

    /// Finishes a relative name by appending `origin`.
    pub fn append_origin(mut self, origin: &Name) -> Result<Name, NameError> {
        if self.label_start.is_some() {
            self.end_label()?;
        }
        self.octets.extend_from_slice(origin.as_octets());
        if self.octets.len() > MAX_NAME_LEN {
            return Err(NameError::LongName);
        }
        Ok(Name {
            octets: self.octets.into(),
        })
    }
}

//------------ NameError -----------------------------------------------------

/// A domain name could not be assembled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameError {
    /// A label was longer than 63 octets.
    LongLabel,

    /// The name was longer than 255 octets.
    LongName,

    /// An empty label appeared other than as the root label.
    EmptyLabel,

    /// An illegal escape sequence was used.
    BadEscape,
}

impl NameError {
    pub fn as_str(self) -> &'static str {
        match self {
            NameError::LongLabel => "label exceeds 63 octets",
            NameError::LongName => "name exceeds 255 octets",
            NameError::EmptyLabel => "empty label",
            NameError::BadEscape => "illegal escape sequence",
        }
    }
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for NameError {}

//============ Tests =========================================================
