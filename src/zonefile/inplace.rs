//! A zonefile scanner keeping the whole file in memory.
//!
//! The zonefile scanner provided by this module reads the entire zonefile
//! into memory and then produces the records it contains one by one. While
//! doing so, it processes the directives that change how records are
//! interpreted, keeping track of their effects in a [`DirectiveState`].
//!
//! Scanning stops at the first error. Every error carries the position in
//! the source and the text of the token that caused it.

use crate::base::iana::{Class, Rtype};
use crate::base::name::{Name, NameBuilder, NameError};
use crate::base::scan::{
    BadSymbol, Scan, Scanner, ScannerError, Symbol, SymbolOctetsError,
};
use crate::base::ttl::Ttl;
use crate::config::Config;
use crate::rdata::rfc1035::MAX_CHARSTR_LEN;
use crate::rdata::{DynKind, DynTarget, TtlRange, ZoneRecordData};
use crate::zonefile::directive::{AddrLimits, DirectiveState};
use bytes::Bytes;
use core::str::FromStr;
use core::{cmp, fmt};
use std::sync::Arc;
use tracing::trace;

//------------ ScannedRecord -------------------------------------------------

/// A record as it was found in a zone file.
///
/// Next to the record itself, this contains the address limits that were in
/// effect when the record was read and the line it started on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScannedRecord {
    /// The absolute owner name.
    pub owner: Name,

    /// The TTL of the record.
    ///
    /// For dynamic records, this is the maximum of their TTL range.
    pub ttl: Ttl,

    /// The record data.
    pub data: ZoneRecordData,

    /// The address limits in effect for this record.
    pub limits: AddrLimits,

    /// The line the record started on.
    pub line: usize,
}

impl fmt::Display for ScannedRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.data.rtype(), self.data.as_dynamic()) {
            (_, Some((kind, target))) => write!(
                f,
                "{} {} {} {}",
                self.owner,
                target.ttl(),
                kind,
                self.data
            ),
            (Some(rtype), None) => write!(
                f,
                "{} {} {} {}",
                self.owner, self.ttl, rtype, self.data
            ),
            (None, None) => {
                write!(f, "{} {} {}", self.owner, self.ttl, self.data)
            }
        }
    }
}

//------------ Zonefile ------------------------------------------------------

/// A zonefile to be scanned.
///
/// A value of this type holds the data to be scanned in memory and allows
/// fetching records by acting as an iterator. Directives are processed
/// internally and never handed out.
///
/// The function [`load`][Self::load] can be used to create a value directly
/// from a reader. The [`next_record`][Self::next_record] method provides an
/// alternative to iterating with a more question mark friendly signature.
#[derive(Clone, Debug)]
pub struct Zonefile {
    /// The data to scan.
    buf: SourceBuf,

    /// The values set by directives so far.
    state: DirectiveState,

    /// The last owner.
    last_owner: Option<Name>,

    /// Whether long character strings in TXT records are split.
    txt_autosplit: bool,

    /// The name of the source for error messages.
    source: Option<Arc<str>>,
}

impl Zonefile {
    /// Creates a new, empty value for the zone with the given apex.
    pub fn new(apex: Name) -> Self {
        Self::with_buf(apex, Vec::new())
    }

    /// Creates a new, empty value using the settings from `config`.
    pub fn with_config(apex: Name, config: &Config) -> Self {
        let mut res = Self::new(apex);
        res.apply_config(config);
        res
    }

    /// Creates a new value using the given buffer.
    fn with_buf(apex: Name, buf: Vec<u8>) -> Self {
        Zonefile {
            buf: SourceBuf::new(buf),
            state: DirectiveState::new(apex, Ttl::DAY),
            last_owner: None,
            txt_autosplit: true,
            source: None,
        }
    }

    /// Creates a value by loading the data from the given reader.
    pub fn load(
        read: &mut impl std::io::Read,
        apex: Name,
    ) -> Result<Self, std::io::Error> {
        let mut buf = Vec::new();
        read.read_to_end(&mut buf)?;
        Ok(Self::with_buf(apex, buf))
    }

    /// Appends the given slice to the end of the buffer.
    pub fn extend_from_slice(&mut self, slice: &[u8]) {
        self.buf.buf.extend_from_slice(slice)
    }

    /// Applies the zone related settings of the configuration.
    pub fn apply_config(&mut self, config: &Config) {
        self.set_default_ttl(config.zones_default_ttl);
        self.set_txt_autosplit(config.txt_autosplit);
    }

    /// Sets the initial default TTL.
    ///
    /// This is the TTL for records without one until the first `$TTL`
    /// directive.
    pub fn set_default_ttl(&mut self, ttl: Ttl) {
        self.state.set_default_ttl(ttl)
    }

    /// Sets whether long TXT strings are split or rejected.
    pub fn set_txt_autosplit(&mut self, autosplit: bool) {
        self.txt_autosplit = autosplit
    }

    /// Sets the name of the source used in error messages.
    pub fn set_source_name(&mut self, name: impl Into<Arc<str>>) {
        self.source = Some(name.into())
    }

    /// Returns the apex of the zone.
    pub fn apex(&self) -> &Name {
        self.state.apex()
    }

    /// Returns the next record in the zonefile.
    ///
    /// Returns `Ok(None)` if the end of the file has been reached. Returns
    /// an error if scanning the next entry failed.
    ///
    /// This method is identical to the `next` method of the iterator
    /// implementation but has the return type transposed for easier use
    /// with the question mark operator.
    pub fn next_record(&mut self) -> Result<Option<ScannedRecord>, Error> {
        loop {
            match EntryScanner::new(self).scan_entry()? {
                ScannedEntry::Record(record) => return Ok(Some(record)),
                ScannedEntry::Directive | ScannedEntry::Empty => {}
                ScannedEntry::Eof => return Ok(None),
            }
        }
    }

    /// Enriches an entry error with position information.
    fn error(&self, err: EntryError) -> Error {
        Error {
            source: self.source.clone(),
            line: self.buf.tok_line,
            col: self.buf.tok_col,
            token: self.buf.token_text(),
            err,
        }
    }
}

impl Iterator for Zonefile {
    type Item = Result<ScannedRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

//------------ ScannedEntry --------------------------------------------------

/// A raw scanned entry of a zonefile.
#[derive(Clone, Debug)]
enum ScannedEntry {
    /// A record that should be handed to the user.
    Record(ScannedRecord),

    /// A directive that has been applied to the state.
    Directive,

    /// An empty entry.
    Empty,

    /// The end of file was reached.
    Eof,
}

//------------ EntryScanner --------------------------------------------------

/// The entry scanner for a zonefile.
///
/// A value of this type is created for each entry. It implements the
/// [`Scanner`] interface.
#[derive(Debug)]
struct EntryScanner<'a> {
    /// The zonefile we are working on.
    zonefile: &'a mut Zonefile,
}

/// The TTL field of a record.
enum TtlField {
    Plain(Ttl),
    Range(TtlRange),
}

/// The type field of a record.
enum TypeField {
    Static(Rtype),
    Dynamic(DynKind),
}

/// The fields between owner and record data.
enum Ctr {
    Class,
    Ttl(TtlField),
    Type(TypeField),
}

/// The directives we know about.
enum Directive {
    Ttl,
    Origin,
    AddrLimitV4,
    AddrLimitV6,
}

impl<'a> EntryScanner<'a> {
    /// Creates a new entry scanner using the given zonefile.
    fn new(zonefile: &'a mut Zonefile) -> Self {
        EntryScanner { zonefile }
    }

    /// Scans a single entry from the zone file.
    fn scan_entry(&mut self) -> Result<ScannedEntry, Error> {
        self._scan_entry().map_err(|err| self.zonefile.error(err))
    }

    /// Scans a single entry from the zone file.
    ///
    /// This is identical to `scan_entry` but with a more convenient error
    /// type.
    fn _scan_entry(&mut self) -> Result<ScannedEntry, EntryError> {
        self.zonefile.buf.next_item()?;
        let line = self.zonefile.buf.tok_line;
        match self.zonefile.buf.cat {
            ItemCat::None => Ok(ScannedEntry::Eof),
            ItemCat::LineFeed => Ok(ScannedEntry::Empty),
            ItemCat::Unquoted | ItemCat::Quoted => {
                if self.zonefile.buf.has_space {
                    // Indented entry: a record with the last owner as the
                    // owner.
                    let owner = match self.zonefile.last_owner.as_ref() {
                        Some(owner) => owner.clone(),
                        None => return Err(EntryError::missing_last_owner()),
                    };
                    self.scan_owner_record(owner, line)
                } else if matches!(self.zonefile.buf.cat, ItemCat::Unquoted)
                    && self.zonefile.buf.peek_symbol()
                        == Some(Symbol::Char('$'))
                {
                    self.scan_directive()
                } else {
                    let owner = self.scan_owner()?;
                    self.zonefile.last_owner = Some(owner.clone());
                    self.scan_owner_record(owner, line)
                }
            }
        }
    }

    /// Scans the owner name of an entry.
    fn scan_owner(&mut self) -> Result<Name, EntryError> {
        self.with_token(|syms, state| {
            let owner = make_name(syms, state.origin())?;
            if state.is_in_zone(&owner) {
                Ok(owner)
            } else {
                Err(EntryError::owner_outside_zone())
            }
        })
    }

    /// Scans a regular record with the given owner name.
    fn scan_owner_record(
        &mut self,
        owner: Name,
        line: usize,
    ) -> Result<ScannedEntry, EntryError> {
        let (ttl, rtype) = self.scan_ctr()?;
        let default_ttl = self.zonefile.state.default_ttl();

        let (ttl, data) = match rtype {
            TypeField::Dynamic(kind) => {
                let range = match ttl {
                    Some(TtlField::Range(range)) => range,
                    Some(TtlField::Plain(ttl)) => TtlRange::from_max(ttl),
                    None => TtlRange::from_max(default_ttl),
                };
                let target = DynTarget::scan(range, self)?;
                (range.max(), ZoneRecordData::dynamic(kind, target))
            }
            TypeField::Static(rtype) => {
                let ttl = match ttl {
                    Some(TtlField::Range(_)) => {
                        return Err(EntryError::ttl_range_not_dynamic())
                    }
                    Some(TtlField::Plain(ttl)) => ttl,
                    None => default_ttl,
                };
                (ttl, ZoneRecordData::scan(rtype, self)?)
            }
        };

        self.zonefile.buf.require_line_feed()?;

        let record = ScannedRecord {
            owner,
            ttl,
            data,
            limits: self.zonefile.state.limits(),
            line,
        };
        trace!("line {}: {}", line, record);
        Ok(ScannedEntry::Record(record))
    }

    /// Scans the TTL, class, and type portions of a regular record.
    ///
    /// Possible options are:
    ///
    /// ```text
    /// [<TTL>] [<class>] <type>
    /// [<class>] [<TTL>] <type>
    /// ```
    fn scan_ctr(
        &mut self,
    ) -> Result<(Option<TtlField>, TypeField), EntryError> {
        let mut ttl = None;
        let mut class = false;
        loop {
            match self.scan_ascii_str(classify_ctr)? {
                Ctr::Ttl(value) if ttl.is_none() => ttl = Some(value),
                Ctr::Class if !class => class = true,
                Ctr::Type(rtype) => return Ok((ttl, rtype)),
                _ => return Err(EntryError::expected_rtype()),
            }
        }
    }

    /// Scans a directive.
    fn scan_directive(&mut self) -> Result<ScannedEntry, EntryError> {
        let directive = self.scan_ascii_str(|s| {
            if s.eq_ignore_ascii_case("$TTL") {
                Ok(Directive::Ttl)
            } else if s.eq_ignore_ascii_case("$ORIGIN") {
                Ok(Directive::Origin)
            } else if s.eq_ignore_ascii_case("$ADDR_LIMIT_V4") {
                Ok(Directive::AddrLimitV4)
            } else if s.eq_ignore_ascii_case("$ADDR_LIMIT_V6") {
                Ok(Directive::AddrLimitV6)
            } else if s.eq_ignore_ascii_case("$INCLUDE")
                || s.eq_ignore_ascii_case("$GENERATE")
            {
                Err(EntryError::unsupported_directive())
            } else {
                Err(EntryError::unknown_directive())
            }
        })?;
        match directive {
            Directive::Ttl => {
                let ttl = Ttl::scan(self)?;
                self.zonefile.buf.require_line_feed()?;
                trace!("$TTL {}", ttl);
                self.zonefile.state.set_default_ttl(ttl);
            }
            Directive::Origin => {
                let origin = self.with_token(|syms, state| {
                    let origin = make_name(syms, state.origin())?;
                    if state.is_in_zone(&origin) {
                        Ok(origin)
                    } else {
                        Err(EntryError::origin_outside_zone())
                    }
                })?;
                self.zonefile.buf.require_line_feed()?;
                trace!("$ORIGIN {}", origin);
                self.zonefile
                    .state
                    .set_origin(origin)
                    .map_err(|err| EntryError(err.as_str()))?;
            }
            Directive::AddrLimitV4 => {
                let limit = u32::scan(self)?;
                self.zonefile.buf.require_line_feed()?;
                trace!("$ADDR_LIMIT_V4 {}", limit);
                self.zonefile.state.set_limit_v4(limit);
            }
            Directive::AddrLimitV6 => {
                let limit = u32::scan(self)?;
                self.zonefile.buf.require_line_feed()?;
                trace!("$ADDR_LIMIT_V6 {}", limit);
                self.zonefile.state.set_limit_v6(limit);
            }
        }
        Ok(ScannedEntry::Directive)
    }

    /// Reads the symbols of the current token and processes them.
    ///
    /// The closure is called before advancing to the next item, so errors
    /// it returns point to the token.
    fn with_token<F, T>(&mut self, op: F) -> Result<T, EntryError>
    where
        F: FnOnce(&[Symbol], &DirectiveState) -> Result<T, EntryError>,
    {
        self.zonefile.buf.require_token()?;
        let mut syms = Vec::new();
        while let Some(sym) = self.zonefile.buf.next_symbol()? {
            syms.push(sym);
        }
        let res = op(&syms, &self.zonefile.state)?;
        self.zonefile.buf.next_item()?;
        Ok(res)
    }
}

/// Decides what a token between owner and record data is.
fn classify_ctr(s: &str) -> Result<Ctr, EntryError> {
    if s.as_bytes().first().map_or(false, u8::is_ascii_digit) {
        if s.contains('/') {
            TtlRange::from_str(s)
                .map(|range| Ctr::Ttl(TtlField::Range(range)))
                .map_err(|err| EntryError(err.as_str()))
        } else {
            Ttl::from_str(s)
                .map(|ttl| Ctr::Ttl(TtlField::Plain(ttl)))
                .map_err(|err| EntryError(err.as_str()))
        }
    } else if let Some(kind) = DynKind::from_mnemonic(s.as_bytes()) {
        Ok(Ctr::Type(TypeField::Dynamic(kind)))
    } else if let Ok(rtype) = Rtype::from_str(s) {
        Ok(Ctr::Type(TypeField::Static(rtype)))
    } else if let Ok(class) = Class::from_str(s) {
        if class == Class::IN {
            Ok(Ctr::Class)
        } else {
            Err(EntryError::unsupported_class())
        }
    } else {
        Err(EntryError::unsupported_rtype())
    }
}

/// Assembles a domain name from the symbols of a token.
///
/// A token consisting of `@` only is the origin. Names not ending in a dot
/// are relative to the origin.
fn make_name(syms: &[Symbol], origin: &Name) -> Result<Name, EntryError> {
    match syms {
        [] => return Err(EntryError::name(NameError::EmptyLabel)),
        [Symbol::Char('@')] => return Ok(origin.clone()),
        [Symbol::Char('.')] => return Ok(Name::root()),
        _ => {}
    }
    let mut builder = NameBuilder::new();
    let mut absolute = false;
    for (i, sym) in syms.iter().enumerate() {
        if *sym == Symbol::Char('.') {
            builder.end_label().map_err(EntryError::name)?;
            absolute = i + 1 == syms.len();
        } else {
            builder.push(sym.into_octet()?).map_err(EntryError::name)?;
        }
    }
    if absolute {
        builder.into_name()
    } else {
        builder.append_origin(origin)
    }
    .map_err(EntryError::name)
}

impl<'a> Scanner for EntryScanner<'a> {
    type Error = EntryError;

    fn has_space(&self) -> bool {
        self.zonefile.buf.has_space
    }

    fn continues(&mut self) -> bool {
        !matches!(self.zonefile.buf.cat, ItemCat::None | ItemCat::LineFeed)
    }

    fn scan_symbols<F>(&mut self, mut op: F) -> Result<(), Self::Error>
    where
        F: FnMut(Symbol) -> Result<(), Self::Error>,
    {
        self.zonefile.buf.require_token()?;
        while let Some(sym) = self.zonefile.buf.next_symbol()? {
            op(sym)?;
        }
        self.zonefile.buf.next_item()
    }

    fn scan_ascii_str<F, T>(&mut self, op: F) -> Result<T, Self::Error>
    where
        F: FnOnce(&str) -> Result<T, Self::Error>,
    {
        self.with_token(|syms, _| {
            let mut res = String::with_capacity(syms.len());
            for sym in syms {
                res.push(char::from(sym.into_ascii()?));
            }
            op(&res)
        })
    }

    fn scan_octets(&mut self) -> Result<Bytes, Self::Error> {
        self.with_token(|syms, _| Ok(symbols_to_octets(syms).into()))
    }

    fn scan_name(&mut self) -> Result<Name, Self::Error> {
        self.with_token(|syms, state| make_name(syms, state.origin()))
    }

    fn scan_charstr(&mut self) -> Result<Bytes, Self::Error> {
        self.with_token(|syms, _| {
            let octets = symbols_to_octets(syms);
            if octets.len() > MAX_CHARSTR_LEN {
                Err(EntryError::long_charstr())
            } else {
                Ok(octets.into())
            }
        })
    }

    fn scan_charstr_entry(&mut self) -> Result<Vec<Bytes>, Self::Error> {
        let autosplit = self.zonefile.txt_autosplit;
        let mut res = Vec::new();
        loop {
            self.with_token(|syms, _| {
                let octets = Bytes::from(symbols_to_octets(syms));
                if octets.len() <= MAX_CHARSTR_LEN {
                    res.push(octets);
                } else if autosplit {
                    let mut rest = octets;
                    while !rest.is_empty() {
                        let len = cmp::min(rest.len(), MAX_CHARSTR_LEN);
                        res.push(rest.split_to(len));
                    }
                } else {
                    return Err(EntryError::oversized_charstr());
                }
                Ok(())
            })?;
            if !self.continues() {
                break;
            }
        }
        Ok(res)
    }

    fn scan_opt_unknown_marker(&mut self) -> Result<bool, Self::Error> {
        self.zonefile.buf.skip_unknown_marker()
    }
}

/// Converts symbols into the octets they represent.
fn symbols_to_octets(syms: &[Symbol]) -> Vec<u8> {
    let mut res = Vec::with_capacity(syms.len());
    for sym in syms {
        sym.push_octets(&mut res);
    }
    res
}

//------------ SourceBuf -----------------------------------------------------

/// The buffer to read data from.
#[derive(Clone, Debug)]
struct SourceBuf {
    /// The complete source data.
    buf: Vec<u8>,

    /// Where in `buf` is the next symbol to read.
    start: usize,

    /// The category of the current item.
    cat: ItemCat,

    /// Is the token preceeded by white space?
    has_space: bool,

    /// How many unclosed opening parentheses did we see at `start`?
    parens: usize,

    /// The line number of the current line.
    line_num: usize,

    /// The position of the first character of the current line.
    line_start: usize,

    /// The position of the start of the most recent token.
    tok_start: usize,

    /// The line of the most recent token.
    tok_line: usize,

    /// The column of the most recent token.
    tok_col: usize,
}

impl SourceBuf {
    /// Creates a new buffer for the given data.
    fn new(buf: Vec<u8>) -> Self {
        SourceBuf {
            buf,
            start: 0,
            cat: ItemCat::None,
            has_space: false,
            parens: 0,
            line_num: 1,
            line_start: 0,
            tok_start: 0,
            tok_line: 1,
            tok_col: 1,
        }
    }

    /// Remembers the current position as the start of a token.
    fn mark_token(&mut self) {
        self.tok_start = self.start;
        self.tok_line = self.line_num;
        self.tok_col = self.start + 1 - self.line_start;
    }

    /// Returns the text of the most recent token for error messages.
    fn token_text(&self) -> String {
        let tail = match self.buf.get(self.tok_start..) {
            Some(tail) => tail,
            None => return String::new(),
        };
        let len = match tail.first() {
            Some(b'"') => tail[1..]
                .iter()
                .position(|&ch| ch == b'"' || ch == b'\n')
                .map(|pos| {
                    if tail[pos + 1] == b'"' {
                        pos + 2
                    } else {
                        pos + 1
                    }
                })
                .unwrap_or(tail.len()),
            Some(b'(') | Some(b')') => 1,
            _ => tail
                .iter()
                .position(|ch| {
                    matches!(
                        ch,
                        b' ' | b'\t' | b'\r' | b'\n' | b'(' | b')' | b';'
                    )
                })
                .unwrap_or(tail.len()),
        };
        String::from_utf8_lossy(&tail[..cmp::min(len, 64)]).into_owned()
    }

    /// Checks whether the current item is a token.
    fn require_token(&self) -> Result<(), EntryError> {
        match self.cat {
            ItemCat::None => Err(EntryError::short_buf()),
            ItemCat::LineFeed => Err(EntryError::end_of_entry()),
            ItemCat::Quoted | ItemCat::Unquoted => Ok(()),
        }
    }

    /// Requires that we have reached the end of the entry.
    ///
    /// This is either a line feed or the end of the data.
    fn require_line_feed(&self) -> Result<(), EntryError> {
        if matches!(self.cat, ItemCat::LineFeed | ItemCat::None) {
            Ok(())
        } else {
            Err(EntryError::trailing_tokens())
        }
    }

    /// Returns the next symbol but doesn’t advance the buffer.
    ///
    /// Returns `None` if the current item is a line feed or end-of-file
    /// or if we have reached the end of token or if it is not a valid symbol.
    fn peek_symbol(&self) -> Option<Symbol> {
        match self.cat {
            ItemCat::None | ItemCat::LineFeed => None,
            ItemCat::Unquoted => {
                let sym =
                    match Symbol::from_slice_index(&self.buf, self.start) {
                        Ok(Some((sym, _))) => sym,
                        Ok(None) | Err(_) => return None,
                    };

                if sym.is_word_char() {
                    Some(sym)
                } else {
                    None
                }
            }
            ItemCat::Quoted => {
                let sym =
                    match Symbol::from_slice_index(&self.buf, self.start) {
                        Ok(Some((sym, _))) => sym,
                        Ok(None) | Err(_) => return None,
                    };

                if sym == Symbol::Char('"') {
                    None
                } else {
                    Some(sym)
                }
            }
        }
    }

    /// Skips over the unknown marker token.
    ///
    /// Returns whether it did skip the token.
    fn skip_unknown_marker(&mut self) -> Result<bool, EntryError> {
        if !matches!(self.cat, ItemCat::Unquoted) {
            return Ok(false);
        }

        let (sym, sym_end) =
            match Symbol::from_slice_index(&self.buf, self.start) {
                Ok(Some(some)) => some,
                _ => return Ok(false),
            };

        if sym != Symbol::SimpleEscape(b'#') {
            return Ok(false);
        }

        match Symbol::from_slice_index(&self.buf, sym_end) {
            Ok(Some((sym, _))) if sym.is_word_char() => return Ok(false),
            Ok(_) => {}
            Err(_) => return Ok(false),
        }

        self.start = sym_end;
        self.cat = ItemCat::None;
        self.next_item()?;
        Ok(true)
    }

    /// Returns the next symbol of the current token.
    ///
    /// Returns `None` if the current item is a line feed or end-of-file
    /// or if we have reached the end of token.
    ///
    /// If it returns `Some(_)`, advances `self.start` to the start of the
    /// next symbol.
    fn next_symbol(&mut self) -> Result<Option<Symbol>, EntryError> {
        match self.cat {
            ItemCat::None | ItemCat::LineFeed => Ok(None),
            ItemCat::Unquoted => {
                let (sym, sym_end) =
                    match Symbol::from_slice_index(&self.buf, self.start) {
                        Ok(Some((sym, sym_end))) => (sym, sym_end),
                        Ok(None) => {
                            self.cat = ItemCat::None;
                            return Ok(None);
                        }
                        Err(err) => return Err(EntryError::bad_symbol(err)),
                    };

                if !sym.is_word_char() {
                    self.cat = ItemCat::None;
                    Ok(None)
                } else {
                    self.start = sym_end;
                    Ok(Some(sym))
                }
            }
            ItemCat::Quoted => {
                let (sym, sym_end) =
                    match Symbol::from_slice_index(&self.buf, self.start) {
                        Ok(Some((sym, sym_end))) => (sym, sym_end),
                        Ok(None) | Err(SymbolOctetsError::ShortInput) => {
                            return Err(EntryError::unterminated_quote())
                        }
                        Err(err) => return Err(EntryError::bad_symbol(err)),
                    };

                self.start = sym_end;
                if sym == Symbol::Char('"') {
                    self.cat = ItemCat::None;
                    Ok(None)
                } else {
                    if sym == Symbol::Char('\n') {
                        self.line_num += 1;
                        self.line_start = self.start;
                    }
                    Ok(Some(sym))
                }
            }
        }
    }

    /// Prepares the next item.
    ///
    /// This must only ever by called if the current item is not a token or
    /// if the current token has been read all the way to the end.
    fn next_item(&mut self) -> Result<(), EntryError> {
        self.has_space = false;

        loop {
            let ch = match self.buf.get(self.start) {
                Some(&ch) => ch,
                None => {
                    self.cat = ItemCat::None;
                    if self.parens > 0 {
                        self.mark_token();
                        return Err(EntryError::unclosed_parens());
                    }
                    return Ok(());
                }
            };

            // Skip and mark actual white space.
            if matches!(ch, b' ' | b'\t') {
                self.has_space = true;
                self.start += 1;
            }
            // CR: ignore for compatibility with Windows-style line endings.
            else if ch == b'\r' {
                self.start += 1;
            }
            // Opening parenthesis: increase group level.
            else if ch == b'(' {
                self.parens += 1;
                self.start += 1;
            }
            // Closing parenthesis: decrease group level or error out.
            else if ch == b')' {
                if self.parens > 0 {
                    self.parens -= 1;
                    self.start += 1;
                } else {
                    self.mark_token();
                    return Err(EntryError::unbalanced_parens());
                }
            }
            // Semicolon: comment -- skip to line end.
            else if ch == b';' {
                self.start += 1;
                while let Some(true) =
                    self.buf.get(self.start).map(|ch| *ch != b'\n')
                {
                    self.start += 1;
                }
                // Next iteration deals with the LF.
            }
            // Line end: skip over it. Ignore if we are inside a paren group.
            else if ch == b'\n' {
                self.start += 1;
                self.line_num += 1;
                self.line_start = self.start;
                if self.parens == 0 {
                    self.cat = ItemCat::LineFeed;
                    break;
                }
            }
            // Double quote: quoted token
            else if ch == b'"' {
                self.mark_token();
                self.start += 1;
                self.cat = ItemCat::Quoted;
                break;
            }
            // Else: unquoted token
            else {
                self.mark_token();
                self.cat = ItemCat::Unquoted;
                break;
            }
        }
        Ok(())
    }
}

//------------ ItemCat -------------------------------------------------------

/// The category of the current item in a source buffer.
#[derive(Clone, Copy, Debug)]
enum ItemCat {
    /// We don’t currently have an item.
    ///
    /// This is used to indicate that we have reached the end of a token or
    /// that we have reached the end of the buffer.
    None,

    /// An unquoted normal token.
    ///
    /// This is a token that did not start with a double quote and will end
    /// at the next white space.
    Unquoted,

    /// A quoted normal token.
    ///
    /// This is a token that did start with a double quote and will end at
    /// the next unescaped double quote.
    ///
    /// Note that the start position of the buffer indicates the first
    /// character that is part of the content, i.e., the position right after
    /// the opening double quote.
    Quoted,

    /// A line feed.
    ///
    /// This is an empty token. The start position is right after the actual
    /// line feed.
    LineFeed,
}

//------------ EntryError ----------------------------------------------------

/// An error returned by the entry scanner.
#[derive(Clone, Copy, Debug)]
struct EntryError(&'static str);

impl EntryError {
    fn bad_symbol(err: SymbolOctetsError) -> Self {
        EntryError(err.as_str())
    }

    fn name(err: NameError) -> Self {
        EntryError(err.as_str())
    }

    fn long_charstr() -> Self {
        EntryError("character string exceeds 255 octets")
    }

    fn oversized_charstr() -> Self {
        EntryError("oversized TXT chunk")
    }

    fn unbalanced_parens() -> Self {
        EntryError("unbalanced parentheses")
    }

    fn unclosed_parens() -> Self {
        EntryError("unbalanced parentheses at end of file")
    }

    fn unterminated_quote() -> Self {
        EntryError("unterminated quoted string")
    }

    fn missing_last_owner() -> Self {
        EntryError("missing previous owner")
    }

    fn owner_outside_zone() -> Self {
        EntryError("owner outside zone")
    }

    fn origin_outside_zone() -> Self {
        EntryError("origin outside zone")
    }

    fn expected_rtype() -> Self {
        EntryError("expected record type")
    }

    fn unsupported_rtype() -> Self {
        EntryError("unsupported record type")
    }

    fn unsupported_class() -> Self {
        EntryError("unsupported class")
    }

    fn ttl_range_not_dynamic() -> Self {
        EntryError("TTL range on non-dynamic record")
    }

    fn unsupported_directive() -> Self {
        EntryError("unsupported directive")
    }

    fn unknown_directive() -> Self {
        EntryError("unknown directive")
    }
}

impl ScannerError for EntryError {
    fn custom(msg: &'static str) -> Self {
        EntryError(msg)
    }

    fn end_of_entry() -> Self {
        Self("unexpected end of entry")
    }

    fn short_buf() -> Self {
        Self("unexpected end of file")
    }

    fn trailing_tokens() -> Self {
        Self("trailing tokens")
    }
}

impl From<BadSymbol> for EntryError {
    fn from(_: BadSymbol) -> Self {
        EntryError("illegal character")
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for EntryError {}

//------------ Error ---------------------------------------------------------

/// A zone file contained invalid syntax.
#[derive(Clone, Debug)]
pub struct Error {
    source: Option<Arc<str>>,
    line: usize,
    col: usize,
    token: String,
    err: EntryError,
}

impl Error {
    /// The name of the source, if one was set.
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The line the error happened on, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The column the offending token started in, starting at 1.
    pub fn col(&self) -> usize {
        self.col
    }

    /// The text of the offending token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// A description of what went wrong.
    pub fn message(&self) -> &'static str {
        self.err.0
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(source) = self.source.as_ref() {
            write!(f, "{}:", source)?;
        }
        write!(f, "{}:{}: {}", self.line, self.col, self.err)?;
        if !self.token.is_empty() {
            write!(f, " at '{}'", self.token)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[derive(serde::Deserialize)]
    struct TestCase {
        origin: String,
        zonefile: String,
        #[serde(default)]
        autosplit: Option<bool>,
        #[serde(default)]
        result: Vec<String>,
        #[serde(default)]
        error: Option<String>,
    }

    impl TestCase {
        fn test(yaml: &str) {
            let case = serde_yaml::from_str::<Self>(yaml).unwrap();
            let mut zone =
                Zonefile::new(Name::from_str(&case.origin).unwrap());
            zone.extend_from_slice(case.zonefile.as_bytes());
            if let Some(autosplit) = case.autosplit {
                zone.set_txt_autosplit(autosplit);
            }
            let mut result = case.result.as_slice();
            loop {
                match zone.next_record() {
                    Ok(Some(record)) => {
                        let (first, tail) = result.split_first().unwrap();
                        assert_eq!(first, &record.to_string());
                        result = tail;
                    }
                    Ok(None) => {
                        assert!(case.error.is_none());
                        break;
                    }
                    Err(err) => {
                        assert_eq!(case.error.as_deref(), Some(err.message()));
                        break;
                    }
                }
            }
            assert!(result.is_empty(), "missing records: {:?}", result);
        }
    }

    fn parse(origin: &str, data: &str) -> Result<Vec<ScannedRecord>, Error> {
        let mut zone = Zonefile::new(Name::from_str(origin).unwrap());
        zone.extend_from_slice(data.as_bytes());
        zone.collect()
    }

    fn parse_err(data: &str) -> Error {
        parse("example.com.", data).unwrap_err()
    }

    #[test]
    fn test_basic_yaml() {
        TestCase::test(include_str!("../../test-data/zonefiles/basic.yaml"));
    }

    #[test]
    fn test_escape_yaml() {
        TestCase::test(include_str!("../../test-data/zonefiles/escape.yaml"));
    }

    #[test]
    fn test_unknown_yaml() {
        TestCase::test(include_str!(
            "../../test-data/zonefiles/unknown.yaml"
        ));
    }

    #[test]
    fn test_dynamic_yaml() {
        TestCase::test(include_str!(
            "../../test-data/zonefiles/dynamic.yaml"
        ));
    }

    #[test]
    fn test_directives_yaml() {
        TestCase::test(include_str!(
            "../../test-data/zonefiles/directives.yaml"
        ));
    }

    #[test]
    fn test_strlen_yaml() {
        TestCase::test(include_str!("../../test-data/zonefiles/strlen.yaml"));
    }

    #[test]
    fn test_stroverflow_yaml() {
        TestCase::test(include_str!(
            "../../test-data/zonefiles/stroverflow.yaml"
        ));
    }

    #[test]
    fn record_lines_and_limits() {
        let records = parse(
            "example.com.",
            "www A 192.0.2.1\n\
             $ADDR_LIMIT_V4 2\n\
             \n\
             mail ( A\n\
               192.0.2.2 )\n\
             \tA 192.0.2.3\n",
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[0].limits, AddrLimits::UNLIMITED);
        assert_eq!(records[1].line, 4);
        assert_eq!(records[1].limits.v4(), 2);
        assert_eq!(records[2].line, 6);
        assert_eq!(records[2].owner, Name::from_str("mail.example.com").unwrap());
    }

    #[test]
    fn quoted_dollar_owner() {
        let records =
            parse("example.com.", "\"$x\" A 192.0.2.1\n\tA 192.0.2.2\n")
                .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].owner,
            Name::from_str("$x.example.com.").unwrap()
        );
        assert_eq!(records[1].owner, records[0].owner);
        assert_eq!(
            parse_err("$x A 192.0.2.1\n").message(),
            "unknown directive"
        );
    }

    #[test]
    fn windows_line_endings() {
        let records =
            parse("example.com.", "www A 192.0.2.1\r\nftp A 192.0.2.2\r\n")
                .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn no_final_line_feed() {
        let records = parse("example.com.", "www A 192.0.2.1").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn error_positions() {
        let err = parse_err("www A 192.0.2.1\nfoo.example.org. A 192.0.2.2\n");
        assert_eq!(err.message(), "owner outside zone");
        assert_eq!(err.line(), 2);
        assert_eq!(err.col(), 1);
        assert_eq!(err.token(), "foo.example.org.");

        let err = parse_err("www A 192.0.2.1 )\n");
        assert_eq!(err.message(), "unbalanced parentheses");
        assert_eq!(err.line(), 1);
        assert_eq!(err.col(), 17);
        assert_eq!(err.token(), ")");

        let err = parse_err("www ( A 192.0.2.1\n");
        assert_eq!(err.message(), "unbalanced parentheses at end of file");

        let err = parse_err("www TXT \"abc\n");
        assert_eq!(err.message(), "unterminated quoted string");
        assert_eq!(err.col(), 9);

        let err = parse_err("www TXT a\\4b\n");
        assert_eq!(err.message(), "illegal escape sequence");

        let err = parse_err("www A 192.0.2.1 extra\n");
        assert_eq!(err.message(), "trailing tokens");
        assert_eq!(err.token(), "extra");

        let err = parse_err("www A 192.0.2.256\n");
        assert_eq!(err.message(), "expected IPv4 address");
        assert_eq!(err.token(), "192.0.2.256");
    }

    #[test]
    fn error_display() {
        let mut zone =
            Zonefile::new(Name::from_str("example.com.").unwrap());
        zone.set_source_name("example.com.zone");
        zone.extend_from_slice(b"www CH A 192.0.2.1\n");
        let err = zone.next_record().unwrap_err();
        assert_eq!(err.source_name(), Some("example.com.zone"));
        assert_eq!(
            err.to_string(),
            "example.com.zone:1:5: unsupported class at 'CH'"
        );
    }

    #[test]
    fn generic_errors() {
        for (data, msg) in [
            ("a A \\# 4 c0000201\n", "generic record data for supported type"),
            ("a TYPE1 \\# 4 c0000201\n", "generic record data for supported type"),
            ("a TYPE65280 \\# 2 abc\n", "odd number of hex digits in generic data"),
            ("a TYPE65280 \\# 3 abcd\n", "generic data has incorrect length"),
            ("a TYPE65280 \\# 1 xy\n", "expected hex digit in generic data"),
            ("a TYPE65280 abcd\n", "unsupported record type"),
            ("a FOO 1\n", "unsupported record type"),
        ] {
            assert_eq!(parse_err(data).message(), msg, "{}", data);
        }
    }

    #[test]
    fn dynamic_errors() {
        for (data, msg) in [
            ("www 30/300 DYNA a!b\n", "TTL minimum exceeds maximum"),
            ("www 300/30 A 192.0.2.1\n", "TTL range on non-dynamic record"),
            ("www DYNA geoip\n", "dynamic record data must be 'plugin!resource'"),
            ("www DYNA !www\n", "dynamic record data must be 'plugin!resource'"),
            ("www DYNC geoip!\n", "dynamic record data must be 'plugin!resource'"),
        ] {
            assert_eq!(parse_err(data).message(), msg, "{}", data);
        }
    }

    #[test]
    fn directive_errors() {
        for (data, msg) in [
            ("$INCLUDE other.zone\n", "unsupported directive"),
            ("$GENERATE 1-10 h$ A 192.0.2.$\n", "unsupported directive"),
            ("$FOO bar\n", "unknown directive"),
            ("$ORIGIN example.org.\n", "origin outside zone"),
            ("$ADDR_LIMIT_V4 x\n", "expected decimal number"),
            ("$ADDR_LIMIT_V6 -1\n", "expected decimal number"),
            ("$TTL 1H30M\n", "invalid time value"),
            ("$TTL 300 extra\n", "trailing tokens"),
            ("$TTL\n", "unexpected end of entry"),
        ] {
            assert_eq!(parse_err(data).message(), msg, "{}", data);
        }
    }

    #[test]
    fn soa_time_units() {
        let records = parse(
            "example.com.",
            "@ SOA ns hm 1 2h 30m 2w 5m\n",
        )
        .unwrap();
        match records[0].data {
            ZoneRecordData::Soa(ref soa) => {
                assert_eq!(soa.refresh(), Ttl::from_secs(7200));
                assert_eq!(soa.retry(), Ttl::from_secs(1800));
                assert_eq!(soa.expire(), Ttl::from_secs(1209600));
                assert_eq!(soa.minimum(), Ttl::from_secs(300));
            }
            _ => panic!("not an SOA record"),
        }
        assert_eq!(
            parse_err("@ SOA ns hm 1 1H30M 1 1 1\n").message(),
            "invalid time value"
        );
        assert_eq!(
            parse_err("@ SOA ns hm 1 9999999999 1 1 1\n").message(),
            "time value overflow"
        );
    }

    #[test]
    fn missing_owner() {
        let err = parse_err("  A 192.0.2.1\n");
        assert_eq!(err.message(), "missing previous owner");
    }

    #[test]
    fn default_ttl_config() {
        let mut config = Config::default();
        config.zones_default_ttl = Ttl::from_secs(600);
        let mut zone = Zonefile::with_config(
            Name::from_str("example.com.").unwrap(),
            &config,
        );
        zone.extend_from_slice(b"www A 192.0.2.1\n");
        let record = zone.next_record().unwrap().unwrap();
        assert_eq!(record.ttl, Ttl::from_secs(600));
    }
}
