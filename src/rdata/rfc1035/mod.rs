//! Record data from [RFC 1035]: initial record types.
//!
//! This RFC defines the initial set of record types.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035

pub use self::a::A;
pub use self::mx::Mx;
pub use self::name::{Cname, Ns, Ptr};
pub use self::soa::Soa;
pub use self::txt::{Txt, MAX_CHARSTR_LEN};

pub(crate) use self::txt::fmt_quoted;

mod a;
mod mx;
mod name;
mod soa;
mod txt;
