//! # referencing
//!
//! Reference resolution for `jsonvalid` schemas.
//!
//! A reference string is resolved against the root schema document and a table of
//! externally supplied documents, in this order:
//!
//! 1. A node anywhere in the root document whose `id` (or `$id`) equals the reference verbatim.
//! 2. A percent-decoded JSON pointer into the root document (a leading `#` and a trailing `/`
//!    are dropped).
//! 3. An external document selected by the exact text before `#`, optionally narrowed by the
//!    pointer after it.
//!
//! Resolution never fails loudly: an unresolvable reference is simply `None`.
mod pointer;
mod resolver;

pub use pointer::{parse_index, pointer, unescape_segment};
pub use resolver::{find_by_id, resolve, Documents};
