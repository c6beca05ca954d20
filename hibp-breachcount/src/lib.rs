//! Checks passwords against the [Pwned Passwords](https://haveibeenpwned.com/Passwords)
//! range API without disclosing them.
//!
//! Each password is hashed with [`hibp_sha1`] and the uppercase hex digest is
//! split into a 5-character prefix and a 35-character suffix. Only the prefix is
//! sent to `https://api.pwnedpasswords.com/range/{PREFIX}`. The service returns
//! every `SUFFIX:COUNT` sharing that prefix, and the suffix is matched locally.
//!
//! Lookups fail soft: [`BreachChecker::lookup`] never returns an error. A
//! transport failure, a non-200 status or an unparsable body all come back as
//! [`LookupResult::Failed`], which is reported as `-1` and is distinct from a
//! genuine count of zero.
//!
//! # Usage
//!
//! ```no_run
//! use hibp_breachcount::{BreachChecker, Config};
//!
//! # async fn run() -> Result<(), hibp_breachcount::Error> {
//! let checker = BreachChecker::from_config(&Config::default())?;
//! let result = checker.lookup("hunter2").await;
//! println!("seen {result} times");
//! # Ok(())
//! # }
//! ```
//!
//! The [`form`] module attaches the results to a form submission, one hidden
//! `Password Breach Count` field per password field.

pub mod checker;
pub mod config;
pub mod error;
pub mod form;
pub mod range;
pub mod source;

pub use checker::{BreachChecker, FAILED_SENTINEL, LookupResult};
pub use config::{Config, HIBP_LOG_ENV, HIBP_RANGE_URL_ENV};
pub use error::Error;
pub use form::{FieldKind, Form, FormField, FormOptions, augment};
pub use range::{HashSplit, PREFIX_LEN, SUFFIX_LEN, find_count};
pub use source::{RangeClient, RangeSource};
