pub mod error;
pub mod extract;
pub mod normalize;
pub mod result;
pub mod validate;

pub use error::ScanError;
pub use extract::{ContentKind, Extraction, LicenseRecord, ScrapedLink, extract};
pub use normalize::{DocumentId, UrlKind, absolute, canonical_url};
pub use result::{GOOD_RESPONSE, ValidationResult};
pub use validate::{DEFAULT_MAX_IN_FLIGHT, DEFAULT_TIMEOUT, LinkCache, USER_AGENT, Validator};
