//! Build one Easy2 transfer and attach it to the shared multi handle.

use crate::error::FetchError;

use super::handler::BodyCollector;
use super::{FetchOptions, Target};

const USER_AGENT: &str = concat!("hostgrab/", env!("CARGO_PKG_VERSION"));

pub(super) type TransferHandle = curl::multi::Easy2Handle<BodyCollector>;

/// Configure a GET for `target` and add it to `multi`.
pub(super) fn add_transfer(
    multi: &curl::multi::Multi,
    target: &Target,
    options: &FetchOptions,
) -> Result<TransferHandle, FetchError> {
    let mut easy = curl::easy::Easy2::new(BodyCollector::default());
    easy.url(target.wire.as_str()).map_err(FetchError::Setup)?;
    easy.get(true).map_err(FetchError::Setup)?;
    easy.useragent(USER_AGENT).map_err(FetchError::Setup)?;
    easy.timeout(options.timeout).map_err(FetchError::Setup)?;
    if let Some(connect) = options.connect_timeout {
        easy.connect_timeout(connect).map_err(FetchError::Setup)?;
    }
    easy.follow_location(options.follow_redirects)
        .map_err(FetchError::Setup)?;
    if options.follow_redirects {
        easy.max_redirections(options.max_redirections)
            .map_err(FetchError::Setup)?;
    }
    multi
        .add2(easy)
        .map_err(|e| FetchError::Driver(format!("curl multi add: {}", e)))
}
