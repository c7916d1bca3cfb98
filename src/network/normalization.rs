use url::{ParseError, Url};

use crate::network::errors::NetworkError;

// * Resolves a scraped product link into an absolute, fetchable URL.
// *
// * Logic:
// * 1. Absolute links are used as-is.
// * 2. Relative links are joined with the vendor base, when one is configured.
// * 3. Fragments are stripped; they never change the served page.
// * 4. Only http/https are fetchable.
pub fn resolve_product_url(raw: &str, base: Option<&Url>) -> Result<Url, NetworkError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(NetworkError::InvalidUrl(raw.to_string()));
    }

    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base
                .join(raw)
                .map_err(|e| NetworkError::InvalidUrl(format!("{raw}: {e}")))?,
            None => return Err(NetworkError::InvalidUrl(format!("{raw}: relative URL without base"))),
        },
        Err(e) => return Err(NetworkError::InvalidUrl(format!("{raw}: {e}"))),
    };

    url.set_fragment(None);

    // ! Anything but http(s) would hand the client a scheme it cannot fetch
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(NetworkError::InvalidUrl(format!("{raw}: unsupported scheme {other}"))),
    }
}
