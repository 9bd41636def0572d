// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deep links carrying the remote model path in a query parameter.
//!
//! Decoding is a single percent-decode followed by stripping leading
//! separators. Interior `/` are kept, and an encoded `%2F` inside a path
//! segment decodes once to `/`, never twice.

use reqwest::Url;
use thiserror::Error;

/// Query parameter holding the model path.
pub const MODEL_PARAM: &str = "model";

/// Deep link could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid deep link `{0}`")]
pub struct DeepLinkError(pub String);

/// Strip leading separators from a model path.
pub fn normalize_model_path(raw: &str) -> &str {
    raw.trim_start_matches(['/', '\\'])
}

/// Model path carried by `link`, if any.
pub fn model_from_link(link: &Url) -> Option<String> {
    link.query_pairs()
        .find(|(k, _)| k == MODEL_PARAM)
        .map(|(_, v)| normalize_model_path(&v).to_owned())
        .filter(|p| !p.is_empty())
}

/// Parse `link` and return its model path.
pub fn parse_link(link: &str) -> Result<Option<String>, DeepLinkError> {
    let url = Url::parse(link).map_err(|_| DeepLinkError(link.to_owned()))?;
    Ok(model_from_link(&url))
}

/// `page` with the model parameter set to `path` (other parameters kept).
pub fn link_for_model(page: &Url, path: &str) -> Url {
    let kept: Vec<(String, String)> = page
        .query_pairs()
        .filter(|(k, _)| k != MODEL_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut url = page.clone();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept);
        query.append_pair(MODEL_PARAM, normalize_model_path(path));
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_once_and_strips_leading_separators() {
        assert_eq!(
            parse_link("https://x.test/?model=%2Fmodels%2Fa.glb").unwrap(),
            Some("models/a.glb".into())
        );
        assert_eq!(
            parse_link("https://x.test/?model=models/sub%252Fdir.glb").unwrap(),
            Some("models/sub%2Fdir.glb".into())
        );
        assert_eq!(parse_link("https://x.test/?other=1").unwrap(), None);
        assert_eq!(parse_link("https://x.test/?model=///").unwrap(), None);
        assert!(parse_link("not a url").is_err());
    }

    #[test]
    fn links_round_trip() {
        let page = Url::parse("https://x.test/preview?theme=dark&model=old.glb").unwrap();
        let link = link_for_model(&page, "/models/dir/a b.glb");
        assert_eq!(model_from_link(&link), Some("models/dir/a b.glb".into()));
        assert!(link.query_pairs().any(|(k, v)| k == "theme" && v == "dark"));
        assert_eq!(
            link.query_pairs().filter(|(k, _)| k == MODEL_PARAM).count(),
            1
        );
    }
}
