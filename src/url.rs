// Copyright 2025 The oscloud contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Handy primitives for working with URLs.

use reqwest::Url;

/// Whether the URL has a non-empty path.
#[inline]
#[allow(unused_results)]
pub fn is_root(url: &Url) -> bool {
    !url.path_segments()
        .map(|mut x| x.any(|y| !y.is_empty()))
        .unwrap_or_default()
}

/// Append one segment to the URL path.
#[inline]
#[allow(dead_code, unused_results)]
pub fn join(mut url: Url, other: &str) -> Url {
    url.path_segments_mut()
        .expect("URL cannot be a base")
        .pop_if_empty()
        .push(other);
    url
}

/// Append several segments to the URL path.
#[inline]
#[allow(unused_results)]
pub fn extend<I>(mut url: Url, segments: I) -> Url
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    url.path_segments_mut()
        .expect("URL cannot be a base")
        .pop_if_empty()
        .extend(segments);
    url
}

/// Remove the last segment from the URL path.
#[inline]
#[allow(unused_results)]
pub fn pop(mut url: Url, keep_slash: bool) -> Url {
    url.path_segments_mut()
        .expect("URL cannot be a base")
        .pop_if_empty()
        .pop();
    if keep_slash {
        url.path_segments_mut()
            .expect("URL cannot be a base")
            .pop_if_empty()
            .push("");
    }
    url
}

#[cfg(test)]
pub mod test {
    use reqwest::Url;

    use super::{extend, is_root, join, pop};

    #[test]
    fn test_is_root() {
        assert!(is_root(&Url::parse("http://example.com").unwrap()));
        assert!(is_root(&Url::parse("http://example.com/").unwrap()));
        assert!(!is_root(&Url::parse("http://example.com/v2.1").unwrap()));
    }

    #[test]
    fn test_join() {
        let url = Url::parse("http://example.com/v2.1/").unwrap();
        assert_eq!(join(url, "servers").as_str(), "http://example.com/v2.1/servers");
    }

    #[test]
    fn test_extend() {
        let url = Url::parse("http://example.com/v2.1").unwrap();
        assert_eq!(
            extend(url, &["servers", "abcd"]).as_str(),
            "http://example.com/v2.1/servers/abcd"
        );
    }

    #[test]
    fn test_pop() {
        let url = Url::parse("http://example.com/v2.1/servers").unwrap();
        assert_eq!(pop(url, false).as_str(), "http://example.com/v2.1");
        let url = Url::parse("http://example.com/v2.1/servers/").unwrap();
        assert_eq!(pop(url, true).as_str(), "http://example.com/v2.1/");
    }
}
