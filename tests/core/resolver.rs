//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Xu.
//! The Xu project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Xu Resolver Tests
//!
//! Tests for the attribute layer: URL decomposition, timestamp
//! decomposition, and domain-suffix membership.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test resolver
//! ```

use proptest::prelude::*;

use xu::{domain_parents, domain_under, XuAttribute, XuDateField, XuTimestamp, XuUrlParts};

/// Tests component extraction from a fully populated URL.
#[test]
fn test_url_decomposition() {
    let parts = XuUrlParts::split("https://imgs.xkcd.com/comics/tornadoguard.png?w=640&h=480");
    assert_eq!(parts.scheme, "https");
    assert_eq!(parts.netloc, "imgs.xkcd.com");
    assert_eq!(parts.path, "/comics/tornadoguard.png");
    assert_eq!(parts.query, "w=640&h=480");
}

/// Tests that absent URL components come out empty instead of failing.
#[test]
fn test_url_decomposition_partial() {
    let parts = XuUrlParts::split("https://xkcd.com");
    assert_eq!(parts.netloc, "xkcd.com");
    assert_eq!(parts.path, "");
    assert_eq!(parts.query, "");

    let parts = XuUrlParts::split("//cdn.example.org/a.js");
    assert_eq!(parts.scheme, "");
    assert_eq!(parts.netloc, "cdn.example.org");
    assert_eq!(parts.path, "/a.js");
}

/// Tests the documented example: `Fri, 12 Aug 2011 at 04:05:04 GMT`
/// stored as RFC 3339 text.
#[test]
fn test_timestamp_decomposition() {
    let ts = XuTimestamp::decompose("2011-08-12T04:05:04+00:00");
    assert_eq!(ts.year, 2011);
    assert_eq!(ts.month, 8);
    assert_eq!(ts.day, 12);
    assert_eq!(ts.hour, 4);
    assert_eq!(ts.minute, 5);
    assert_eq!(ts.second, 4);
}

/// Tests that malformed timestamp text degrades to zero fields rather
/// than an error.
#[test]
fn test_timestamp_malformed_is_zero() {
    let ts = XuTimestamp::decompose("not a date");
    for field in XuDateField::ALL {
        assert_eq!(ts.field(field), 0);
    }
}

/// Tests parent-domain enumeration: every trailing label group of at
/// least two labels, longest first.
#[test]
fn test_domain_parents() {
    assert_eq!(
        domain_parents("cdn.media.tumblr.com"),
        vec!["cdn.media.tumblr.com", "media.tumblr.com", "tumblr.com"]
    );
    assert_eq!(domain_parents("xkcd.com"), vec!["xkcd.com"]);
}

/// Tests that a bare top-level label has no parents, not even itself.
#[test]
fn test_domain_parents_single_label() {
    assert!(domain_parents("com").is_empty());
    assert!(domain_parents("localhost").is_empty());
}

/// Tests domain membership: equality and subdomains pass, partial-label
/// and unrelated names do not.
#[test]
fn test_domain_under() {
    assert!(domain_under("media.tumblr.com", "media.tumblr.com"));
    assert!(domain_under("cdn.media.tumblr.com", "media.tumblr.com"));
    assert!(domain_under("a.b.media.tumblr.com", "media.tumblr.com"));
    assert!(!domain_under("somemedia.tumblr.com", "media.tumblr.com"));
    assert!(!domain_under("media.tumblr.com.evil.org", "media.tumblr.com"));
    assert!(!domain_under("tumblr.com", "media.tumblr.com"));
    assert!(!domain_under("xkcd.com", "com"));
    assert!(!domain_under("com", "com"));
}

/// Tests that the canonical attribute set parses back to itself.
#[test]
fn test_attribute_round_trip() {
    for attribute in XuAttribute::all() {
        let reparsed = XuAttribute::parse(&attribute.column()).unwrap();
        assert_eq!(reparsed, attribute);
    }
    assert_eq!(XuAttribute::all().len(), 24);
}

/// Tests rejection of names outside the closed attribute set.
#[test]
fn test_attribute_rejection() {
    for name in ["target:title", "published:century", "body", "tag:name", ""] {
        assert!(XuAttribute::parse(name).is_err(), "accepted '{name}'");
    }
}

proptest! {
    /// Reassembling the split components always reproduces the input URL.
    #[test]
    fn prop_url_split_is_lossless(
        scheme in "[a-z]{2,6}",
        netloc in "[a-z0-9.-]{1,20}",
        path in "(/[a-zA-Z0-9._-]{0,10}){0,3}",
        query in "([a-z]{1,5}=[a-z0-9]{0,5}(&[a-z]{1,5}=[a-z0-9]{0,5}){0,2})?",
    ) {
        let mut url = format!("{scheme}://{netloc}{path}");
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        let parts = XuUrlParts::split(&url);
        prop_assert_eq!(parts.reconstruct(), url);
    }

    /// Every enumerated parent is itself `under` the original domain's
    /// suffix chain.
    #[test]
    fn prop_parents_are_suffixes(domain in "[a-z]{1,8}(\\.[a-z]{1,8}){1,4}") {
        for parent in domain_parents(&domain) {
            prop_assert!(domain_under(&domain, &parent));
            prop_assert!(domain.ends_with(&parent));
        }
    }
}
