/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use accessibility_traits::{CacheDomain, cache_domain_superset};

#[test]
fn superset_contains_its_input() {
    let masks = [
        CacheDomain::empty(),
        CacheDomain::TEXT,
        CacheDomain::TEXT_OFFSET_ATTRIBUTES,
        CacheDomain::TEXT_BOUNDS,
        CacheDomain::TEXT_BOUNDS | CacheDomain::VIEWPORT,
        CacheDomain::ACTIONS | CacheDomain::TEXT_OFFSET_ATTRIBUTES | CacheDomain::TABLE,
        CacheDomain::all(),
        CacheDomain::from_bits_retain(u64::MAX),
    ];
    for mask in masks {
        let superset = cache_domain_superset(mask);
        assert_eq!(superset & mask, mask, "{} lost bits of {}", superset, mask);
    }
}

#[test]
fn superset_is_idempotent() {
    let masks = [
        CacheDomain::empty(),
        CacheDomain::TEXT_OFFSET_ATTRIBUTES,
        CacheDomain::TEXT_BOUNDS,
        CacheDomain::TEXT_BOUNDS | CacheDomain::TEXT_OFFSET_ATTRIBUTES,
        CacheDomain::all(),
    ];
    for mask in masks {
        let superset = cache_domain_superset(mask);
        assert_eq!(cache_domain_superset(superset), superset);
    }
}

#[test]
fn text_offset_attributes_require_text() {
    let superset = cache_domain_superset(CacheDomain::TEXT_OFFSET_ATTRIBUTES);
    assert!(superset.contains(CacheDomain::TEXT_OFFSET_ATTRIBUTES | CacheDomain::TEXT));
}

#[test]
fn text_bounds_require_text_and_bounds() {
    let superset = cache_domain_superset(CacheDomain::TEXT_BOUNDS);
    assert!(superset.contains(CacheDomain::TEXT_BOUNDS));
    assert!(superset.contains(CacheDomain::TEXT));
    assert!(superset.contains(CacheDomain::BOUNDS));
}

#[test]
fn domain_without_dependencies_is_unchanged() {
    assert_eq!(
        cache_domain_superset(CacheDomain::BOUNDS),
        CacheDomain::BOUNDS
    );
    assert_eq!(cache_domain_superset(CacheDomain::TEXT), CacheDomain::TEXT);
}

#[test]
fn unknown_bits_pass_through() {
    let unknown = CacheDomain::from_bits_retain(1 << 63);
    assert_eq!(cache_domain_superset(unknown), unknown);

    let superset = cache_domain_superset(unknown | CacheDomain::TEXT_BOUNDS);
    assert!(superset.contains(unknown));
    assert!(superset.contains(CacheDomain::TEXT | CacheDomain::BOUNDS));
}

#[test]
fn display_lists_flag_names() {
    assert_eq!(
        (CacheDomain::BOUNDS | CacheDomain::TEXT).to_string(),
        "BOUNDS | TEXT"
    );
    assert_eq!(CacheDomain::empty().to_string(), "NoDomains");
}
