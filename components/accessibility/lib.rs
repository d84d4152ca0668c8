/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Process-wide coordination of accessibility cache domains.
//!
//! Consumers that are about to rely on a category of cached accessibility
//! data ask whether its domains are active and, if not, request activation.
//! Requests are expanded to cover the domains the requested ones depend on,
//! then applied to the process-wide [`AccessibilityService`] on its owner
//! thread, which also announces the new set to remote consumers.

#![deny(unsafe_code)]

mod service;

use std::sync::Arc;

use accessibility_traits::CacheDomain;
use parking_lot::RwLock;

pub use crate::service::AccessibilityService;

static SERVICE: RwLock<Option<Arc<AccessibilityService>>> = RwLock::new(None);

/// Install the process-wide accessibility service. Replaces any previously
/// installed instance.
pub fn set_acc_service(service: Arc<AccessibilityService>) {
    *SERVICE.write() = Some(service);
}

/// Drop the process-wide accessibility service. Cached domain state dies with
/// it; queries made afterwards see no active domains.
pub fn shutdown_acc_service() {
    SERVICE.write().take();
}

/// The process-wide accessibility service, if one is running. Safe to call
/// from any thread.
pub fn acc_service() -> Option<Arc<AccessibilityService>> {
    SERVICE.read().clone()
}

/// The cache domains currently active in this process, or the empty set when
/// no accessibility service is running.
pub fn active_cache_domains() -> CacheDomain {
    acc_service()
        .map(|service| service.active_cache_domains())
        .unwrap_or_default()
}

/// Whether every domain in `required` is already active.
pub fn domains_are_active(required: CacheDomain) -> bool {
    active_cache_domains().contains(required)
}

/// Ensure that `required` and everything it depends on is active, requesting
/// activation if necessary. Returns true if a request was made (or if there
/// is no service to request anything of), false if the domains were already
/// active. A true return does not mean the domains are active yet; activation
/// requested from a thread other than the service's owner thread completes
/// asynchronously.
pub fn request_domains_if_inactive(required: CacheDomain) -> bool {
    match acc_service() {
        Some(service) => service.request_domains_if_inactive(required),
        None => true,
    }
}
