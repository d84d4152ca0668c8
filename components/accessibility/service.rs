/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use accessibility_traits::{
    AccessibilityControlMsg, AccessibilityMsg, AccessibilityProxy, CacheDomain,
    cache_domain_superset,
};
use ipc_channel::ipc::IpcSender;
use log::{debug, warn};
use parking_lot::Mutex;

/// Tracks which cache domains are active in this process and activates more
/// of them on demand.
///
/// The thread that constructs the service owns it: the active domain set is
/// readable from any thread, but it is only ever replaced on the owner
/// thread, because replacing it notifies remote consumers over channels that
/// must be driven from that thread. Requests made elsewhere are forwarded to
/// the owner thread through `proxy` and complete asynchronously.
pub struct AccessibilityService {
    /// The authoritative active domain set, as [`CacheDomain`] bits.
    active_cache_domains: AtomicU64,
    /// The thread on which this service was created.
    owner_thread: ThreadId,
    /// Route to the owner thread for requests made on other threads.
    proxy: AccessibilityProxy,
    /// Remote consumers to notify whenever the active set changes.
    remote_listeners: Mutex<Vec<IpcSender<AccessibilityControlMsg>>>,
}

impl AccessibilityService {
    /// Create a service with no active domains, owned by the current thread.
    pub fn new(proxy: AccessibilityProxy) -> AccessibilityService {
        Self::with_initial_domains(proxy, CacheDomain::default())
    }

    /// Create a service that starts out with `initial` already active, for
    /// embedders that unconditionally maintain a baseline set of domains.
    pub fn with_initial_domains(
        proxy: AccessibilityProxy,
        initial: CacheDomain,
    ) -> AccessibilityService {
        AccessibilityService {
            active_cache_domains: AtomicU64::new(initial.bits()),
            owner_thread: thread::current().id(),
            proxy,
            remote_listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn on_owner_thread(&self) -> bool {
        thread::current().id() == self.owner_thread
    }

    /// The currently active domain set. Reads from other threads may trail
    /// behind an activation that has been requested but not yet handled on
    /// the owner thread.
    pub fn active_cache_domains(&self) -> CacheDomain {
        CacheDomain::from_bits_retain(self.active_cache_domains.load(Ordering::SeqCst))
    }

    /// Whether every domain in `required` is already active. No side effects.
    pub fn domains_are_active(&self, required: CacheDomain) -> bool {
        self.active_cache_domains().contains(required)
    }

    /// Ensure that `required` and everything it depends on is active.
    ///
    /// Returns false, without side effects, if `required` is already covered.
    /// Otherwise the expanded set is activated: synchronously when called on
    /// the owner thread, else by enqueueing a message for it, and the return
    /// value true means only that a request was made. There is no completion
    /// signal for the asynchronous case.
    pub fn request_domains_if_inactive(&self, required: CacheDomain) -> bool {
        if self.domains_are_active(required) {
            return false;
        }

        let requested = cache_domain_superset(required);
        if self.on_owner_thread() {
            self.enable_cache_domains(requested);
        } else {
            self.proxy
                .send(AccessibilityMsg::EnableCacheDomains(requested));
        }
        true
    }

    /// Replace the active domain set and announce it to all remote
    /// listeners. Must be called on the owner thread.
    pub fn set_cache_domains(&self, domains: CacheDomain) {
        debug_assert!(
            self.on_owner_thread(),
            "The active domain set can only be replaced on the owner thread"
        );
        debug!("Setting active cache domains to {}.", domains);
        self.active_cache_domains
            .store(domains.bits(), Ordering::SeqCst);

        self.remote_listeners.lock().retain(|listener| {
            let result = listener.send(AccessibilityControlMsg::SetCacheDomains(domains));
            if let Err(ref err) = result {
                warn!("Dropping unreachable cache domain listener ({:?}).", err);
            }
            result.is_ok()
        });
    }

    /// Union `requested` into the active set as it stands right now. Handler
    /// for requests that raced with other activations while queued.
    fn enable_cache_domains(&self, requested: CacheDomain) {
        self.set_cache_domains(self.active_cache_domains() | requested);
    }

    /// Handle one message drained from the service's receiver. Must be
    /// called on the owner thread.
    pub fn handle_message(&self, message: AccessibilityMsg) {
        match message {
            AccessibilityMsg::EnableCacheDomains(requested) => {
                self.enable_cache_domains(requested)
            },
        }
    }

    /// Register a remote consumer of domain updates and immediately send it
    /// the current active set. A listener that cannot be reached is dropped
    /// on the spot.
    pub fn add_remote_listener(&self, listener: IpcSender<AccessibilityControlMsg>) {
        let domains = self.active_cache_domains();
        if let Err(err) = listener.send(AccessibilityControlMsg::SetCacheDomains(domains)) {
            warn!("Dropping unreachable cache domain listener ({:?}).", err);
            return;
        }
        self.remote_listeners.lock().push(listener);
    }
}
