/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The interface to the `accessibility` crate.

#![deny(unsafe_code)]

use std::fmt;

use bitflags::bitflags;
use crossbeam_channel::{Receiver, Sender};
use log::warn;
use serde::{Deserialize, Serialize};

/// A category of accessibility data that can be cached and kept up to date
/// independently of the others. The active set of domains is tracked per
/// process as a mask of these bits; bits outside the named set are preserved
/// by every operation so that newer domains can travel through older code.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct CacheDomain(u64);

bitflags! {
    impl CacheDomain: u64 {
        const ACTIONS = 1 << 0;
        const BOUNDS = 1 << 1;
        const CARET = 1 << 2;
        /// The DOM node id and class list, used to resolve targets of
        /// relations and event coalescing.
        const DOM_NODE_ID_AND_CLASS = 1 << 3;
        /// Position-in-set and set-size information for items in a group.
        const GROUP_INFO = 1 << 4;
        const INNER_HTML = 1 << 5;
        const NAME_AND_DESCRIPTION = 1 << 6;
        const RELATIONS = 1 << 7;
        const SCROLL_POSITION = 1 << 8;
        const STATE = 1 << 9;
        const STYLE = 1 << 10;
        const TABLE = 1 << 11;
        /// Text content and line boundaries.
        const TEXT = 1 << 12;
        /// Character bounding rectangles within a text leaf.
        const TEXT_BOUNDS = 1 << 13;
        /// Spelling-error and style-run offsets within cached text.
        const TEXT_OFFSET_ATTRIBUTES = 1 << 14;
        const TRANSFORM_MATRIX = 1 << 15;
        const VALUE = 1 << 16;
        const VIEWPORT = 1 << 17;
    }
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let mut first_elem = true;

        for (name, _) in self.iter_names() {
            if !first_elem {
                write!(f, " | ")?;
            }
            write!(f, "{}", name)?;
            first_elem = false;
        }

        if first_elem {
            write!(f, "NoDomains")?;
        }

        Ok(())
    }
}

/// Domains that cannot be maintained without other domains also being
/// maintained. Each entry maps a domain to the domains its cached data is
/// derived from. No entry's trigger is produced by another entry, so a single
/// pass over this table reaches a fixed point; a chained entry would require
/// `cache_domain_superset` to iterate until the mask stops changing.
const CACHE_DOMAIN_DEPENDENCIES: &[(CacheDomain, CacheDomain)] = &[
    (CacheDomain::TEXT_OFFSET_ATTRIBUTES, CacheDomain::TEXT),
    (
        CacheDomain::TEXT_BOUNDS,
        CacheDomain::TEXT.union(CacheDomain::BOUNDS),
    ),
];

/// Expand `domains` to the smallest set that contains it and is closed under
/// [`CACHE_DOMAIN_DEPENDENCIES`]. Bits with no dependency entry, including
/// unknown bits, pass through untouched.
pub fn cache_domain_superset(domains: CacheDomain) -> CacheDomain {
    let mut superset = domains;
    for &(trigger, required) in CACHE_DOMAIN_DEPENDENCIES {
        if superset.intersects(trigger) {
            superset |= required;
        }
    }

    debug_assert!(
        superset.contains(domains),
        "Domain superset {} is missing bits of {}",
        superset,
        domains
    );
    superset
}

/// A mechanism for kicking the owner thread's event loop awake after a
/// message has been enqueued for it from another thread.
pub trait EventLoopWaker: 'static + Send + Sync {
    fn clone_box(&self) -> Box<dyn EventLoopWaker>;
    fn wake(&self);
}

impl Clone for Box<dyn EventLoopWaker> {
    fn clone(&self) -> Self {
        EventLoopWaker::clone_box(self.as_ref())
    }
}

/// Messages to the thread that owns the accessibility service.
#[derive(Debug)]
pub enum AccessibilityMsg {
    /// Activate the given cache domains on top of whatever is active once
    /// the message is handled. The sender has already expanded the mask with
    /// [`cache_domain_superset`].
    EnableCacheDomains(CacheDomain),
}

/// Messages from the accessibility service to a remote consumer of cached
/// accessibility data, sent whenever the authoritative domain set changes.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub enum AccessibilityControlMsg {
    /// The full active domain set, replacing any previously announced set.
    SetCacheDomains(CacheDomain),
}

/// Sends messages to the accessibility service's owner thread.
pub struct AccessibilityProxy {
    pub sender: Sender<AccessibilityMsg>,
    pub event_loop_waker: Box<dyn EventLoopWaker>,
}

impl AccessibilityProxy {
    pub fn send(&self, msg: AccessibilityMsg) {
        if let Err(err) = self.sender.send(msg) {
            warn!("Failed to send accessibility message ({:?}).", err);
        }
        self.event_loop_waker.wake();
    }
}

impl Clone for AccessibilityProxy {
    fn clone(&self) -> AccessibilityProxy {
        AccessibilityProxy {
            sender: self.sender.clone(),
            event_loop_waker: self.event_loop_waker.clone(),
        }
    }
}

/// The port that the owner thread receives accessibility messages on.
pub struct AccessibilityReceiver {
    pub receiver: Receiver<AccessibilityMsg>,
}

impl AccessibilityReceiver {
    pub fn try_recv_accessibility_msg(&mut self) -> Option<AccessibilityMsg> {
        self.receiver.try_recv().ok()
    }
}
