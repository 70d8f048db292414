// Standard library for capability-gated collection smart contracts
//
// SPDX-License-Identifier: Apache-2.0
//
// Written in 2019-2024 by
//     Dr Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// Copyright (C) 2019-2024 LNP/BP Standards Association. All rights reserved.
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

use std::collections::BTreeSet;

use crate::Identity;

/// Interface to the host ledger object store.
///
/// The library never persists objects itself: identity assignment, object
/// teardown and claiming of objects sent to an identity are delegated to the
/// runtime embedding the library. [`MemHost`] provides a deterministic
/// in-memory implementation for tests and for embedders bringing no ledger.
pub trait ObjectHost {
    /// Allocates a fresh, never reused identity.
    fn create_identity(&mut self) -> Identity;

    /// Irreversibly tears down an object.
    fn delete_identity(&mut self, id: Identity) -> Result<(), HostError>;

    /// Claims an object previously sent to the given recipient identity.
    fn receive_pending<T>(
        &mut self,
        recipient: Identity,
        pending: Pending<T>,
    ) -> Result<T, HostError>;
}

/// An object sent to a recipient identity, claimable exactly once by that
/// recipient through [`ObjectHost::receive_pending`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Pending<T> {
    recipient: Identity,
    value: T,
}

impl<T> Pending<T> {
    /// Addresses a value to a recipient identity.
    pub fn send(recipient: Identity, value: T) -> Self { Pending { recipient, value } }

    /// Identity the value is addressed to.
    #[inline]
    pub fn recipient(&self) -> Identity { self.recipient }

    pub(crate) fn claim(self, by: Identity) -> Result<T, HostError> {
        if self.recipient != by {
            return Err(HostError::WrongRecipient {
                to: self.recipient,
                by,
            });
        }
        Ok(self.value)
    }
}

/// Errors reported by the host object store.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum HostError {
    /// object {0} is not known to the object store.
    UnknownIdentity(Identity),

    /// object addressed to {to} can not be received by {by}.
    WrongRecipient {
        /// Identity the object was sent to.
        to: Identity,
        /// Identity which attempted to claim the object.
        by: Identity,
    },
}

/// Deterministic in-memory object store.
///
/// Derives identities from a monotonic counter, which keeps runs
/// reproducible. Useful in tests and in WASM embeddings with no ledger
/// runtime underneath.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct MemHost {
    next: u64,
    live: BTreeSet<Identity>,
}

impl MemHost {
    /// Constructs an empty object store.
    pub fn new() -> Self { MemHost::default() }

    /// Whether an object with the given identity is currently alive.
    #[inline]
    pub fn is_live(&self, id: Identity) -> bool { self.live.contains(&id) }
}

impl ObjectHost for MemHost {
    fn create_identity(&mut self) -> Identity {
        let mut raw = [0u8; 32];
        raw[24..].copy_from_slice(&self.next.to_be_bytes());
        self.next += 1;
        let id = Identity::from(raw);
        self.live.insert(id);
        id
    }

    fn delete_identity(&mut self, id: Identity) -> Result<(), HostError> {
        if !self.live.remove(&id) {
            return Err(HostError::UnknownIdentity(id));
        }
        Ok(())
    }

    fn receive_pending<T>(
        &mut self,
        recipient: Identity,
        pending: Pending<T>,
    ) -> Result<T, HostError> {
        pending.claim(recipient)
    }
}
