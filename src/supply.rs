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

use amplify::confinement::{self, LargeOrdMap};

use crate::{Identity, ItemNumber, LIB_NAME_COLLECTION};

/// Ledger of items registered in a collection, keyed by item number.
///
/// The ledger is state-agnostic: it bounds registrations against a target
/// supply passed by the caller, while the legality of registering in the
/// current collection lifecycle state is enforced by [`crate::Collection`].
/// This keeps the ledger reusable between collections which fix the target
/// supply at creation and collections which discover it incrementally.
#[derive(Wrapper, Clone, Eq, PartialEq, Debug, Default, From)]
#[wrapper(Deref)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct SupplyLedger(LargeOrdMap<ItemNumber, Identity>);

impl SupplyLedger {
    /// Number of registered items.
    #[inline]
    pub fn registered_count(&self) -> u64 { self.0.len() as u64 }

    /// Identity of the item registered under the given number.
    #[inline]
    pub fn item(&self, number: ItemNumber) -> Option<Identity> {
        self.0.get(&number).copied()
    }

    /// Registers an item under a caller-chosen number.
    ///
    /// Returns the new number of registered items.
    pub fn register(
        &mut self,
        number: ItemNumber,
        item: Identity,
        target_supply: u64,
    ) -> Result<u64, SupplyError> {
        if self.registered_count() >= target_supply {
            return Err(SupplyError::SupplyExhausted(target_supply));
        }
        if self.0.contains_key(&number) {
            return Err(SupplyError::DuplicateNumber(number));
        }
        self.0.insert(number, item)?;
        Ok(self.registered_count())
    }

    /// Removes a previously registered item, returning its identity.
    pub fn unregister(&mut self, number: ItemNumber) -> Result<Identity, SupplyError> {
        self.0
            .remove(&number)?
            .ok_or(SupplyError::UnknownNumber(number))
    }
}

/// Errors of item registration in a collection supply ledger.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum SupplyError {
    /// the target supply of {0} items is already registered.
    SupplyExhausted(u64),

    /// item number {0} is already registered.
    DuplicateNumber(ItemNumber),

    /// no item is registered under number {0}.
    UnknownNumber(ItemNumber),

    #[from]
    #[display(inner)]
    Confinement(confinement::Error),
}
