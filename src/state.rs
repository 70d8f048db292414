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

#![allow(unused_braces)] // caused by rustc unable to understand strict_dumb

use crate::LIB_NAME_COLLECTION;

/// Lifecycle state of a collection.
///
/// Transitions are forward-only and construct a fresh variant value; no state
/// is ever mutated in place and no transition leads backward. Each variant
/// carries only the counters its phase needs.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display)]
#[derive(StrictType, StrictDumb, StrictEncode, StrictDecode)]
#[strict_type(
    lib = LIB_NAME_COLLECTION,
    tags = custom,
    dumb = { Self::Initialization { target_supply: 0 } }
)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub enum CollectionState {
    /// Initial state: blob slots may be reserved and items registered, each
    /// up to the target supply.
    #[display("initialization (target supply {target_supply})")]
    #[strict_type(tag = 0x00)]
    Initialization {
        /// Maximum number of items the collection will hold.
        target_supply: u64,
    },

    /// Blob slot reservation is closed; only item registration continues.
    #[display("item registration (target supply {target_supply})")]
    #[strict_type(tag = 0x01)]
    ItemRegistration {
        /// Maximum number of items the collection will hold.
        target_supply: u64,
    },

    /// Terminal state: the full supply is registered. Registration and slot
    /// reservation are closed; blob fulfillment, renewal and capability
    /// destruction remain available.
    #[display("initialized (total supply {total_supply})")]
    #[strict_type(tag = 0x02)]
    Initialized {
        /// Final number of registered items.
        total_supply: u64,
    },
}

impl CollectionState {
    /// Target supply for the pre-terminal states, or the total supply once
    /// initialized.
    pub fn supply(&self) -> u64 {
        match *self {
            CollectionState::Initialization { target_supply }
            | CollectionState::ItemRegistration { target_supply } => target_supply,
            CollectionState::Initialized { total_supply } => total_supply,
        }
    }

    /// Whether the collection has reached its terminal state.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        matches!(self, CollectionState::Initialized { .. })
    }

    /// Target supply if item registration is still permitted.
    pub(crate) fn registration_target(&self) -> Result<u64, StateError> {
        match *self {
            CollectionState::Initialization { target_supply }
            | CollectionState::ItemRegistration { target_supply } => Ok(target_supply),
            CollectionState::Initialized { .. } => Err(StateError::InvalidStateForAction(*self)),
        }
    }

    /// Target supply if blob slot reservation is still permitted.
    pub(crate) fn reservation_target(&self) -> Result<u64, StateError> {
        match *self {
            CollectionState::Initialization { target_supply } => Ok(target_supply),
            CollectionState::ItemRegistration { .. } | CollectionState::Initialized { .. } => {
                Err(StateError::InvalidStateForAction(*self))
            }
        }
    }

    pub(crate) fn require_initialized(&self) -> Result<(), StateError> {
        if !self.is_initialized() {
            return Err(StateError::InvalidStateForAction(*self));
        }
        Ok(())
    }
}

/// Errors of collection lifecycle state checks and transitions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum StateError {
    /// operation is not allowed while the collection is in {0} state.
    InvalidStateForAction(CollectionState),

    /// collection holds {current} of {target} targeted entries and can not
    /// advance its state before the target supply is reached exactly.
    TargetSupplyNotReached {
        /// Current number of entries.
        current: u64,
        /// Target supply which must be reached.
        target: u64,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn supply_accessor() {
        assert_eq!(CollectionState::Initialization { target_supply: 5 }.supply(), 5);
        assert_eq!(CollectionState::Initialized { total_supply: 5 }.supply(), 5);
    }

    #[test]
    fn legality_per_state() {
        let init = CollectionState::Initialization { target_supply: 5 };
        let reg = CollectionState::ItemRegistration { target_supply: 5 };
        let done = CollectionState::Initialized { total_supply: 5 };

        assert_eq!(init.registration_target(), Ok(5));
        assert_eq!(reg.registration_target(), Ok(5));
        assert_eq!(done.registration_target(), Err(StateError::InvalidStateForAction(done)));

        assert_eq!(init.reservation_target(), Ok(5));
        assert_eq!(reg.reservation_target(), Err(StateError::InvalidStateForAction(reg)));

        assert!(done.require_initialized().is_ok());
        assert!(init.require_initialized().is_err());
    }

    #[test]
    fn state_display() {
        assert_eq!(
            CollectionState::Initialization { target_supply: 3 }.to_string(),
            "initialization (target supply 3)"
        );
        assert_eq!(
            CollectionState::Initialized { total_supply: 3 }.to_string(),
            "initialized (total supply 3)"
        );
    }
}
