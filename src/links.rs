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

use amplify::confinement::{self, SmallOrdSet};

use crate::{Identity, LIB_NAME_COLLECTION};

/// Unordered set of auxiliary references linked to a collection.
///
/// Used purely for discoverability by external tooling (for instance linked
/// transfer policies); never consulted by collection invariants. Unlike the
/// keyed ledgers, both insertion and removal are idempotent: linking a
/// present reference or unlinking an absent one succeeds reporting no
/// change.
#[derive(Wrapper, Clone, Eq, PartialEq, Debug, Default, From)]
#[wrapper(Deref)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct LinkSet(SmallOrdSet<Identity>);

impl LinkSet {
    /// Adds a reference, reporting whether the set changed.
    pub fn link(&mut self, id: Identity) -> Result<bool, confinement::Error> {
        if self.0.contains(&id) {
            return Ok(false);
        }
        self.0.push(id)?;
        Ok(true)
    }

    /// Removes a reference, reporting whether the set changed.
    pub fn unlink(&mut self, id: Identity) -> Result<bool, confinement::Error> {
        self.0.remove(&id)
    }
}
