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

//! Library implementing the lifecycle of on-ledger collections: objects which
//! register a bounded supply of items, reserve and fulfill storage slots for
//! externally-stored binary blobs, and gate all administrative operations with
//! an unforgeable admin capability.
//!
//! The library contains no persistence, networking or consensus code: it is
//! meant to be embedded into a ledger runtime which serializes operation
//! calls and provides transactional atomicity. Each operation either fully
//! succeeds or returns an error without mutating the collection.

#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    unused_imports,
    dead_code,
    // missing_docs
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate strict_encoding;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

mod identity;
mod specs;
mod capability;
mod supply;
mod blobs;
mod state;
mod links;
mod collection;
mod host;
#[cfg(feature = "stl")]
pub mod stl;

pub use blobs::{BlobError, BlobId, BlobSlotRegistry, Epoch, StorageFee, StoredBlob};
pub use capability::{AdminCap, AuthError};
pub use collection::{Collection, OperationError};
pub use host::{HostError, MemHost, ObjectHost, Pending};
pub use identity::{Identity, ItemNumber};
pub use links::LinkSet;
pub use specs::{CollectionInfo, CollectionMeta, Details, Name};
pub use state::{CollectionState, StateError};
pub use supply::{SupplyError, SupplyLedger};

/// Name of the strict type library defined by this crate.
pub const LIB_NAME_COLLECTION: &str = "Collection";
