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

use amplify::confinement;
use strict_encoding::{StrictDeserialize, StrictSerialize, TypeName};

use crate::{
    AdminCap, AuthError, BlobError, BlobId, BlobSlotRegistry, CollectionMeta, CollectionState,
    Epoch, HostError, Identity, ItemNumber, LinkSet, ObjectHost, Pending, StateError, StorageFee,
    StoredBlob, SupplyError, SupplyLedger, LIB_NAME_COLLECTION,
};

/// A collection of items with a bounded supply, linked blob storage and
/// capability-gated administration.
///
/// The collection exclusively owns its supply ledger, blob slot registry and
/// link set; all access goes through collection operations. Operations taking
/// an [`AdminCap`] authorize it before any other check and mutate nothing
/// unless every check passes, so a failed call leaves no observable change.
#[derive(Clone, Eq, PartialEq, Debug)]
#[derive(StrictType, StrictDumb, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct Collection {
    identity: Identity,
    item_type: TypeName,
    meta: CollectionMeta,
    state: CollectionState,
    supply: SupplyLedger,
    blob_slots: BlobSlotRegistry,
    links: LinkSet,
}

impl StrictSerialize for Collection {}
impl StrictDeserialize for Collection {}

impl Collection {
    /// Creates a collection together with its admin capability.
    ///
    /// The capability is the only token which will ever authorize
    /// administrative operations on the returned collection.
    pub fn create(
        host: &mut impl ObjectHost,
        meta: CollectionMeta,
        item_type: TypeName,
        target_supply: u64,
    ) -> (Collection, AdminCap) {
        let identity = host.create_identity();
        let cap_identity = host.create_identity();
        let cap = AdminCap::with(cap_identity, identity, item_type.clone());
        let collection = Collection {
            identity,
            item_type,
            meta,
            state: CollectionState::Initialization { target_supply },
            supply: none!(),
            blob_slots: none!(),
            links: none!(),
        };
        (collection, cap)
    }

    /// Collection identity.
    #[inline]
    pub fn identity(&self) -> Identity { self.identity }

    /// Type of items registerable in this collection.
    #[inline]
    pub fn item_type(&self) -> &TypeName { &self.item_type }

    /// Descriptive metadata fixed at creation.
    #[inline]
    pub fn meta(&self) -> &CollectionMeta { &self.meta }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> CollectionState { self.state }

    /// Number of registered items.
    #[inline]
    pub fn registered_count(&self) -> u64 { self.supply.registered_count() }

    /// Read access to the supply ledger.
    #[inline]
    pub fn supply(&self) -> &SupplyLedger { &self.supply }

    /// Read access to the blob slot registry.
    #[inline]
    pub fn blob_slots(&self) -> &BlobSlotRegistry { &self.blob_slots }

    /// Read access to the linked reference set.
    #[inline]
    pub fn links(&self) -> &LinkSet { &self.links }

    /// Registers an item under a caller-chosen number.
    ///
    /// Permitted while the collection is in its initialization or item
    /// registration state, up to the target supply. Returns the new number
    /// of registered items.
    pub fn register_item(
        &mut self,
        cap: &AdminCap,
        number: ItemNumber,
        item: Identity,
    ) -> Result<u64, OperationError> {
        cap.authorize_typed(self.identity, &self.item_type)?;
        let target = self.state.registration_target()?;
        Ok(self.supply.register(number, item, target)?)
    }

    /// Removes a registered item, returning its identity.
    ///
    /// Follows the same state legality as registration: once the collection
    /// is initialized its supply is final.
    pub fn unregister_item(
        &mut self,
        cap: &AdminCap,
        number: ItemNumber,
    ) -> Result<Identity, OperationError> {
        cap.authorize_typed(self.identity, &self.item_type)?;
        self.state.registration_target()?;
        Ok(self.supply.unregister(number)?)
    }

    /// Reserves an empty storage slot for a blob.
    ///
    /// Permitted only during initialization.
    pub fn reserve_blob_slot(
        &mut self,
        cap: &AdminCap,
        blob_id: BlobId,
    ) -> Result<(), OperationError> {
        cap.authorize(self.identity)?;
        self.state.reservation_target()?;
        Ok(self.blob_slots.reserve(blob_id)?)
    }

    /// Reserves empty storage slots for a batch of blobs; the batch succeeds
    /// or fails as a whole.
    pub fn reserve_blob_slots(
        &mut self,
        cap: &AdminCap,
        blob_ids: impl IntoIterator<Item = BlobId>,
    ) -> Result<(), OperationError> {
        cap.authorize(self.identity)?;
        self.state.reservation_target()?;
        Ok(self.blob_slots.reserve_many(blob_ids)?)
    }

    /// Removes a reserved slot which was never fulfilled.
    pub fn unreserve_blob_slot(
        &mut self,
        cap: &AdminCap,
        blob_id: BlobId,
    ) -> Result<(), OperationError> {
        cap.authorize(self.identity)?;
        self.state.reservation_target()?;
        Ok(self.blob_slots.unreserve(blob_id)?)
    }

    /// Fills a reserved slot with a reference to the stored blob.
    ///
    /// Requires no capability: the reservation itself is the guard. A prior
    /// reference in the slot is swapped out and returned for disposal.
    pub fn fulfill_blob(&mut self, blob: StoredBlob) -> Result<Option<StoredBlob>, OperationError> {
        Ok(self.blob_slots.fulfill(blob)?)
    }

    /// Claims a stored blob sent to the collection identity and fulfills its
    /// slot with it.
    pub fn claim_blob(
        &mut self,
        host: &mut impl ObjectHost,
        pending: Pending<StoredBlob>,
    ) -> Result<Option<StoredBlob>, OperationError> {
        let blob = host.receive_pending(self.identity, pending)?;
        self.fulfill_blob(blob)
    }

    /// Extends retention of a stored blob by a number of epochs.
    ///
    /// Requires no capability: any caller may pay to extend retention on
    /// behalf of the collection. Returns the new end epoch.
    pub fn renew_blob(
        &mut self,
        blob_id: BlobId,
        extension: u32,
        fee: StorageFee,
    ) -> Result<Epoch, OperationError> {
        Ok(self.blob_slots.renew(blob_id, extension, fee)?)
    }

    /// Extracts the stored blob reference from a slot once the blob has
    /// expired at the given epoch, leaving the slot empty for
    /// re-fulfillment.
    pub fn remove_expired_blob(
        &mut self,
        blob_id: BlobId,
        current_epoch: Epoch,
    ) -> Result<StoredBlob, OperationError> {
        Ok(self.blob_slots.remove_expired(blob_id, current_epoch)?)
    }

    /// Links an auxiliary reference to the collection; idempotent.
    pub fn link_reference(
        &mut self,
        cap: &AdminCap,
        reference: Identity,
    ) -> Result<bool, OperationError> {
        cap.authorize(self.identity)?;
        Ok(self.links.link(reference)?)
    }

    /// Unlinks an auxiliary reference from the collection; idempotent.
    pub fn unlink_reference(
        &mut self,
        cap: &AdminCap,
        reference: Identity,
    ) -> Result<bool, OperationError> {
        cap.authorize(self.identity)?;
        Ok(self.links.unlink(reference)?)
    }

    /// Closes the blob reservation phase, advancing the collection from its
    /// initialization state into the item registration state.
    ///
    /// Requires the number of reserved slots to equal the target supply
    /// exactly.
    pub fn begin_item_registration(&mut self, cap: &AdminCap) -> Result<(), OperationError> {
        cap.authorize(self.identity)?;
        let target = self.state.reservation_target()?;
        let reserved = self.blob_slots.slot_count();
        if reserved != target {
            return Err(StateError::TargetSupplyNotReached {
                current: reserved,
                target,
            }
            .into());
        }
        self.state = CollectionState::ItemRegistration {
            target_supply: target,
        };
        Ok(())
    }

    /// Advances the collection into its terminal initialized state.
    ///
    /// Requires the number of registered items to equal the target supply
    /// exactly. Legal from both pre-terminal states, so collections which
    /// never reserve blob slots may skip the item registration phase.
    /// Irrevocable.
    pub fn mark_initialized(&mut self, cap: &AdminCap) -> Result<(), OperationError> {
        cap.authorize(self.identity)?;
        let target = self.state.registration_target()?;
        let registered = self.supply.registered_count();
        if registered != target {
            return Err(StateError::TargetSupplyNotReached {
                current: registered,
                target,
            }
            .into());
        }
        self.state = CollectionState::Initialized {
            total_supply: registered,
        };
        Ok(())
    }

    /// Destroys the admin capability, renouncing administrative control over
    /// the collection forever.
    ///
    /// One-way and state-gated: permitted only once the collection has
    /// reached its initialized state.
    pub fn destroy_cap(
        &self,
        cap: AdminCap,
        host: &mut impl ObjectHost,
    ) -> Result<(), OperationError> {
        cap.authorize_typed(self.identity, &self.item_type)?;
        self.state.require_initialized()?;
        host.delete_identity(cap.identity())?;
        Ok(())
    }
}

/// Errors returned by collection operations.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
#[display(inner)]
pub enum OperationError {
    #[from]
    Auth(AuthError),

    #[from]
    State(StateError),

    #[from]
    Supply(SupplyError),

    #[from]
    Blob(BlobError),

    #[from]
    Host(HostError),

    #[from]
    Confinement(confinement::Error),
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;
    use crate::{MemHost, Name};

    fn setup(target: u64) -> (MemHost, Collection, AdminCap) {
        let mut host = MemHost::new();
        let meta = CollectionMeta::new(Name::from_str("Glyphs").unwrap(), 1_700_000_000);
        let (collection, cap) = Collection::create(&mut host, meta, tn!("Glyph"), target);
        (host, collection, cap)
    }

    fn item(fill: u8) -> Identity { Identity::from_array([fill; 32]) }

    fn bid(fill: u8) -> BlobId { BlobId::from_array([fill; 32]) }

    #[test]
    fn create_assigns_capability_to_collection() {
        let (_, collection, cap) = setup(3);
        assert_eq!(cap.subject(), collection.identity());
        assert_eq!(cap.item_type(), collection.item_type());
        assert_eq!(
            collection.state(),
            CollectionState::Initialization { target_supply: 3 }
        );
    }

    #[test]
    fn foreign_capability_is_rejected_without_mutation() {
        let (mut host, mut collection, _) = setup(3);
        let (_, foreign_cap) = Collection::create(
            &mut host,
            CollectionMeta::new(Name::from_str("Other").unwrap(), 1_700_000_000),
            tn!("Glyph"),
            3,
        );

        let before = collection.clone();
        assert!(matches!(
            collection.register_item(&foreign_cap, ItemNumber::from(1u64), item(1)),
            Err(OperationError::Auth(AuthError::WrongCollection { .. }))
        ));
        assert!(matches!(
            collection.reserve_blob_slot(&foreign_cap, bid(1)),
            Err(OperationError::Auth(_))
        ));
        assert!(matches!(
            collection.mark_initialized(&foreign_cap),
            Err(OperationError::Auth(_))
        ));
        assert_eq!(collection, before);
    }

    #[test]
    fn registration_stops_at_target_supply() {
        let (_, mut collection, cap) = setup(2);
        collection
            .register_item(&cap, ItemNumber::from(1u64), item(1))
            .unwrap();
        collection
            .register_item(&cap, ItemNumber::from(2u64), item(2))
            .unwrap();
        assert!(matches!(
            collection.register_item(&cap, ItemNumber::from(3u64), item(3)),
            Err(OperationError::Supply(SupplyError::SupplyExhausted(2)))
        ));
    }

    #[test]
    fn initialization_requires_exact_count() {
        let (_, mut collection, cap) = setup(3);
        collection
            .register_item(&cap, ItemNumber::from(1u64), item(1))
            .unwrap();
        assert_eq!(
            collection.mark_initialized(&cap),
            Err(OperationError::State(StateError::TargetSupplyNotReached {
                current: 1,
                target: 3,
            }))
        );

        collection
            .register_item(&cap, ItemNumber::from(2u64), item(2))
            .unwrap();
        collection
            .register_item(&cap, ItemNumber::from(3u64), item(3))
            .unwrap();
        collection.mark_initialized(&cap).unwrap();
        assert_eq!(
            collection.state(),
            CollectionState::Initialized { total_supply: 3 }
        );

        // the transition is not repeatable
        assert!(matches!(
            collection.mark_initialized(&cap),
            Err(OperationError::State(StateError::InvalidStateForAction(_)))
        ));
    }

    #[test]
    fn initialized_collection_refuses_registration() {
        let (_, mut collection, cap) = setup(1);
        collection
            .register_item(&cap, ItemNumber::from(1u64), item(1))
            .unwrap();
        collection.mark_initialized(&cap).unwrap();

        assert!(matches!(
            collection.register_item(&cap, ItemNumber::from(2u64), item(2)),
            Err(OperationError::State(StateError::InvalidStateForAction(_)))
        ));
        assert!(matches!(
            collection.unregister_item(&cap, ItemNumber::from(1u64)),
            Err(OperationError::State(_))
        ));
    }

    #[test]
    fn two_phase_lifecycle() {
        let (_, mut collection, cap) = setup(2);

        // reservation phase must complete before item registration opens
        collection.reserve_blob_slot(&cap, bid(1)).unwrap();
        assert_eq!(
            collection.begin_item_registration(&cap),
            Err(OperationError::State(StateError::TargetSupplyNotReached {
                current: 1,
                target: 2,
            }))
        );
        collection.reserve_blob_slot(&cap, bid(2)).unwrap();
        collection.begin_item_registration(&cap).unwrap();
        assert_eq!(
            collection.state(),
            CollectionState::ItemRegistration { target_supply: 2 }
        );

        // slot reservation is closed now
        assert!(matches!(
            collection.reserve_blob_slot(&cap, bid(3)),
            Err(OperationError::State(StateError::InvalidStateForAction(_)))
        ));

        collection
            .register_item(&cap, ItemNumber::from(1u64), item(1))
            .unwrap();
        collection
            .register_item(&cap, ItemNumber::from(2u64), item(2))
            .unwrap();
        collection.mark_initialized(&cap).unwrap();
    }

    #[test]
    fn capability_destruction_is_state_gated() {
        let (mut host, mut collection, cap) = setup(1);
        assert!(matches!(
            collection.destroy_cap(cap.clone(), &mut host),
            Err(OperationError::State(_))
        ));

        collection
            .register_item(&cap, ItemNumber::from(1u64), item(1))
            .unwrap();
        collection.mark_initialized(&cap).unwrap();

        let cap_id = cap.identity();
        collection.destroy_cap(cap, &mut host).unwrap();
        assert!(!host.is_live(cap_id));
    }

    #[test]
    fn blobs_remain_serviceable_after_initialization() {
        let (mut host, mut collection, cap) = setup(1);
        collection.reserve_blob_slot(&cap, bid(1)).unwrap();
        collection
            .register_item(&cap, ItemNumber::from(1u64), item(1))
            .unwrap();
        collection.mark_initialized(&cap).unwrap();

        let blob = StoredBlob::with(bid(1), 2048, Epoch::from(10u32));
        let pending = Pending::send(collection.identity(), blob);
        assert_eq!(collection.claim_blob(&mut host, pending), Ok(None));
        assert_eq!(
            collection.renew_blob(bid(1), 5, StorageFee::from(100u64)),
            Ok(Epoch::from(15u32))
        );
        let removed = collection
            .remove_expired_blob(bid(1), Epoch::from(15u32))
            .unwrap();
        assert_eq!(removed.blob_id, bid(1));
    }

    #[test]
    fn linked_references_follow_set_semantics() {
        let (_, mut collection, cap) = setup(1);
        let policy = item(0x77);
        assert_eq!(collection.link_reference(&cap, policy), Ok(true));
        assert_eq!(collection.link_reference(&cap, policy), Ok(false));
        assert_eq!(collection.unlink_reference(&cap, policy), Ok(true));
        assert_eq!(collection.unlink_reference(&cap, policy), Ok(false));
    }
}
