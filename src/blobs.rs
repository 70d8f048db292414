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
use amplify::Bytes32;

use crate::LIB_NAME_COLLECTION;

/// Content hash identifying an externally stored binary blob.
///
/// The blob bytes themselves never enter the library; retention and expiry of
/// the content is managed by an external epoch-based storage system, and the
/// collection only tracks slots and references.
#[derive(Wrapper, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, From)]
#[wrapper(Deref, BorrowSlice, Hex, Index, RangeOps)]
#[display(LowerHex)]
#[derive(StrictType, StrictDumb, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct BlobId(
    #[from]
    #[from([u8; 32])]
    Bytes32,
);

impl BlobId {
    /// Constructs blob id from a raw byte array.
    pub const fn from_array(id: [u8; 32]) -> Self { BlobId(Bytes32::from_array(id)) }

    /// Returns the content hash as a byte array.
    pub fn to_byte_array(&self) -> [u8; 32] { self.0.to_byte_array() }
}

/// External, monotonically increasing time unit used to gate blob expiry and
/// renewal.
#[derive(
    Wrapper, WrapperMut, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default, From
)]
#[wrapper(Display, FromStr, Add, Sub)]
#[wrapper_mut(AddAssign, SubAssign)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct Epoch(u32);

impl Epoch {
    /// Returns the epoch number as a plain integer.
    #[inline]
    pub fn to_u32(self) -> u32 { self.0 }
}

/// Opaque payment amount forwarded to the external storage system when blob
/// retention is extended.
#[derive(
    Wrapper, WrapperMut, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default, From
)]
#[wrapper(Display, FromStr, Add, Sub)]
#[wrapper_mut(AddAssign, SubAssign)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct StorageFee(u64);

/// Reference to a blob held by the external storage system.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
#[display("{blob_id} (until epoch {end_epoch})")]
#[derive(StrictType, StrictDumb, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct StoredBlob {
    /// Content hash of the blob.
    pub blob_id: BlobId,
    /// Size of the blob content in bytes.
    pub size: u64,
    /// First epoch at which the blob is expired.
    pub end_epoch: Epoch,
}

impl StoredBlob {
    /// Constructs a blob reference.
    pub fn with(blob_id: BlobId, size: u64, end_epoch: Epoch) -> Self {
        StoredBlob {
            blob_id,
            size,
            end_epoch,
        }
    }

    /// Whether the blob is expired at the given epoch.
    #[inline]
    pub fn is_expired(&self, current_epoch: Epoch) -> bool { current_epoch >= self.end_epoch }

    fn extend(&mut self, epochs: u32) {
        self.end_epoch = Epoch::from(self.end_epoch.to_u32().saturating_add(epochs));
    }
}

/// Registry of storage slots for the blobs belonging to a collection.
///
/// Each slot is keyed by blob content hash. A key with an empty value is a
/// slot which has been reserved but not yet fulfilled; a key with a value
/// holds a reference to the stored blob.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[derive(StrictType, StrictEncode, StrictDecode)]
#[strict_type(lib = LIB_NAME_COLLECTION)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct BlobSlotRegistry(LargeOrdMap<BlobId, Option<StoredBlob>>);

impl BlobSlotRegistry {
    /// Total number of slots, fulfilled or not.
    #[inline]
    pub fn slot_count(&self) -> u64 { self.0.len() as u64 }

    /// Whether a slot is reserved for the given blob.
    #[inline]
    pub fn is_reserved(&self, blob_id: BlobId) -> bool { self.0.contains_key(&blob_id) }

    /// Reference to the stored blob fulfilling the slot, if any.
    #[inline]
    pub fn stored(&self, blob_id: BlobId) -> Option<&StoredBlob> {
        self.0.get(&blob_id).and_then(Option::as_ref)
    }

    /// Reserves an empty slot for a blob.
    pub fn reserve(&mut self, blob_id: BlobId) -> Result<(), BlobError> {
        if self.0.contains_key(&blob_id) {
            return Err(BlobError::AlreadyReserved(blob_id));
        }
        self.0.insert(blob_id, None)?;
        Ok(())
    }

    /// Reserves empty slots for a batch of blobs.
    ///
    /// The batch is atomic: all ids are checked before the first slot is
    /// inserted, and a duplicate anywhere in the batch (against existing
    /// slots or within the batch itself) leaves the registry unmodified.
    pub fn reserve_many(
        &mut self,
        blob_ids: impl IntoIterator<Item = BlobId>,
    ) -> Result<(), BlobError> {
        let mut batch = Vec::new();
        for blob_id in blob_ids {
            if self.0.contains_key(&blob_id) || batch.contains(&blob_id) {
                return Err(BlobError::AlreadyReserved(blob_id));
            }
            batch.push(blob_id);
        }
        for blob_id in batch {
            self.0.insert(blob_id, None)?;
        }
        Ok(())
    }

    /// Removes a reserved slot which was never fulfilled.
    ///
    /// A fulfilled slot can not be unreserved: the stored blob it references
    /// must first be extracted with [`Self::remove_expired`].
    pub fn unreserve(&mut self, blob_id: BlobId) -> Result<(), BlobError> {
        match self.0.get(&blob_id) {
            None => return Err(BlobError::NotReserved(blob_id)),
            Some(Some(_)) => return Err(BlobError::AlreadyFulfilled(blob_id)),
            Some(None) => {}
        }
        self.0.remove(&blob_id)?;
        Ok(())
    }

    /// Fills the slot reserved for the blob with a reference to its stored
    /// content.
    ///
    /// Re-fulfilling an already fulfilled slot replaces the reference; the
    /// prior one is returned to the caller for disposal.
    pub fn fulfill(&mut self, blob: StoredBlob) -> Result<Option<StoredBlob>, BlobError> {
        let Some(slot) = self.0.get_mut(&blob.blob_id) else {
            return Err(BlobError::NotReserved(blob.blob_id));
        };
        Ok(slot.replace(blob))
    }

    /// Extends the retention of a stored blob by a number of epochs.
    ///
    /// The fee is forwarded to the external storage system by the enclosing
    /// transaction; the registry performs no fee accounting and accepts the
    /// renewal from any caller.
    pub fn renew(
        &mut self,
        blob_id: BlobId,
        extension: u32,
        _fee: StorageFee,
    ) -> Result<Epoch, BlobError> {
        let Some(Some(blob)) = self.0.get_mut(&blob_id) else {
            return Err(BlobError::NotFulfilled(blob_id));
        };
        blob.extend(extension);
        Ok(blob.end_epoch)
    }

    /// Extracts the stored blob reference from a slot once the blob has
    /// expired.
    ///
    /// The slot key is retained with an empty value, so the slot may be
    /// fulfilled again with re-uploaded content.
    pub fn remove_expired(
        &mut self,
        blob_id: BlobId,
        current_epoch: Epoch,
    ) -> Result<StoredBlob, BlobError> {
        let Some(slot) = self.0.get_mut(&blob_id) else {
            return Err(BlobError::NotReserved(blob_id));
        };
        let Some(blob) = slot else {
            return Err(BlobError::NotFulfilled(blob_id));
        };
        if !blob.is_expired(current_epoch) {
            return Err(BlobError::NotExpired(blob_id, blob.end_epoch));
        }
        Ok(slot.take().expect("slot is fulfilled"))
    }
}

/// Errors of blob slot reservation and fulfillment.
#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum BlobError {
    /// a slot for blob {0} is already reserved.
    AlreadyReserved(BlobId),

    /// no slot is reserved for blob {0}.
    NotReserved(BlobId),

    /// slot for blob {0} already holds a stored blob.
    AlreadyFulfilled(BlobId),

    /// slot for blob {0} holds no stored blob.
    NotFulfilled(BlobId),

    /// blob {0} is not expired until epoch {1}.
    NotExpired(BlobId, Epoch),

    #[from]
    #[display(inner)]
    Confinement(confinement::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    fn bid(fill: u8) -> BlobId { BlobId::from_array([fill; 32]) }

    fn blob(fill: u8, end_epoch: u32) -> StoredBlob {
        StoredBlob::with(bid(fill), 1024, Epoch::from(end_epoch))
    }

    #[test]
    fn reserve_twice_fails() {
        let mut registry = BlobSlotRegistry::default();
        registry.reserve(bid(0xAA)).unwrap();
        assert_eq!(
            registry.reserve(bid(0xAA)),
            Err(BlobError::AlreadyReserved(bid(0xAA)))
        );
    }

    #[test]
    fn batch_reservation_is_atomic() {
        let mut registry = BlobSlotRegistry::default();
        registry.reserve(bid(2)).unwrap();
        assert_eq!(
            registry.reserve_many([bid(1), bid(2), bid(3)]),
            Err(BlobError::AlreadyReserved(bid(2)))
        );
        assert!(!registry.is_reserved(bid(1)));
        assert!(!registry.is_reserved(bid(3)));

        assert_eq!(
            registry.reserve_many([bid(4), bid(4)]),
            Err(BlobError::AlreadyReserved(bid(4)))
        );
        assert!(!registry.is_reserved(bid(4)));

        registry.reserve_many([bid(1), bid(3)]).unwrap();
        assert_eq!(registry.slot_count(), 3);
    }

    #[test]
    fn fulfill_requires_reservation() {
        let mut registry = BlobSlotRegistry::default();
        assert_eq!(
            registry.fulfill(blob(0xAA, 10)),
            Err(BlobError::NotReserved(bid(0xAA)))
        );
        registry.reserve(bid(0xAA)).unwrap();
        assert_eq!(registry.fulfill(blob(0xAA, 10)), Ok(None));
        assert_eq!(registry.stored(bid(0xAA)), Some(&blob(0xAA, 10)));
    }

    #[test]
    fn refulfill_swaps_out_prior_blob() {
        let mut registry = BlobSlotRegistry::default();
        registry.reserve(bid(0xAA)).unwrap();
        registry.fulfill(blob(0xAA, 10)).unwrap();
        assert_eq!(registry.fulfill(blob(0xAA, 20)), Ok(Some(blob(0xAA, 10))));
        assert_eq!(registry.stored(bid(0xAA)), Some(&blob(0xAA, 20)));
    }

    #[test]
    fn unreserve_refuses_fulfilled_slot() {
        let mut registry = BlobSlotRegistry::default();
        assert_eq!(
            registry.unreserve(bid(0xAA)),
            Err(BlobError::NotReserved(bid(0xAA)))
        );
        registry.reserve(bid(0xAA)).unwrap();
        registry.fulfill(blob(0xAA, 10)).unwrap();
        assert_eq!(
            registry.unreserve(bid(0xAA)),
            Err(BlobError::AlreadyFulfilled(bid(0xAA)))
        );

        registry.reserve(bid(0xBB)).unwrap();
        registry.unreserve(bid(0xBB)).unwrap();
        assert!(!registry.is_reserved(bid(0xBB)));
    }

    #[test]
    fn renewal_extends_retention() {
        let mut registry = BlobSlotRegistry::default();
        registry.reserve(bid(0xAA)).unwrap();
        assert_eq!(
            registry.renew(bid(0xAA), 5, StorageFee::from(100u64)),
            Err(BlobError::NotFulfilled(bid(0xAA)))
        );
        registry.fulfill(blob(0xAA, 10)).unwrap();
        assert_eq!(
            registry.renew(bid(0xAA), 5, StorageFee::from(100u64)),
            Ok(Epoch::from(15u32))
        );
    }

    #[test]
    fn expiry_gates_removal() {
        let mut registry = BlobSlotRegistry::default();
        registry.reserve(bid(0xAA)).unwrap();
        registry.fulfill(blob(0xAA, 10)).unwrap();
        assert_eq!(
            registry.remove_expired(bid(0xAA), Epoch::from(9u32)),
            Err(BlobError::NotExpired(bid(0xAA), Epoch::from(10u32)))
        );
        assert_eq!(
            registry.remove_expired(bid(0xAA), Epoch::from(10u32)),
            Ok(blob(0xAA, 10))
        );
        // the key is retained as an empty, re-fulfillable slot
        assert!(registry.is_reserved(bid(0xAA)));
        assert_eq!(registry.stored(bid(0xAA)), None);
        assert_eq!(registry.fulfill(blob(0xAA, 30)), Ok(None));
    }
}
