//! Deferred body creation.
//!
//! Bodies never hold a reference to the battlefield. Anything that needs to
//! create a body during a tick pushes it here; the battlefield flushes the
//! buffer between passes so iteration over the body list is never disturbed.
//!
//! Body IDs are derived from what created the body (the parent's ID and a
//! salt), never from a counter. Two peers that receive the same orders in a
//! different order still name every body the same way, and the battlefield
//! keeps its bodies sorted by creation time and ID.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::body::{Body, BodyId};

/// Root of the ID lineage for ships.
pub(crate) const SHIP_LINEAGE: BodyId = 0x5348_4950;

/// Root of the ID lineage for placement regions.
pub(crate) const REGION_LINEAGE: BodyId = 0x5245_4749;

/// Mix a parent ID and a salt into a child ID (splitmix64 finalizer).
pub fn derive_id(parent: BodyId, salt: u64) -> BodyId {
    let mut z = parent ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[derive(Debug)]
pub struct Spawner {
    pending: Vec<Body>,
    seed: u64,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            pending: Vec::new(),
            seed,
        }
    }

    /// Queue a body under `id`; it joins the battlefield at the next flush.
    pub fn spawn(&mut self, mut body: Body, id: BodyId) -> BodyId {
        body.id = id;
        debug!(id, created = body.created(), sprite = %body.sprite_name(), "spawn");
        self.pending.push(body);
        id
    }

    /// Random source owned by one body. Depends only on the match seed and
    /// the ID, so it does not matter which body draws first.
    pub fn rng_for(&self, id: BodyId) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed ^ id)
    }

    pub fn pending(&self) -> &[Body] {
        &self.pending
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Body> {
        self.pending.drain(..)
    }
}
