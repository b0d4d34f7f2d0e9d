use std::sync::{Arc, Mutex};

use cacti_api::{ActorId, Role};

use crate::thread::actor::ActorCell;
use crate::thread::error::SpawnError;
use crate::thread::sync::lock;

/// Arena of every actor created by one system, indexed by id.
///
/// Actors are never removed individually; the whole arena is dropped at
/// teardown. The `finished` counter tracks actors that processed `GODIE`.
#[derive(Debug)]
pub struct Registry {
    inner: Mutex<RegistryInner>,
    max_actors: usize,
    mailbox_limit: usize,
    ring_size: usize,
}

#[derive(Debug, Default)]
struct RegistryInner {
    actors: Vec<Arc<ActorCell>>,
    finished: usize,
    created: usize,
}

impl Registry {
    pub fn new(max_actors: usize, mailbox_limit: usize, ring_size: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            max_actors,
            mailbox_limit,
            ring_size,
        }
    }

    /// Create an actor with the next free id.
    pub fn insert(&self, role: Arc<Role>) -> Result<Arc<ActorCell>, SpawnError> {
        let mut inner = lock(&self.inner, "registry");
        if inner.actors.len() >= self.max_actors {
            return Err(SpawnError::ActorLimitReached {
                limit: self.max_actors,
            });
        }
        let id = ActorId(inner.actors.len());
        let cell = Arc::new(ActorCell::new(id, role, self.mailbox_limit, self.ring_size));
        inner.actors.push(cell.clone());
        inner.created += 1;
        Ok(cell)
    }

    pub fn get(&self, id: ActorId) -> Option<Arc<ActorCell>> {
        lock(&self.inner, "registry").actors.get(id.index()).cloned()
    }

    pub fn mark_finished(&self) {
        lock(&self.inner, "registry").finished += 1;
    }

    /// True once every created actor has processed `GODIE`.
    pub fn all_finished(&self) -> bool {
        let inner = lock(&self.inner, "registry");
        inner.finished >= inner.actors.len()
    }

    pub fn actor_count(&self) -> usize {
        lock(&self.inner, "registry").actors.len()
    }

    pub fn finished_count(&self) -> usize {
        lock(&self.inner, "registry").finished
    }

    /// Ids handed out so far. Unlike `actor_count`, this survives `clear`.
    pub fn created_count(&self) -> usize {
        lock(&self.inner, "registry").created
    }

    pub fn snapshot(&self) -> Vec<Arc<ActorCell>> {
        lock(&self.inner, "registry").actors.clone()
    }

    /// Drop every actor, returning how many there were.
    pub fn clear(&self) -> usize {
        let actors = std::mem::take(&mut lock(&self.inner, "registry").actors);
        actors.len()
    }
}
