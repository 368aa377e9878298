use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::player::Player;

/// Process-wide registry of live player instances, keyed by instance id.
///
/// This is the one intentional piece of shared mutable state in the crate:
/// entries are inserted at construction and removed by `Player::destroy`.
static INSTANCES: Lazy<Mutex<HashMap<String, Player>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

pub(crate) fn register(player: &Player) {
    INSTANCES
        .lock()
        .unwrap()
        .insert(player.id().to_string(), player.clone());
}

pub(crate) fn remove(id: &str) {
    INSTANCES.lock().unwrap().remove(id);
}

/// Look up a live instance by id.
pub fn get(id: &str) -> Option<Player> {
    INSTANCES.lock().unwrap().get(id).cloned()
}

/// Ids of all live instances.
pub fn ids() -> Vec<String> {
    INSTANCES.lock().unwrap().keys().cloned().collect()
}
