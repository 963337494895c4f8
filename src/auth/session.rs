use actix_session::Session;
use rusqlite::Connection;

use crate::errors::AppError;
use crate::models::member::{self, Member};

/// Small key-value store for visitor identity, keyed per jar. The production
/// implementation is the cookie session; tests use an in-memory map.
pub trait IdentityStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
}

impl IdentityStore for Session {
    fn read(&self, key: &str) -> Option<String> {
        self.get::<String>(key).unwrap_or(None)
    }

    fn write(&self, key: &str, value: &str) {
        let _ = self.insert(key, value);
    }

    fn delete(&self, key: &str) {
        let _ = self.remove(key);
    }
}

fn member_key(jar_id: &str) -> String {
    format!("member_{jar_id}")
}

fn creator_key(jar_id: &str) -> String {
    format!("creator_{jar_id}")
}

pub fn remember_member(store: &impl IdentityStore, jar_id: &str, member_id: &str) {
    store.write(&member_key(jar_id), member_id);
}

pub fn forget_member(store: &impl IdentityStore, jar_id: &str) {
    store.delete(&member_key(jar_id));
}

pub fn remember_creator(store: &impl IdentityStore, jar_id: &str) {
    store.write(&creator_key(jar_id), "1");
}

pub fn is_local_creator(store: &impl IdentityStore, jar_id: &str) -> bool {
    store.read(&creator_key(jar_id)).as_deref() == Some("1")
}

/// Resolve the visitor's member record for a jar. A stored id the server no
/// longer recognizes is stale local state: the key is cleared silently and the
/// visitor falls back to the join flow.
pub fn resolve_member(
    store: &impl IdentityStore,
    conn: &Connection,
    jar_id: &str,
) -> Result<Option<Member>, AppError> {
    let Some(member_id) = store.read(&member_key(jar_id)) else {
        return Ok(None);
    };
    match member::find_by_id(conn, &member_id)? {
        Some(m) if m.jar_id == jar_id => Ok(Some(m)),
        _ => {
            log::info!("Stale member id for jar {jar_id}, clearing");
            forget_member(store, jar_id);
            Ok(None)
        }
    }
}

pub fn set_flash(session: &Session, message: &str) {
    let _ = session.insert("flash", message);
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        let _ = session.remove("flash");
    }
    flash
}
