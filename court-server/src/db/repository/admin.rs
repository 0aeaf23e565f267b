//! Admin Repository
//!
//! Persists the admin credential as an argon2 PHC string.

use redb::ReadableTable;

use crate::db::{ADMIN_TABLE, DbService, StoreResult};

const PIN_HASH_KEY: &str = "pin_hash";

#[derive(Clone)]
pub struct AdminRepository {
    db: DbService,
}

impl AdminRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    pub fn pin_hash(&self) -> StoreResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ADMIN_TABLE)?;
        Ok(table.get(PIN_HASH_KEY)?.map(|v| v.value().to_string()))
    }

    pub fn set_pin_hash(&self, hash: &str) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ADMIN_TABLE)?;
            table.insert(PIN_HASH_KEY, hash)?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_hash_roundtrip() {
        let repo = AdminRepository::new(DbService::open_in_memory().unwrap());
        assert!(repo.pin_hash().unwrap().is_none());
        repo.set_pin_hash("$argon2id$a").unwrap();
        repo.set_pin_hash("$argon2id$b").unwrap();
        assert_eq!(repo.pin_hash().unwrap().as_deref(), Some("$argon2id$b"));
    }
}
