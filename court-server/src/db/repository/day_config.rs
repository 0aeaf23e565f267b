//! Day Config Repository
//!
//! The active day is stored as a single JSON document.

use redb::ReadableTable;
use shared::models::DayConfig;

use crate::db::{DAY_CONFIG_TABLE, DbService, StoreResult};

const ACTIVE_KEY: &str = "active";

/// Active config as seen by an open transaction (read or write)
pub(crate) fn read_active<T>(table: &T) -> StoreResult<Option<DayConfig>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(ACTIVE_KEY)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

#[derive(Clone)]
pub struct DayConfigRepository {
    db: DbService,
}

impl DayConfigRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// 当前生效的营业日配置
    pub fn find_active(&self) -> StoreResult<Option<DayConfig>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DAY_CONFIG_TABLE)?;
        read_active(&table)
    }

    /// 替换当前生效的配置
    pub fn save(&self, config: &DayConfig) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(DAY_CONFIG_TABLE)?;
            let value = serde_json::to_vec(config)?;
            table.insert(ACTIVE_KEY, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// 仅刷新 updated_at (使 ETag 失效)
    pub fn touch(&self, updated_at: i64) -> StoreResult<Option<DayConfig>> {
        let txn = self.db.begin_write()?;
        let touched = {
            let mut table = txn.open_table(DAY_CONFIG_TABLE)?;
            let current: Option<DayConfig> = match table.get(ACTIVE_KEY)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            match current {
                Some(mut config) => {
                    config.updated_at = updated_at;
                    let value = serde_json::to_vec(&config)?;
                    table.insert(ACTIVE_KEY, value.as_slice())?;
                    Some(config)
                }
                None => None,
            }
        };
        txn.commit()?;
        Ok(touched)
    }
}
