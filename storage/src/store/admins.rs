// storage/src/store/admins.rs

use models::clinic::{Admin, NewAdmin};

use super::{ClinicStore, fetch, put, read_opt, release_unique, reserve_unique, scan};
use crate::errors::StoreResult;

impl ClinicStore {
    pub fn create_admin(&self, new: NewAdmin) -> StoreResult<Admin> {
        let id = self.next_id()?;
        reserve_unique(
            &self.idx_admin_wallet,
            new.wallet_address.as_bytes(),
            id,
            "Admin with this wallet address already exists",
        )?;
        let admin = Admin::from_new(id, new);
        put(&self.admins, id, &admin)?;
        Ok(admin)
    }

    pub fn admin(&self, id: u64) -> StoreResult<Admin> {
        fetch(&self.admins, id, "Admin")
    }

    pub fn admin_by_wallet(&self, wallet_address: &str) -> StoreResult<Option<Admin>> {
        match super::index_holder(&self.idx_admin_wallet, wallet_address.as_bytes())? {
            Some(id) => read_opt(&self.admins, id),
            None => Ok(None),
        }
    }

    pub fn admins(&self) -> StoreResult<Vec<Admin>> {
        scan(&self.admins)
    }

    pub fn update_admin(&self, id: u64, name: Option<String>) -> StoreResult<Admin> {
        let mut admin = self.admin(id)?;
        if let Some(name) = name {
            admin.name = Some(name);
        }
        admin.updated_at = chrono::Utc::now();
        put(&self.admins, id, &admin)?;
        Ok(admin)
    }

    pub fn delete_admin(&self, id: u64) -> StoreResult<()> {
        let admin = self.admin(id)?;
        release_unique(&self.idx_admin_wallet, admin.wallet_address.as_bytes(), id)?;
        self.admins.remove(super::id_key(id))?;
        Ok(())
    }
}
