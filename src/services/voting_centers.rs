//! Voting centers

use crate::integrity::require;
use crate::model::{
    NewVotingCenter, VotingCenter, VotingCenterDetails, VotingCenterPatch, VotingTable,
    require_text,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::Id;
use crate::Result;
use std::sync::Arc;
use tracing::info;

fn load(tx: &impl Transaction, center: VotingCenter) -> VotingCenterDetails {
    let mut voting_tables = tx.find_where::<VotingTable>(|table| table.voting_center_id == center.id);
    voting_tables.sort_by(|a, b| a.code.cmp(&b.code).then(a.id.cmp(&b.id)));
    VotingCenterDetails {
        voting_tables,
        center,
    }
}

pub struct VotingCenterService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> VotingCenterService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewVotingCenter) -> Result<ServiceResponse<VotingCenterDetails>> {
        require_text("name", &input.name)?;
        require_text("address", &input.address)?;

        let mut tx = self.store.begin().await?;
        let center = tx.insert(VotingCenter {
            id: 0,
            name: input.name.trim().to_string(),
            address: input.address.trim().to_string(),
            latitude: input.latitude,
            longitude: input.longitude,
            department: input.department,
            province: input.province,
            district: input.district,
            sketch_url: input.sketch_url,
        })?;
        let details = load(&tx, center);
        tx.commit()?;

        info!("🏫 Voting center {} registered", details.center.id);
        Ok(ServiceResponse::created("Voting center created successfully", details))
    }

    /// All centers by name
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<VotingCenterDetails>>> {
        let tx = self.store.begin().await?;
        let mut centers = tx.list::<VotingCenter>();
        centers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        let centers = centers.into_iter().map(|center| load(&tx, center)).collect();
        Ok(ServiceResponse::ok("Voting centers retrieved successfully", centers))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<VotingCenterDetails>> {
        let tx = self.store.begin().await?;
        let center = require::<VotingCenter>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Voting center retrieved successfully",
            load(&tx, center),
        ))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: VotingCenterPatch,
    ) -> Result<ServiceResponse<VotingCenterDetails>> {
        let mut tx = self.store.begin().await?;
        let mut center = require::<VotingCenter>(&tx, id)?;

        if let Some(name) = patch.name {
            require_text("name", &name)?;
            center.name = name.trim().to_string();
        }
        if let Some(address) = patch.address {
            require_text("address", &address)?;
            center.address = address.trim().to_string();
        }
        patch.latitude.apply_to(&mut center.latitude);
        patch.longitude.apply_to(&mut center.longitude);
        patch.department.apply_to(&mut center.department);
        patch.province.apply_to(&mut center.province);
        patch.district.apply_to(&mut center.district);
        patch.sketch_url.apply_to(&mut center.sketch_url);

        let center = tx.update(center)?;
        let details = load(&tx, center);
        tx.commit()?;

        Ok(ServiceResponse::ok("Voting center updated successfully", details))
    }

    /// Refused while any voting table still sits in the center
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<VotingCenter>> {
        let mut tx = self.store.begin().await?;
        let center = tx.delete::<VotingCenter>(id)?;
        tx.commit()?;

        info!("🗑️ Voting center {} removed", center.id);
        Ok(ServiceResponse::ok("Voting center removed successfully", center))
    }
}
