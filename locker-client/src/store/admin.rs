//! Admin resources: locations, lockers, compartments and dashboard counters.
//!
//! Creates are applied to the local lists straight from the backend response
//! instead of reloading. The guided setup walks a new site through one
//! location, one locker and its compartments.

use std::collections::HashMap;
use tracing::info;

use crate::api::{compartments, locations, lockers, overview};
use crate::error::{FlowError, FlowResult, ValidationError};
use crate::http::HttpClient;
use crate::models::{Compartment, CompartmentSpec, Location, Locker, LockerStatus, Overview};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupStep {
    #[default]
    Location,
    Locker,
    Compartments,
    Finished,
}

pub struct AdminStore {
    http: HttpClient,
    pub locations: Vec<Location>,
    pub lockers: Vec<Locker>,
    /// Compartments keyed by locker id
    pub compartments: HashMap<String, Vec<Compartment>>,
    pub overview: Option<Overview>,
    pub last_location_id: Option<String>,
    pub last_locker_id: Option<String>,
    pub setup_step: SetupStep,
    pub loading: bool,
    pub submitting: bool,
}

impl AdminStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            locations: Vec::new(),
            lockers: Vec::new(),
            compartments: HashMap::new(),
            overview: None,
            last_location_id: None,
            last_locker_id: None,
            setup_step: SetupStep::Location,
            loading: false,
            submitting: false,
        }
    }

    pub async fn load_locations(&mut self) -> FlowResult<&[Location]> {
        self.loading = true;
        let result = locations::list_locations(&self.http).await;
        self.loading = false;

        self.locations = result?;
        Ok(self.locations.as_slice())
    }

    pub async fn load_lockers(&mut self) -> FlowResult<&[Locker]> {
        self.loading = true;
        let result = lockers::list_lockers(&self.http).await;
        self.loading = false;

        self.lockers = result?;
        Ok(self.lockers.as_slice())
    }

    pub async fn load_compartments(&mut self, locker_id: &str) -> FlowResult<&[Compartment]> {
        let locker_id = validation::entity_id("locker_id", locker_id)?;

        self.loading = true;
        let result = compartments::list_compartments(&self.http, &locker_id).await;
        self.loading = false;

        self.compartments.insert(locker_id.clone(), result?);
        Ok(self.compartments_for(&locker_id))
    }

    pub async fn load_overview(&mut self) -> FlowResult<&Overview> {
        self.loading = true;
        let result = overview::get_overview(&self.http).await;
        self.loading = false;

        Ok(&*self.overview.insert(result?))
    }

    pub async fn create_location(&mut self, request: &locations::CreateLocation) -> FlowResult<&Location> {
        validation::required("code", &request.code)?;
        validation::required("name", &request.name)?;

        self.submitting = true;
        let result = locations::create_location(&self.http, request).await;
        self.submitting = false;

        let location = result?;
        info!("📍 Created location {} ({})", location.code, location.location_id);
        self.last_location_id = Some(location.location_id.clone());
        if self.setup_step == SetupStep::Location {
            self.setup_step = SetupStep::Locker;
        }
        self.locations.push(location);
        self.locations
            .last()
            .ok_or(FlowError::InvalidState("EMPTY_LOCATIONS"))
    }

    pub async fn create_locker(&mut self, request: &lockers::CreateLocker) -> FlowResult<&Locker> {
        let request = lockers::CreateLocker {
            location_id: validation::entity_id("location_id", &request.location_id)?,
            locker_code: validation::required("locker_code", &request.locker_code)?,
            name: request.name.clone(),
        };

        self.submitting = true;
        let result = lockers::create_locker(&self.http, &request).await;
        self.submitting = false;

        let locker = result?;
        info!("🗄️ Created locker {} ({})", locker.locker_code, locker.locker_id);
        self.last_locker_id = Some(locker.locker_id.clone());
        if self.setup_step == SetupStep::Locker {
            self.setup_step = SetupStep::Compartments;
        }
        self.lockers.push(locker);
        self.lockers
            .last()
            .ok_or(FlowError::InvalidState("EMPTY_LOCKERS"))
    }

    /// Change a locker's status and mirror it in the local list
    pub async fn update_locker_status(&mut self, locker_id: &str, status: LockerStatus) -> FlowResult<LockerStatus> {
        if status == LockerStatus::Unknown {
            return Err(FlowError::InvalidState("UNKNOWN_STATUS"));
        }
        let locker_id = validation::entity_id("locker_id", locker_id)?;

        self.submitting = true;
        let result = lockers::update_locker_status(&self.http, &locker_id, status).await;
        self.submitting = false;

        let changed = result?;
        info!("Locker {} is now {}", changed.locker_id, changed.status);
        if let Some(locker) = self.lockers.iter_mut().find(|l| l.locker_id == locker_id) {
            locker.status = Some(changed.status);
        }
        Ok(changed.status)
    }

    /// Batch-create compartments, then reload that locker's list.
    ///
    /// Returns the number of compartments the backend reports as created.
    pub async fn create_compartments(&mut self, locker_id: &str, rows: &[CompartmentSpec]) -> FlowResult<u32> {
        if rows.is_empty() {
            return Err(ValidationError::Required {
                field: "compartments",
            }
            .into());
        }
        let locker_id = validation::entity_id("locker_id", locker_id)?;

        self.submitting = true;
        let result = compartments::create_compartments(&self.http, &locker_id, rows).await;
        self.submitting = false;

        let created = result?;
        info!("Created {} compartment(s) in locker {}", created.created_count, locker_id);
        if self.setup_step == SetupStep::Compartments {
            self.setup_step = SetupStep::Finished;
        }

        self.load_compartments(&locker_id).await?;
        Ok(created.created_count)
    }

    pub fn compartments_for(&self, locker_id: &str) -> &[Compartment] {
        let key = validation::entity_id("locker_id", locker_id)
            .unwrap_or_else(|_| locker_id.trim().to_string());
        self.compartments
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn reset_setup(&mut self) {
        self.setup_step = SetupStep::Location;
        self.last_location_id = None;
        self.last_locker_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store() -> AdminStore {
        AdminStore::new(HttpClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap())
    }

    #[tokio::test]
    async fn test_create_validates_before_calling() {
        let mut store = store();
        let err = store
            .create_location(&locations::CreateLocation::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));

        let err = store.create_compartments("l-1", &[]).await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert!(!store.submitting);
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let mut store = store();
        let err = store
            .update_locker_status("l-1", LockerStatus::Unknown)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_non_uuid_ids_rejected_before_calling() {
        let mut store = store();
        let rows = [CompartmentSpec {
            compartment_no: 1,
            size: crate::models::CompartmentSize::S,
        }];

        let err = store.create_compartments("locker-1", &rows).await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::Invalid { field: "locker_id", .. })
        ));

        let err = store
            .update_locker_status("locker-1", LockerStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));

        let err = store
            .create_locker(&lockers::CreateLocker {
                location_id: "loc-1".to_string(),
                locker_code: "A-01".to_string(),
                name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::Invalid { field: "location_id", .. })
        ));
        assert!(!store.submitting);
    }

    #[test]
    fn test_compartments_for_missing_locker() {
        let store = store();
        assert!(store.compartments_for("nope").is_empty());
        assert_eq!(store.setup_step, SetupStep::Location);
    }
}
