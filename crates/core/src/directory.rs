//! Patient directory.
//!
//! Holds the most recently fetched list of selectable patients. A refetch replaces the list
//! wholesale. A failed fetch keeps the previous (possibly empty) list, because a stale or
//! empty directory is a usable degraded state. Nothing retries automatically.

use crate::cancel::CancelToken;
use crate::{Backend, ClientResult};
use ng12_types::Patient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryStatus {
    /// Never fetched.
    #[default]
    Unloaded,
    Loading,
    Loaded,
    /// The last fetch failed; `patients()` holds whatever was loaded before it.
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct PatientDirectory {
    patients: Vec<Patient>,
    status: DirectoryStatus,
}

impl PatientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the patient list and replaces the cached one on success.
    ///
    /// # Errors
    ///
    /// Returns the backend's error (network or decode) or `Cancelled`; the cached list is
    /// left untouched in every error case.
    pub async fn refresh<B: Backend>(
        &mut self,
        backend: &B,
        cancel: &CancelToken,
    ) -> ClientResult<&[Patient]> {
        self.status = DirectoryStatus::Loading;
        tracing::debug!("refreshing patient directory");

        match cancel.run(backend.list_patients()).await {
            Ok(patients) => {
                tracing::info!("loaded {} patients", patients.len());
                self.patients = patients;
                self.status = DirectoryStatus::Loaded;
                Ok(&self.patients)
            }
            Err(err) => {
                tracing::warn!("failed to load patients: {}", err);
                self.status = DirectoryStatus::Failed;
                Err(err)
            }
        }
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn status(&self) -> DirectoryStatus {
        self.status
    }

    pub fn first(&self) -> Option<&Patient> {
        self.patients.first()
    }

    pub fn find(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.patient_id == patient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use crate::mock::{patient, server_error, Call, ScriptedBackend};

    #[tokio::test]
    async fn refresh_replaces_list_wholesale() {
        let backend = ScriptedBackend::new()
            .with_patients(Ok(vec![patient("P1", "Jane Doe"), patient("P2", "John Roe")]))
            .with_patients(Ok(vec![patient("P3", "Ann Poe")]));
        let mut directory = PatientDirectory::new();

        directory.refresh(&backend, &CancelToken::never()).await.unwrap();
        assert_eq!(directory.patients().len(), 2);

        directory.refresh(&backend, &CancelToken::never()).await.unwrap();
        assert_eq!(directory.patients().len(), 1);
        assert_eq!(directory.first().unwrap().patient_id, "P3");
        assert!(directory.find("P1").is_none());
        assert_eq!(backend.calls(), vec![Call::ListPatients, Call::ListPatients]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_list() {
        let backend = ScriptedBackend::new()
            .with_patients(Ok(vec![patient("P1", "Jane Doe")]))
            .with_patients(Err(server_error(Operation::ListPatients)));
        let mut directory = PatientDirectory::new();

        directory.refresh(&backend, &CancelToken::never()).await.unwrap();
        let err = directory
            .refresh(&backend, &CancelToken::never())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(directory.status(), DirectoryStatus::Failed);
        assert_eq!(directory.find("P1").unwrap().name, "Jane Doe");
    }
}
