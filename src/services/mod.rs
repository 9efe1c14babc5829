//! Service layer: the reconciliation engine and its collaborators.

pub mod admission_log;
pub mod conditions;
pub mod controller;
pub mod matcher;
pub mod reconciler;

pub use admission_log::{AdmissionOperation, AdmissionRequest, AdmissionResponse, NamespaceAdmissionLogger};
pub use controller::Controller;
pub use reconciler::{ReconcileOutcome, Reconciler, SyncAction};
