//! Dashboard controller: the donor list, its filtered view, the open form
//! and pending delete confirmation.
//!
//! Every successful mutation is followed by a full refetch; the controller
//! never patches its list locally.

use shared::{
    BloodGroupFilter, Donor, DonorFilter, DonorForm, DonorId, FormSubmission, SortKey,
};

use crate::api::{ApiError, DonorApi};
use crate::log_warning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Toast-style message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success",
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error",
            message: message.into(),
        }
    }
}

pub struct Dashboard<A> {
    api: A,
    donors: Vec<Donor>,
    view: Vec<Donor>,
    filter: DonorFilter,
    loading: bool,
    form: Option<DonorForm>,
    pending_delete: Option<DonorId>,
    notices: Vec<Notice>,
}

impl<A: DonorApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            donors: Vec::new(),
            view: Vec::new(),
            filter: DonorFilter::default(),
            loading: true,
            form: None,
            pending_delete: None,
            notices: Vec::new(),
        }
    }

    /// Initial fetch of the donor list
    pub async fn load(&mut self) {
        self.refresh().await;
    }

    /// Refetch the full list. On failure the previous list is kept.
    pub async fn refresh(&mut self) {
        match self.api.list_donors().await {
            Ok(donors) => {
                self.donors = donors;
                self.recompute();
            }
            Err(err) => {
                log_warning(&format!("Failed to fetch donors: {}", err));
                self.notify(Notice::error(fetch_failure(&err)));
            }
        }
        self.loading = false;
    }

    fn recompute(&mut self) {
        self.view = self.filter.apply(&self.donors);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Every donor, in server order
    pub fn donors(&self) -> &[Donor] {
        &self.donors
    }

    /// Donors after filtering and sorting
    pub fn view(&self) -> &[Donor] {
        &self.view
    }

    pub fn filter(&self) -> DonorFilter {
        self.filter
    }

    pub fn set_blood_group(&mut self, blood_group: BloodGroupFilter) {
        self.filter.blood_group = blood_group;
        self.recompute();
    }

    pub fn set_sort(&mut self, sort_by: SortKey) {
        self.filter.sort_by = sort_by;
        self.recompute();
    }

    /// Text for an empty view, `None` while loading or when there is
    /// something to show
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.loading || !self.view.is_empty() {
            return None;
        }
        if self.donors.is_empty() {
            Some("Start by adding your first donor")
        } else {
            Some("Try adjusting your filters")
        }
    }

    // ------------------------------------------------------------------
    // Form
    // ------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.form = Some(DonorForm::create());
    }

    /// Open the edit form for a listed donor; unknown ids are ignored
    pub fn open_edit(&mut self, id: DonorId) -> bool {
        match self.donors.iter().find(|donor| donor.id == id) {
            Some(donor) => {
                self.form = Some(DonorForm::edit(donor));
                true
            }
            None => false,
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn form(&self) -> Option<&DonorForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut DonorForm> {
        self.form.as_mut()
    }

    /// Validate and send the open form. On success the form closes and the
    /// list is refetched; on failure the form stays open with the error.
    pub async fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        // Validation errors are already shown on the form
        let Ok(submission) = form.begin_submit() else {
            return;
        };

        let outcome = match &submission {
            FormSubmission::Create(input) => self
                .api
                .create_donor(input)
                .await
                .map(|_| "Donor added successfully"),
            FormSubmission::Update(id, patch) => {
                match self.api.update_donor(*id, patch).await {
                    Ok(result) if result.matched_count == 0 => Err(ApiError::Status {
                        status: 404,
                        message: "Donor not found".to_string(),
                    }),
                    Ok(_) => Ok("Donor updated successfully"),
                    Err(err) => Err(err),
                }
            }
        };

        match outcome {
            Ok(message) => {
                self.form = None;
                self.notify(Notice::success(message));
                self.refresh().await;
            }
            Err(err) => {
                log_warning(&format!("Failed to save donor: {}", err));
                let message = err.to_string();
                if let Some(form) = self.form.as_mut() {
                    form.fail(message.clone());
                }
                self.notify(Notice::error(message));
            }
        }
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Ask for confirmation before deleting
    pub fn request_delete(&mut self, id: DonorId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<DonorId> {
        self.pending_delete
    }

    /// Delete the donor awaiting confirmation, if any
    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        match self.api.delete_donor(id).await {
            Ok(result) if result.deleted_count == 0 => {
                self.notify(Notice::error("No donor deleted"));
            }
            Ok(_) => {
                self.notify(Notice::success("Donor deleted successfully"));
                self.refresh().await;
            }
            Err(err) => {
                log_warning(&format!("Failed to delete donor {}: {}", id, err));
                self.notify(Notice::error(delete_failure(&err)));
            }
        }
    }

    // ------------------------------------------------------------------
    // Notices
    // ------------------------------------------------------------------

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices once they are shown
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

fn fetch_failure(err: &ApiError) -> String {
    match err {
        ApiError::Status { .. } => "Failed to fetch donors".to_string(),
        ApiError::Http(_) => err.to_string(),
    }
}

fn delete_failure(err: &ApiError) -> String {
    match err {
        ApiError::Status { .. } => "Failed to delete donor".to_string(),
        ApiError::Http(_) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::{
        BloodGroup, DeleteResult, DonorPatch, InsertResult, NewDonor, UpdateResult,
    };
    use std::cell::{Cell, RefCell};
    use tokio_test::block_on;

    /// In-memory stand-in for the server
    #[derive(Default)]
    struct FakeApi {
        donors: RefCell<Vec<Donor>>,
        list_calls: Cell<usize>,
        fail_writes: Cell<bool>,
        fail_list: Cell<bool>,
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 500,
            message: "A database error occurred".to_string(),
        }
    }

    impl DonorApi for FakeApi {
        async fn list_donors(&self) -> Result<Vec<Donor>, ApiError> {
            self.list_calls.set(self.list_calls.get() + 1);
            if self.fail_list.get() {
                return Err(unavailable());
            }
            Ok(self.donors.borrow().clone())
        }

        async fn create_donor(&self, input: &NewDonor) -> Result<InsertResult, ApiError> {
            if self.fail_writes.get() {
                return Err(unavailable());
            }
            let id = DonorId::new();
            let details = input.clone().into_details(Utc::now());
            self.donors.borrow_mut().push(Donor::new(id, details));
            Ok(InsertResult { inserted_id: id })
        }

        async fn update_donor(
            &self,
            id: DonorId,
            patch: &DonorPatch,
        ) -> Result<UpdateResult, ApiError> {
            if self.fail_writes.get() {
                return Err(unavailable());
            }
            let mut donors = self.donors.borrow_mut();
            Ok(match donors.iter_mut().find(|d| d.id == id) {
                Some(donor) => UpdateResult {
                    matched_count: 1,
                    modified_count: u64::from(donor.details.apply(patch)),
                },
                None => UpdateResult::default(),
            })
        }

        async fn delete_donor(&self, id: DonorId) -> Result<DeleteResult, ApiError> {
            if self.fail_writes.get() {
                return Err(unavailable());
            }
            let mut donors = self.donors.borrow_mut();
            let before = donors.len();
            donors.retain(|d| d.id != id);
            Ok(DeleteResult {
                deleted_count: (before - donors.len()) as u64,
            })
        }
    }

    fn seeded() -> FakeApi {
        let api = FakeApi::default();
        for (day, (name, group)) in [
            ("John Smith", BloodGroup::APositive),
            ("Sarah Johnson", BloodGroup::ONegative),
            ("David Wilson", BloodGroup::APositive),
        ]
        .into_iter()
        .enumerate()
        {
            let mut input = NewDonor::new(name, group, "+1-555-0100");
            input.created_at = Some(Utc.with_ymd_and_hms(2024, 1, day as u32 + 1, 0, 0, 0).unwrap());
            api.donors
                .borrow_mut()
                .push(Donor::new(DonorId::new(), input.into_details(Utc::now())));
        }
        api
    }

    fn names(donors: &[Donor]) -> Vec<&str> {
        donors.iter().map(|d| d.details.name.as_str()).collect()
    }

    #[test]
    fn test_load_and_view() {
        let mut dashboard = Dashboard::new(seeded());
        assert!(dashboard.is_loading());
        assert_eq!(dashboard.empty_message(), None);

        block_on(dashboard.load());
        assert!(!dashboard.is_loading());
        assert_eq!(
            names(dashboard.view()),
            vec!["David Wilson", "Sarah Johnson", "John Smith"]
        );

        dashboard.set_blood_group(BloodGroupFilter::Only(BloodGroup::APositive));
        dashboard.set_sort(SortKey::Name);
        assert_eq!(names(dashboard.view()), vec!["David Wilson", "John Smith"]);
        assert_eq!(dashboard.donors().len(), 3);
    }

    #[test]
    fn test_empty_messages() {
        let mut dashboard = Dashboard::new(FakeApi::default());
        block_on(dashboard.load());
        assert_eq!(
            dashboard.empty_message(),
            Some("Start by adding your first donor")
        );

        let mut dashboard = Dashboard::new(seeded());
        block_on(dashboard.load());
        dashboard.set_blood_group(BloodGroupFilter::Only(BloodGroup::AbNegative));
        assert_eq!(dashboard.empty_message(), Some("Try adjusting your filters"));
    }

    #[test]
    fn test_failed_fetch_keeps_list_and_notifies() {
        let mut dashboard = Dashboard::new(seeded());
        block_on(dashboard.load());

        dashboard.api.fail_list.set(true);
        block_on(dashboard.refresh());

        assert_eq!(dashboard.view().len(), 3);
        let notices = dashboard.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Failed to fetch donors");
        assert!(dashboard.notices().is_empty());
    }

    #[test]
    fn test_create_submits_closes_and_refetches() {
        let mut dashboard = Dashboard::new(FakeApi::default());
        block_on(dashboard.load());

        dashboard.open_create();
        let form = dashboard.form_mut().unwrap();
        form.values.name = "Jane Doe".to_string();
        form.values.blood_group = "O-".to_string();
        form.values.contact_phone = "555-0000".to_string();

        block_on(dashboard.submit_form());

        assert!(dashboard.form().is_none());
        assert_eq!(dashboard.api.list_calls.get(), 2);
        assert_eq!(names(dashboard.view()), vec!["Jane Doe"]);
        assert_eq!(
            dashboard.take_notices(),
            vec![Notice::success("Donor added successfully")]
        );
    }

    #[test]
    fn test_invalid_form_is_not_sent() {
        let mut dashboard = Dashboard::new(FakeApi::default());
        block_on(dashboard.load());

        dashboard.open_create();
        block_on(dashboard.submit_form());

        let form = dashboard.form().unwrap();
        assert!(form.error().is_some());
        assert!(!form.is_submitting());
        assert_eq!(dashboard.api.list_calls.get(), 1);
        assert!(dashboard.api.donors.borrow().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_form_open() {
        let mut dashboard = Dashboard::new(seeded());
        block_on(dashboard.load());
        let id = dashboard.view()[0].id;

        assert!(dashboard.open_edit(id));
        dashboard.form_mut().unwrap().values.notes = "Moved".to_string();
        dashboard.api.fail_writes.set(true);

        block_on(dashboard.submit_form());

        let form = dashboard.form().unwrap();
        assert_eq!(form.error(), Some("A database error occurred"));
        assert!(!form.is_submitting());
        assert_eq!(dashboard.notices()[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_edit_updates_donor() {
        let mut dashboard = Dashboard::new(seeded());
        block_on(dashboard.load());
        let id = dashboard.view()[0].id;

        assert!(dashboard.open_edit(id));
        assert_eq!(dashboard.form().unwrap().title(), "Edit Donor");
        dashboard.form_mut().unwrap().values.location_city = "Phoenix".to_string();

        block_on(dashboard.submit_form());

        assert!(dashboard.form().is_none());
        let donor = dashboard.donors().iter().find(|d| d.id == id).unwrap();
        assert_eq!(donor.details.location_city.as_deref(), Some("Phoenix"));
        assert_eq!(
            dashboard.take_notices(),
            vec![Notice::success("Donor updated successfully")]
        );
    }

    #[test]
    fn test_open_edit_unknown_id() {
        let mut dashboard = Dashboard::new(seeded());
        block_on(dashboard.load());
        assert!(!dashboard.open_edit(DonorId::new()));
        assert!(dashboard.form().is_none());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut dashboard = Dashboard::new(seeded());
        block_on(dashboard.load());
        let id = dashboard.view()[0].id;

        dashboard.request_delete(id);
        dashboard.cancel_delete();
        block_on(dashboard.confirm_delete());
        assert_eq!(dashboard.donors().len(), 3);

        dashboard.request_delete(id);
        assert_eq!(dashboard.pending_delete(), Some(id));
        block_on(dashboard.confirm_delete());

        assert_eq!(dashboard.donors().len(), 2);
        assert_eq!(dashboard.pending_delete(), None);
        assert_eq!(
            dashboard.take_notices(),
            vec![Notice::success("Donor deleted successfully")]
        );
    }

    #[test]
    fn test_delete_of_missing_donor_is_an_error() {
        let mut dashboard = Dashboard::new(seeded());
        block_on(dashboard.load());

        dashboard.request_delete(DonorId::new());
        block_on(dashboard.confirm_delete());

        assert_eq!(
            dashboard.take_notices(),
            vec![Notice::error("No donor deleted")]
        );
        assert_eq!(dashboard.api.list_calls.get(), 1);
    }
}
