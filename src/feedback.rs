//! UI Feedback
//!
//! Coordinator notices and in-flight counts, written into the app store.

use garden_state::{Feedback, Notice, NoticeLevel};
use leptos::prelude::*;

use crate::store::{AppStateStoreFields, AppStore};

/// Most notices kept on screen at once
const MAX_NOTICES: usize = 5;

pub struct UiFeedback {
    store: AppStore,
}

impl UiFeedback {
    pub fn new(store: AppStore) -> Self {
        Self { store }
    }
}

impl Feedback for UiFeedback {
    fn notice(&self, notice: Notice) {
        if notice.level == NoticeLevel::Error {
            log::warn!("notice: {}", notice.message);
        }
        let notices_field = self.store.notices();
        let mut notices = notices_field.write();
        notices.push(notice);
        if notices.len() > MAX_NOTICES {
            notices.remove(0);
        }
    }

    fn in_flight(&self, count: usize) {
        self.store.in_flight().set(count);
    }
}
