use std::collections::BTreeSet;

use crate::config::{sector_by_id, SECTORS};
use crate::error::{AppError, Result};
use crate::fetch::SubscriptionRequest;

/// Form state behind the subscribe screen: one email plus a sector selection.
#[derive(Debug, Default, Clone)]
pub struct SubscriptionForm {
    pub email: String,
    selected: BTreeSet<String>,
}

impl SubscriptionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_sectors(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn is_selected(&self, sector_id: &str) -> bool {
        self.selected.contains(sector_id)
    }

    /// Toggle a sector in or out of the selection. Toggling twice restores
    /// the selection to its prior value. Unknown ids are ignored.
    pub fn toggle_sector(&mut self, sector_id: &str) {
        if sector_by_id(sector_id).is_none() {
            log::debug!("ignoring unknown sector id {}", sector_id);
            return;
        }
        if !self.selected.remove(sector_id) {
            self.selected.insert(sector_id.to_string());
        }
    }

    /// Add a sector to the selection. Repeated ids stay selected, which is
    /// what a one-shot caller passing a flag list expects.
    pub fn select_sector(&mut self, sector_id: &str) {
        if sector_by_id(sector_id).is_none() {
            log::debug!("ignoring unknown sector id {}", sector_id);
            return;
        }
        self.selected.insert(sector_id.to_string());
    }

    /// A submission needs a plausible email address and at least one
    /// selected sector.
    pub fn validate(&self) -> Result<SubscriptionRequest> {
        if !is_plausible_email(&self.email) {
            return Err(AppError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }

        if self.selected.is_empty() {
            return Err(AppError::Validation(
                "Please select at least one sector".to_string(),
            ));
        }

        // BTreeSet keeps the payload order stable across submissions.
        Ok(SubscriptionRequest {
            email: self.email.trim().to_string(),
            selected_sectors: self.selected.iter().cloned().collect(),
        })
    }

    pub fn reset(&mut self) {
        self.email.clear();
        self.selected.clear();
    }
}

/// All catalogue ids, in display order.
pub fn sector_ids() -> impl Iterator<Item = &'static str> {
    SECTORS.iter().map(|sector| sector.id)
}

fn is_plausible_email(raw: &str) -> bool {
    let trimmed = raw.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !trimmed.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_selection() {
        let mut form = SubscriptionForm::new();
        form.toggle_sector("tech");
        let before: Vec<String> = form.selected_sectors().map(String::from).collect();

        form.toggle_sector("energy");
        form.toggle_sector("energy");

        let after: Vec<String> = form.selected_sectors().map(String::from).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn repeated_select_keeps_sector_selected() {
        let mut form = SubscriptionForm::new();
        form.email = "reader@example.com".to_string();
        form.select_sector("tech");
        form.select_sector("tech");

        assert!(form.is_selected("tech"));
        let request = form.validate().unwrap();
        assert_eq!(request.selected_sectors, vec!["tech"]);
    }

    #[test]
    fn unknown_sector_is_ignored() {
        let mut form = SubscriptionForm::new();
        form.toggle_sector("crypto");
        assert_eq!(form.selected_sectors().count(), 0);
    }

    #[test]
    fn rejects_malformed_email() {
        let mut form = SubscriptionForm::new();
        form.toggle_sector("tech");

        for email in ["", "reader", "reader@", "@example.com", "a b@example.com", "reader@nodot"] {
            form.email = email.to_string();
            assert!(
                matches!(form.validate(), Err(AppError::Validation(_))),
                "accepted {:?}",
                email
            );
        }
    }

    #[test]
    fn rejects_empty_sector_selection() {
        let mut form = SubscriptionForm::new();
        form.email = "reader@example.com".to_string();

        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn valid_form_produces_request() {
        let mut form = SubscriptionForm::new();
        form.email = " reader@example.com ".to_string();
        form.toggle_sector("finance");
        form.toggle_sector("tech");

        let request = form.validate().unwrap();
        assert_eq!(request.email, "reader@example.com");
        assert_eq!(request.selected_sectors, vec!["finance", "tech"]);
    }
}
