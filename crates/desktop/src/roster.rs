use facedeck_core::api::types::RegisteredUser;

/// An in-progress rename on one roster row.
#[derive(Debug, Clone)]
pub struct RenameEdit {
    pub target: String,
    pub buffer: String,
}

/// State behind the registered-users panel: the cached roster, the load
/// flag, and at most one pending rename or delete at a time.
pub struct RosterState {
    pub users: Vec<RegisteredUser>,
    pub loading: bool,
    rename: Option<RenameEdit>,
    pending_delete: Option<String>,
}

impl RosterState {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            loading: true,
            rename: None,
            pending_delete: None,
        }
    }

    pub fn set_users(&mut self, users: Vec<RegisteredUser>) {
        self.users = users;
        self.loading = false;
    }

    /// Load failures keep whatever roster was on screen.
    pub fn load_failed(&mut self) {
        self.loading = false;
    }

    pub fn rename(&self) -> Option<&RenameEdit> {
        self.rename.as_ref()
    }

    pub fn begin_rename(&mut self, target: String) {
        self.rename = Some(RenameEdit {
            buffer: target.clone(),
            target,
        });
    }

    pub fn rename_input(&mut self, value: String) {
        if let Some(edit) = &mut self.rename {
            edit.buffer = value;
        }
    }

    pub fn cancel_rename(&mut self) {
        self.rename = None;
    }

    /// Closes the editor and returns `(old, new)` when the edit is worth a
    /// request. A blank or unchanged name is a silent cancel.
    pub fn take_rename_request(&mut self) -> Option<(String, String)> {
        let edit = self.rename.take()?;
        let new_name = edit.buffer.trim().to_string();
        if new_name.is_empty() || new_name == edit.target {
            return None;
        }
        Some((edit.target, new_name))
    }

    /// Returns false while another delete is already waiting on the
    /// confirmation dialog.
    pub fn begin_delete(&mut self, name: String) -> bool {
        if self.pending_delete.is_some() {
            return false;
        }
        self.pending_delete = Some(name);
        true
    }

    /// Resolves the dialog. Only a confirmed delete yields the name; a
    /// decline drops the request and the roster stays as it was.
    pub fn confirm_delete(&mut self, confirmed: bool) -> Option<String> {
        let name = self.pending_delete.take()?;
        confirmed.then_some(name)
    }
}

impl Default for RosterState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> RegisteredUser {
        RegisteredUser {
            name: name.to_string(),
            image_count: 1,
            updated_at: "2026-08-20T10:00:00".to_string(),
            thumbnail: None,
        }
    }

    #[test]
    fn test_declined_delete_leaves_the_roster_untouched() {
        let mut roster = RosterState::new();
        roster.set_users(vec![user("Alice"), user("Bob")]);

        assert!(roster.begin_delete("Alice".to_string()));
        assert_eq!(roster.confirm_delete(false), None);
        assert_eq!(roster.users.len(), 2);

        // The slot is free again afterwards.
        assert!(roster.begin_delete("Bob".to_string()));
        assert_eq!(roster.confirm_delete(true), Some("Bob".to_string()));
    }

    #[test]
    fn test_only_one_delete_can_wait_on_the_dialog() {
        let mut roster = RosterState::new();
        assert!(roster.begin_delete("Alice".to_string()));
        assert!(!roster.begin_delete("Bob".to_string()));
        assert_eq!(roster.confirm_delete(true), Some("Alice".to_string()));
    }

    #[test]
    fn test_confirm_without_request_is_a_no_op() {
        let mut roster = RosterState::new();
        assert_eq!(roster.confirm_delete(true), None);
    }

    #[test]
    fn test_rename_trims_and_skips_unchanged_names() {
        let mut roster = RosterState::new();

        roster.begin_rename("Alice".to_string());
        roster.rename_input("  Alicia  ".to_string());
        assert_eq!(
            roster.take_rename_request(),
            Some(("Alice".to_string(), "Alicia".to_string()))
        );
        assert!(roster.rename().is_none());

        roster.begin_rename("Alice".to_string());
        roster.rename_input("Alice".to_string());
        assert_eq!(roster.take_rename_request(), None);

        roster.begin_rename("Alice".to_string());
        roster.rename_input("   ".to_string());
        assert_eq!(roster.take_rename_request(), None);
    }

    #[test]
    fn test_load_failure_keeps_cached_users() {
        let mut roster = RosterState::new();
        roster.set_users(vec![user("Alice")]);
        roster.loading = true;
        roster.load_failed();
        assert!(!roster.loading);
        assert_eq!(roster.users.len(), 1);
    }
}
