use crate::api::models::SystemStatus;
use chrono::{Local, NaiveDateTime};

/// `dd/mm/yyyy, HH:MM`, the short Brazilian form the clinic staff read.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y, %H:%M").to_string()
}

pub fn now_formatted() -> String {
    format_timestamp(Local::now().naive_local())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceStatus {
    pub is_active: bool,
    pub last_activated: String,
    pub last_deactivated: String,
}

impl ServiceStatus {
    /// First view of the backend state: only the current side gets a timestamp.
    pub fn from_remote(remote: SystemStatus, now: &str) -> Self {
        Self {
            is_active: remote.active,
            last_activated: if remote.active { now.to_string() } else { String::new() },
            last_deactivated: if remote.active { String::new() } else { now.to_string() },
        }
    }

    /// Refreshes the timestamp for the side being switched to and leaves the
    /// other one alone.
    pub fn apply_toggle(&mut self, active: bool, now: &str) {
        self.is_active = active;
        if active {
            self.last_activated = now.to_string();
        } else {
            self.last_deactivated = now.to_string();
        }
    }

    /// "Ativado em: …" or "Desativado em: …".
    pub fn caption(&self) -> String {
        if self.is_active {
            format!("Ativado em: {}", self.last_activated)
        } else {
            format!("Desativado em: {}", self.last_deactivated)
        }
    }
}
