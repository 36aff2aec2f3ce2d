use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::{info, warn};

use crate::db::repositories::settings_repository::{AppSettingRow, SettingsRepository};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::company::{CompanyProfile, CompanyProfileUpdate, COMPLIANCE_LEVELS};
use crate::models::subdomain::find_subdomain;

const KEY_PREFIX: &str = "company.";
const KEY_NAME: &str = "company.name";
const KEY_LOCATION: &str = "company.location";
const KEY_SUBDOMAIN: &str = "company.subdomain";
const KEY_CAPACITY: &str = "company.capacity";
const KEY_EMPLOYEES: &str = "company.employees";
const KEY_YEARLY_OUTPUT: &str = "company.yearly_output";
const KEY_COMPLIANCE_LEVEL: &str = "company.compliance_level";

pub const DEFAULT_COMPANY_NAME: &str = "Your Company";
const DEFAULT_COMPLIANCE_LEVEL: &str = "basic";

/// A validated change for one settings key: `None` removes the key.
type PendingWrite = (&'static str, Option<String>);

pub struct SettingsService {
    db: DbPool,
    cache: RwLock<Option<CompanyProfile>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<CompanyProfile> {
        if let Ok(guard) = self.cache.read() {
            if let Some(profile) = guard.as_ref() {
                return Ok(profile.clone());
            }
        }

        let profile = self.load_profile_from_db()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(profile.clone());
        }
        Ok(profile)
    }

    pub fn company_name(&self) -> AppResult<String> {
        Ok(self.get()?.company_name)
    }

    pub fn update(&self, input: CompanyProfileUpdate) -> AppResult<CompanyProfile> {
        let mut current = self.get()?;
        let mut writes: Vec<PendingWrite> = Vec::new();

        if let Some(name) = input.company_name.as_ref() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(AppError::validation("company name cannot be empty"));
            }
            current.company_name = trimmed.to_string();
            writes.push((KEY_NAME, Some(current.company_name.clone())));
        }

        if let Some(location) = input.location.as_ref() {
            current.location = non_empty(location);
            writes.push((KEY_LOCATION, current.location.clone()));
        }

        if let Some(subdomain) = input.subdomain.as_ref() {
            current.subdomain = match non_empty(subdomain) {
                Some(name) => Some(canonical_subdomain(&name)?),
                None => None,
            };
            writes.push((KEY_SUBDOMAIN, current.subdomain.clone()));
        }

        if let Some(capacity) = input.capacity {
            ensure_non_negative("production capacity", capacity)?;
            current.capacity = Some(capacity);
            writes.push((KEY_CAPACITY, Some(capacity.to_string())));
        }

        if let Some(employees) = input.employees {
            if employees < 0 {
                return Err(AppError::validation("employees cannot be negative"));
            }
            current.employees = Some(employees);
            writes.push((KEY_EMPLOYEES, Some(employees.to_string())));
        }

        if let Some(output) = input.yearly_output {
            ensure_non_negative("yearly output", output)?;
            current.yearly_output = Some(output);
            writes.push((KEY_YEARLY_OUTPUT, Some(output.to_string())));
        }

        if let Some(level) = input.compliance_level.as_ref() {
            let normalized = level.trim().to_lowercase();
            if !COMPLIANCE_LEVELS.contains(&normalized.as_str()) {
                return Err(AppError::validation_with_details(
                    format!("unknown compliance level '{}'", level.trim()),
                    serde_json::json!({ "accepted": COMPLIANCE_LEVELS }),
                ));
            }
            current.compliance_level = normalized;
            writes.push((KEY_COMPLIANCE_LEVEL, Some(current.compliance_level.clone())));
        }

        self.db.with_transaction(|conn| {
            for (key, value) in &writes {
                match value {
                    Some(value) => SettingsRepository::upsert(conn, key, value)?,
                    None => SettingsRepository::delete(conn, key)?,
                }
            }
            Ok(())
        })?;

        current.updated_at = Utc::now().to_rfc3339();
        info!(target: "app::settings", changed = writes.len(), "company profile updated");

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(current.clone());
        }

        Ok(current)
    }

    fn load_profile_from_db(&self) -> AppResult<CompanyProfile> {
        self.db.with_connection(|conn| {
            let rows = SettingsRepository::list_with_prefix(conn, KEY_PREFIX)?;
            let mut latest_updated_at: Option<String> = None;
            let mut map: HashMap<String, AppSettingRow> = HashMap::new();

            for row in rows {
                latest_updated_at = match latest_updated_at {
                    Some(ref current) if current >= &row.updated_at => Some(current.clone()),
                    _ => Some(row.updated_at.clone()),
                };
                map.insert(row.key.clone(), row);
            }

            let text = |key: &str| map.get(key).and_then(|row| non_empty(&row.value));
            let number = |key: &str| {
                map.get(key).and_then(|row| match row.value.parse::<f64>() {
                    Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
                    _ => {
                        warn!(target: "app::settings", key, value = %row.value, "ignoring invalid stored number");
                        None
                    }
                })
            };

            let subdomain = text(KEY_SUBDOMAIN).filter(|name| {
                let known = find_subdomain(name).is_some();
                if !known {
                    warn!(target: "app::settings", subdomain = %name, "ignoring unknown stored subdomain");
                }
                known
            });

            let compliance_level = text(KEY_COMPLIANCE_LEVEL)
                .map(|value| value.to_lowercase())
                .filter(|value| COMPLIANCE_LEVELS.contains(&value.as_str()))
                .unwrap_or_else(|| DEFAULT_COMPLIANCE_LEVEL.to_string());

            Ok(CompanyProfile {
                company_name: text(KEY_NAME).unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
                location: text(KEY_LOCATION),
                subdomain,
                capacity: number(KEY_CAPACITY),
                employees: map
                    .get(KEY_EMPLOYEES)
                    .and_then(|row| row.value.parse::<i64>().ok())
                    .filter(|value| *value >= 0),
                yearly_output: number(KEY_YEARLY_OUTPUT),
                compliance_level,
                updated_at: latest_updated_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
            })
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn canonical_subdomain(name: &str) -> AppResult<String> {
    find_subdomain(name)
        .map(|subdomain| subdomain.name.to_string())
        .ok_or_else(|| AppError::validation(format!("unknown factory subdomain '{}'", name)))
}

fn ensure_non_negative(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}
