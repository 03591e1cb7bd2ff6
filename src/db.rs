use crate::components::working_hours::DoctorSchedule;
use crate::error::{store_error, AppResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::info;

/// Storage for doctors' working hours
#[async_trait]
pub trait ScheduleDb: Send + Sync + 'static {
    /// Get the schedule of a doctor
    async fn get_schedule(&self, doctor: &str) -> AppResult<Option<DoctorSchedule>>;

    /// Store the schedule of a doctor
    async fn set_schedule(&self, doctor: &str, schedule: &DoctorSchedule) -> AppResult<()>;

    /// List all doctors with a stored schedule
    async fn list_doctors(&self) -> AppResult<Vec<String>>;

    /// Delete the schedule of a doctor
    async fn delete_schedule(&self, doctor: &str) -> AppResult<()>;
}

/// In-memory implementation of the store (for testing and dry runs)
#[derive(Debug, Default)]
pub struct InMemoryDb {
    schedules: RwLock<HashMap<String, DoctorSchedule>>,
}

#[async_trait]
impl ScheduleDb for InMemoryDb {
    async fn get_schedule(&self, doctor: &str) -> AppResult<Option<DoctorSchedule>> {
        let schedules = self.schedules.read().await;
        Ok(schedules.get(doctor).cloned())
    }

    async fn set_schedule(&self, doctor: &str, schedule: &DoctorSchedule) -> AppResult<()> {
        let mut schedules = self.schedules.write().await;
        schedules.insert(doctor.to_string(), schedule.clone());
        Ok(())
    }

    async fn list_doctors(&self) -> AppResult<Vec<String>> {
        let schedules = self.schedules.read().await;
        let mut doctors: Vec<String> = schedules.keys().cloned().collect();
        doctors.sort();
        Ok(doctors)
    }

    async fn delete_schedule(&self, doctor: &str) -> AppResult<()> {
        let mut schedules = self.schedules.write().await;
        schedules.remove(doctor);
        Ok(())
    }
}

/// One pretty-printed JSON file per doctor in a data directory
#[derive(Debug, Clone)]
pub struct JsonFileDb {
    data_dir: PathBuf,
}

impl JsonFileDb {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File that holds a doctor's schedule
    pub fn path_for(&self, doctor: &str) -> AppResult<PathBuf> {
        let stem = slug(doctor);
        if stem.is_empty() {
            return Err(store_error(&format!(
                "Doctor name {:?} has no usable characters",
                doctor
            )));
        }
        Ok(self.data_dir.join(format!("{stem}.json")))
    }
}

#[async_trait]
impl ScheduleDb for JsonFileDb {
    async fn get_schedule(&self, doctor: &str) -> AppResult<Option<DoctorSchedule>> {
        let path = self.path_for(doctor)?;

        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let schedule: DoctorSchedule = serde_json::from_str(&data).map_err(|e| {
            store_error(&format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(Some(schedule))
    }

    async fn set_schedule(&self, doctor: &str, schedule: &DoctorSchedule) -> AppResult<()> {
        let path = self.path_for(doctor)?;
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let data = serde_json::to_string_pretty(schedule)?;

        // Write next to the target and rename so readers never see half a file
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        info!(
            "Saved {} working intervals for {} to {}",
            schedule.working_hours.len(),
            doctor,
            path.display()
        );
        Ok(())
    }

    async fn list_doctors(&self) -> AppResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut doctors = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let data = tokio::fs::read_to_string(&path).await?;
            match serde_json::from_str::<DoctorSchedule>(&data) {
                Ok(schedule) => doctors.push(schedule.doctor),
                Err(e) => {
                    tracing::warn!("Skipping unreadable schedule {}: {}", path.display(), e);
                }
            }
        }

        doctors.sort();
        Ok(doctors)
    }

    async fn delete_schedule(&self, doctor: &str) -> AppResult<()> {
        let path = self.path_for(doctor)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted schedule file {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lowercase, filesystem-safe file stem for a doctor's name
fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Dr. Anna Virtanen"), "dr-anna-virtanen");
        assert_eq!(slug("  Hämäläinen  "), "hämäläinen");
        assert_eq!(slug("../etc/passwd"), "etc-passwd");
        assert_eq!(slug("!!!"), "");
    }

    #[test]
    fn test_path_for_rejects_empty_names() {
        let db = JsonFileDb::new("/tmp/practice-hours");
        assert!(db.path_for("???").is_err());
        assert_eq!(
            db.path_for("Dr Who").unwrap(),
            PathBuf::from("/tmp/practice-hours/dr-who.json")
        );
    }

    #[tokio::test]
    async fn test_in_memory_db() {
        let db = InMemoryDb::default();
        assert!(db.get_schedule("Dr Who").await.unwrap().is_none());

        let schedule = DoctorSchedule::new("Dr Who");
        db.set_schedule("Dr Who", &schedule).await.unwrap();
        assert_eq!(db.get_schedule("Dr Who").await.unwrap(), Some(schedule));
        assert_eq!(db.list_doctors().await.unwrap(), vec!["Dr Who".to_string()]);

        db.delete_schedule("Dr Who").await.unwrap();
        assert!(db.list_doctors().await.unwrap().is_empty());
    }
}
