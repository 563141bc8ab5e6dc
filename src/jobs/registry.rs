use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::types::{has_value, Job, ID, IS_ACTIVE, REQUIRED_FIELDS, TITLE};
use crate::error::WeldError;

/// In-memory registry of weld jobs.
///
/// Holds jobs in insertion order behind a single lock. Every operation takes
/// the lock once and keeps it for its whole read/mutate sequence, so the
/// activation scan in `update` cannot interleave with a create or delete.
///
/// Invariant: at most one job has `isActive = true`.
pub struct JobRegistry {
    jobs: Mutex<Vec<Job>>,
}

/// How an update payload is applied, decided by its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateKind {
    /// Payload has a non-null `title`: merge it over the record.
    Full { is_active: Option<bool> },
    /// Payload has only a boolean `isActive`.
    Status(bool),
}

impl JobRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
        }
    }

    /// Registry pre-loaded with seed records (typically from configuration).
    ///
    /// Records without an `id` get a fresh one. Duplicate ids are rejected.
    /// If more than one seed record is active, the first one stays active and
    /// the rest are switched off.
    pub fn from_seed(seed: Vec<Job>) -> Result<Self, WeldError> {
        let mut jobs = Vec::with_capacity(seed.len());
        let mut seen = HashSet::new();
        let mut active_seen = false;

        for mut job in seed {
            let id = match job.id() {
                Some(id) if !id.trim().is_empty() => id.to_string(),
                _ => {
                    let id = generate_job_id();
                    job.set_id(id.clone());
                    id
                }
            };
            if !seen.insert(id.clone()) {
                return Err(WeldError::Config(format!("duplicate seed job id '{}'", id)));
            }

            if job.is_active() {
                if active_seen {
                    warn!("Seed job {} is also marked active, deactivating it", id);
                    job.set_active(false);
                }
                active_seen = true;
            } else {
                job.set_active(false);
            }
            jobs.push(job);
        }

        info!("Job registry seeded with {} jobs", jobs.len());
        Ok(Self {
            jobs: Mutex::new(jobs),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Job>>, WeldError> {
        self.jobs
            .lock()
            .map_err(|_| WeldError::Internal("job registry lock poisoned".to_string()))
    }

    /// Snapshot of all jobs in insertion order.
    pub fn list(&self) -> Result<Vec<Job>, WeldError> {
        Ok(self.lock()?.clone())
    }

    pub fn get(&self, id: &str) -> Result<Job, WeldError> {
        let jobs = self.lock()?;
        jobs.iter()
            .find(|job| job.id() == Some(id))
            .cloned()
            .ok_or_else(|| WeldError::NotFound(id.to_string()))
    }

    /// The active job, if any.
    pub fn active(&self) -> Result<Option<Job>, WeldError> {
        Ok(self.lock()?.iter().find(|job| job.is_active()).cloned())
    }

    /// Create a job from a request payload.
    ///
    /// `title`, `mode` and `current` are required. Any `id` or `isActive` in
    /// the payload is ignored: the job gets a fresh id and starts inactive.
    pub fn create(&self, payload: Map<String, Value>) -> Result<Job, WeldError> {
        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !has_value(payload.get(*field)))
            .collect();
        if !missing.is_empty() {
            return Err(WeldError::Validation(format!(
                "{} required",
                missing.join(", ")
            )));
        }

        let mut jobs = self.lock()?;

        let mut id = generate_job_id();
        while jobs.iter().any(|job| job.id() == Some(id.as_str())) {
            id = generate_job_id();
        }

        let mut data = Map::with_capacity(payload.len() + 2);
        data.insert(ID.to_string(), Value::String(id.clone()));
        for (key, value) in payload {
            if key == ID || key == IS_ACTIVE {
                continue;
            }
            data.insert(key, value);
        }
        data.insert(IS_ACTIVE.to_string(), Value::Bool(false));

        let job = Job::from_map(data);
        jobs.push(job.clone());
        info!("Created job {} ({} fields)", id, job.field_count());
        Ok(job)
    }

    /// Update a job.
    ///
    /// A payload with a non-null `title` is merged over the stored record; a
    /// payload with only a boolean `isActive` changes activation. Either way,
    /// activation goes through [`set_status`], so switching a job on switches
    /// every other job off.
    pub fn update(&self, id: &str, payload: Map<String, Value>) -> Result<Job, WeldError> {
        let mut jobs = self.lock()?;
        let idx = position(&jobs, id)?;

        match classify(&payload)? {
            UpdateKind::Full { is_active } => {
                jobs[idx].merge(&payload);
                if let Some(active) = is_active {
                    set_status(&mut jobs, idx, active);
                }
                info!("Full update of job {}", id);
            }
            UpdateKind::Status(active) => {
                set_status(&mut jobs, idx, active);
                info!("Status update of job {}: isActive={}", id, active);
            }
        }

        Ok(jobs[idx].clone())
    }

    /// Remove a job. Returns the removed job and a snapshot of the jobs left,
    /// both taken under the same lock. Removing the active job leaves none
    /// active.
    pub fn delete(&self, id: &str) -> Result<(Job, Vec<Job>), WeldError> {
        let mut jobs = self.lock()?;
        let idx = position(&jobs, id)?;
        let removed = jobs.remove(idx);
        info!("Deleted job {} ({} remaining)", id, jobs.len());
        Ok((removed, jobs.clone()))
    }

    pub fn len(&self) -> Result<usize, WeldError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, WeldError> {
        Ok(self.lock()?.is_empty())
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn position(jobs: &[Job], id: &str) -> Result<usize, WeldError> {
    jobs.iter()
        .position(|job| job.id() == Some(id))
        .ok_or_else(|| WeldError::NotFound(id.to_string()))
}

fn classify(payload: &Map<String, Value>) -> Result<UpdateKind, WeldError> {
    let is_active = payload.get(IS_ACTIVE);

    if matches!(payload.get(TITLE), Some(v) if !v.is_null()) {
        let is_active = match is_active {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                return Err(WeldError::Validation(format!(
                    "isActive must be a boolean, got {}",
                    other
                )))
            }
        };
        return Ok(UpdateKind::Full { is_active });
    }

    match is_active {
        Some(Value::Bool(b)) => Ok(UpdateKind::Status(*b)),
        _ => Err(WeldError::Validation(
            "payload must supply either `title` or boolean `isActive`".to_string(),
        )),
    }
}

/// Switch job `idx` on or off. Switching on deactivates every other job;
/// switching off touches only the target.
fn set_status(jobs: &mut [Job], idx: usize, active: bool) {
    if active {
        for (i, job) in jobs.iter_mut().enumerate() {
            if i != idx && job.is_active() {
                debug!("Deactivating job {:?}", job.id());
                job.set_active(false);
            }
        }
    }
    jobs[idx].set_active(active);
}

/// Generate a job id: "job_" + base36 millisecond timestamp + 6 random hex chars.
///
/// The timestamp alone is not unique within a millisecond, the suffix makes
/// collisions negligible and `create` re-rolls on the rare clash.
pub fn generate_job_id() -> String {
    let bytes: [u8; 3] = rand::random();
    let suffix: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    format!("job_{}{}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
