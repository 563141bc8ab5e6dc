use std::sync::Arc;
use std::thread;

use serde_json::{json, Map, Value};

use weldops::analytics::SeededRng;
use weldops::{Job, JobRegistry, WeldError};

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("payload must be an object")
}

fn active_ids(registry: &JobRegistry) -> Vec<String> {
    registry
        .list()
        .expect("list")
        .iter()
        .filter(|j| j.is_active())
        .map(|j| j.id().expect("id").to_string())
        .collect()
}

fn seeded_registry() -> JobRegistry {
    weldops::config::default_config()
        .registry()
        .expect("default seed is valid")
}

#[test]
fn test_activate_then_deactivate_scenario() {
    let registry = seeded_registry();

    let a = registry
        .create(obj(json!({"title": "T1", "mode": "MIG", "current": "100A"})))
        .expect("create");
    let a_id = a.id().expect("id").to_string();
    assert!(!a.is_active());
    assert_eq!(active_ids(&registry), vec!["job_001"]);

    let a = registry
        .update(&a_id, obj(json!({"isActive": true})))
        .expect("activate");
    assert!(a.is_active());
    assert_eq!(active_ids(&registry), vec![a_id.clone()]);

    let before: Vec<Job> = registry
        .list()
        .expect("list")
        .into_iter()
        .filter(|j| j.id() != Some(a_id.as_str()))
        .collect();
    registry
        .update(&a_id, obj(json!({"isActive": false})))
        .expect("deactivate");
    let after: Vec<Job> = registry
        .list()
        .expect("list")
        .into_iter()
        .filter(|j| j.id() != Some(a_id.as_str()))
        .collect();

    assert!(active_ids(&registry).is_empty());
    assert_eq!(before, after, "deactivation must not touch other jobs");
}

#[test]
fn test_at_most_one_active_over_random_operations() {
    let registry = seeded_registry();
    let mut rng = SeededRng::new(7);

    for step in 0..500 {
        let jobs = registry.list().expect("list");
        let roll = rng.next_f64();
        let pick = |r: f64| -> Option<String> {
            if jobs.is_empty() {
                None
            } else {
                let idx = ((r * jobs.len() as f64) as usize).min(jobs.len() - 1);
                jobs[idx].id().map(str::to_string)
            }
        };
        let target = pick(rng.next_f64());

        match (roll, target) {
            (r, _) if r < 0.25 => {
                registry
                    .create(obj(json!({"title": format!("job {step}"), "mode": "TIG", "current": 110})))
                    .expect("create");
            }
            (r, Some(id)) if r < 0.55 => {
                registry
                    .update(&id, obj(json!({"isActive": true})))
                    .expect("activate");
            }
            (r, Some(id)) if r < 0.7 => {
                registry
                    .update(&id, obj(json!({"isActive": false})))
                    .expect("deactivate");
            }
            (r, Some(id)) if r < 0.85 => {
                registry
                    .update(&id, obj(json!({"title": "renamed", "isActive": rng.next_f64() < 0.5})))
                    .expect("full update");
            }
            (r, Some(id)) if r < 0.9 => {
                registry.delete(&id).expect("delete");
            }
            _ => {}
        }

        assert!(
            active_ids(&registry).len() <= 1,
            "more than one active job after step {step}"
        );
    }
}

#[test]
fn test_concurrent_activation_keeps_single_active() {
    let registry = Arc::new(JobRegistry::new());
    let ids: Vec<String> = (0..8)
        .map(|i| {
            registry
                .create(obj(json!({"title": format!("T{i}"), "mode": "MIG", "current": "100A"})))
                .expect("create")
                .id()
                .expect("id")
                .to_string()
        })
        .collect();

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..50 {
                    registry
                        .update(&id, obj(json!({"isActive": true})))
                        .expect("activate");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert_eq!(active_ids(&registry).len(), 1);
}

#[test]
fn test_full_update_preserves_unmentioned_fields() {
    let registry = seeded_registry();
    let before = registry.get("job_002").expect("get");

    let after = registry
        .update("job_002", obj(json!({"title": "X"})))
        .expect("update");

    assert_eq!(after.title(), Some("X"));
    for (key, value) in before.raw() {
        if key != "title" {
            assert_eq!(after.get(key), Some(value), "field {key} changed");
        }
    }
    assert_eq!(after.field_count(), before.field_count());
}

#[test]
fn test_error_kinds() {
    let registry = seeded_registry();

    assert!(matches!(
        registry.create(obj(json!({"title": "only title"}))),
        Err(WeldError::Validation(_))
    ));
    assert!(matches!(
        registry.update("missing", obj(json!({"title": "X"}))),
        Err(WeldError::NotFound(_))
    ));
    assert!(matches!(
        registry.update("job_001", obj(json!({"mode": "TIG"}))),
        Err(WeldError::Validation(_))
    ));
    assert!(matches!(
        registry.delete("missing"),
        Err(WeldError::NotFound(_))
    ));
    assert_eq!(registry.len().expect("len"), 2);
}
