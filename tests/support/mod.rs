#![allow(dead_code)]

use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
    sync::Mutex,
};

use finclusion::RawInput;
use finclusion::app_dirs::CONFIG_HOME_ENV;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `body` with the app root redirected to `home`, restoring the variable afterwards.
pub fn with_config_home<T>(home: &Path, body: impl FnOnce() -> T) -> T {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
    let previous = std::env::var_os(CONFIG_HOME_ENV);
    // SAFETY: every env mutation in this test binary holds ENV_LOCK.
    unsafe { std::env::set_var(CONFIG_HOME_ENV, home) };
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(body));
    // SAFETY: as above.
    unsafe {
        match previous {
            Some(value) => std::env::set_var(CONFIG_HOME_ENV, value),
            None => std::env::remove_var(CONFIG_HOME_ENV),
        }
    }
    result.unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Ensemble that votes for account ownership on urban residence, phone access and schooling.
pub const ACCOUNT_MODEL: &str = r#"{
    "kind": "gbdt",
    "model_version": 1,
    "feature_len": 11,
    "base_score": -1.0,
    "threshold": 0.5,
    "trees": [
        {"nodes": [
            {"split": {"feature": 5, "threshold": 0.5, "left": 1, "right": 2}},
            {"leaf": -0.5},
            {"leaf": 0.6}
        ]},
        {"nodes": [
            {"split": {"feature": 6, "threshold": 0.5, "left": 1, "right": 2}},
            {"leaf": -0.8},
            {"leaf": 0.5}
        ]},
        {"nodes": [
            {"split": {"feature": 3, "threshold": 2.5, "left": 1, "right": 2}},
            {"leaf": -0.4},
            {"split": {"feature": 10, "threshold": 8.5, "left": 3, "right": 4}},
            {"leaf": 0.7},
            {"leaf": -0.2}
        ]}
    ]
}"#;

pub fn write_model(dir: &Path) -> PathBuf {
    let path = dir.join("model_final.json");
    std::fs::write(&path, ACCOUNT_MODEL).expect("write model fixture");
    path
}

pub fn reference_person() -> RawInput {
    RawInput {
        year: 2018,
        household_size: NonZeroU32::new(3).expect("non-zero"),
        age: 34,
        education: "Secondary education".into(),
        country: "Kenya".into(),
        location: "Urban".into(),
        cellphone: "Yes".into(),
        gender: "Female".into(),
        relationship: "Head of Household".into(),
        marital: "Single/Never Married".into(),
        job: "Informally employed".into(),
    }
}
