use std::{
    env,
    sync::{Mutex, MutexGuard, PoisonError},
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Environment variables set for a single test. Holds a process-wide lock, so tests using it
/// don't observe each other's variables; the variables are removed on drop.
#[must_use = "variables are removed when the guard is dropped"]
pub(crate) struct TestEnv {
    names: Vec<&'static str>,
    _lock: MutexGuard<'static, ()>,
}

impl TestEnv {
    pub fn set(vars: &[(&'static str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        for (name, value) in vars {
            env::set_var(name, value);
        }
        Self {
            names: vars.iter().map(|(name, _)| *name).collect(),
            _lock: lock,
        }
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        for name in &self.names {
            env::remove_var(name);
        }
    }
}
