use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fnv::FnvHashMap;
use itertools::Itertools;
use lazy_static::lazy_static;
use log::{debug, info, trace};
use prometheus::Registry;

use crate::error::{Result, VariableError};
use crate::metrics::PoolMetrics;
use crate::variable::{Variable, VariableType, NO_VARIABLE_NAME};

lazy_static! {
    // Shared by every pool, so ids are unique across the process. 0 is NO_VARIABLE.
    static ref NEXT_ID: AtomicU64 = AtomicU64::new(1);
    static ref GLOBAL_POOL: VariablePool = VariablePool::from_config(PoolConfig {
        name: "global".to_string(),
        ..PoolConfig::default()
    });
}

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Value of the `pool` label on this pool's metrics.
    pub name: String,
    /// Anonymous variables are named `<anonymous_prefix><id>`.
    pub anonymous_prefix: String,
    pub initial_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            name: "default".to_string(),
            anonymous_prefix: "x_".to_string(),
            initial_capacity: 0,
        }
    }
}

#[derive(Debug)]
struct PoolState {
    names: FnvHashMap<Arc<str>, Variable>,
    // Never reset by clear
    next_rank: [u64; 3],
    generation: u64,
}

impl PoolState {
    fn allocate(&mut self, ty: VariableType) -> (u64, u64) {
        let id = next_id();
        let slot = &mut self.next_rank[ty.index()];
        let rank = *slot;
        *slot += 1;
        (id, rank)
    }
}

/// Registry of variables, interned by name.
///
/// Every minted variable gets an id that is never handed out again in this
/// process, by this pool or any other, even after `clear`. Named variables are bound in a name table; within
/// one generation (the span between two clears) a name resolves to at most one
/// variable. All operations take a single lock, so `get_or_create` is atomic per
/// name and a `clear` is never observed half-done.
pub struct VariablePool {
    state: Mutex<PoolState>,
    config: PoolConfig,
    metrics: PoolMetrics,
}

impl VariablePool {
    pub fn new() -> VariablePool {
        Self::from_config(PoolConfig::default())
    }

    /// Builds a pool from `config`. Fails if the pool name is not usable as a
    /// metric label value.
    pub fn with_config(config: PoolConfig) -> prometheus::Result<VariablePool> {
        let metrics = PoolMetrics::new(&config.name)?;
        let names = FnvHashMap::with_capacity_and_hasher(config.initial_capacity, Default::default());
        Ok(VariablePool {
            state: Mutex::new(PoolState {
                names,
                next_rank: [0; 3],
                generation: 0,
            }),
            config,
            metrics,
        })
    }

    // Only for built-in configs, whose metric descriptors are constants
    fn from_config(config: PoolConfig) -> VariablePool {
        Self::with_config(config).expect("built-in pool config has valid metric descriptors")
    }

    /// The process-wide pool, created on first use.
    pub fn global() -> &'static VariablePool {
        &GLOBAL_POOL
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Exposes this pool's counters through `registry`.
    pub fn register_metrics(&self, registry: &Registry) -> prometheus::Result<()> {
        self.metrics.register(registry)
    }

    /// Returns the variable bound to `name`, or `Variable::NO_VARIABLE`.
    pub fn find_by_name(&self, name: &str) -> Variable {
        let found = self.state().names.get(name).cloned();
        self.metrics.record_lookup(found.is_some());
        found.unwrap_or(Variable::NO_VARIABLE)
    }

    /// Returns the variable bound to `name`, minting and binding a new one of
    /// type `ty` if there is none.
    ///
    /// On a hit `ty` is ignored: asking for an existing name with a different
    /// type yields the variable with its original type.
    pub fn get_or_create(&self, name: &str, ty: VariableType) -> Result<Variable> {
        validate_name(name)?;

        let mut state = self.state();
        if let Some(existing) = state.names.get(name) {
            if existing.var_type() != ty {
                debug!(
                    "{:?} requested as {} but already bound as {}",
                    existing,
                    ty,
                    existing.var_type()
                );
            }
            trace!("hit: {:?}", existing);
            self.metrics.record_lookup(true);
            return Ok(existing.clone());
        }
        self.metrics.record_lookup(false);

        let var = self.bind(&mut state, name, ty);
        Ok(var)
    }

    /// Mints an anonymous variable. It is not bound to any name, so
    /// `find_by_name` never returns it.
    ///
    /// Its generated name is an ordinary name: restoring the variable's state
    /// binds that name to a new variable, and a user may bind it too.
    pub fn create_fresh(&self, ty: VariableType) -> Variable {
        let mut state = self.state();
        let (id, rank) = state.allocate(ty);
        let name: Arc<str> = Arc::from(format!("{}{}", self.config.anonymous_prefix, id));
        let var = Variable::new(id, rank, ty, name);
        self.metrics.record_created(ty);
        trace!("minted anonymous: {:?}", var);
        var
    }

    /// Mints a new variable and binds `name` to it. An existing binding for
    /// `name` is replaced; the earlier variable keeps its id but can no longer
    /// be found by name.
    pub fn create_fresh_named(&self, name: &str, ty: VariableType) -> Result<Variable> {
        validate_name(name)?;

        let mut state = self.state();
        let var = self.bind(&mut state, name, ty);
        Ok(var)
    }

    /// Drops every name binding. Id and rank counters keep running, so
    /// variables minted afterwards never reuse an earlier id.
    pub fn clear(&self) {
        let mut state = self.state();
        let dropped = state.names.len();
        state.names.clear();
        state.generation += 1;
        self.metrics.record_clear();
        self.metrics.set_named(0);
        info!(
            "cleared variable pool: {} names dropped, generation {}",
            dropped, state.generation
        );
    }

    /// Number of names currently bound.
    pub fn len(&self) -> usize {
        self.state().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the pool has been cleared.
    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    /// Snapshot of the bound variables, in id order.
    pub fn variables(&self) -> Vec<Variable> {
        self.state().names.values().cloned().sorted().collect()
    }

    fn bind(&self, state: &mut PoolState, name: &str, ty: VariableType) -> Variable {
        let (id, rank) = state.allocate(ty);
        let key: Arc<str> = Arc::from(name);
        let var = Variable::new(id, rank, ty, key.clone());
        if let Some(previous) = state.names.insert(key, var.clone()) {
            trace!("rebound {}: {:?} -> {:?}", name, previous, var);
        } else {
            trace!("minted: {:?}", var);
        }
        self.metrics.record_created(ty);
        self.metrics.set_named(state.names.len());
        var
    }

    // Critical sections never leave the state half-written, so a poisoned lock is still usable.
    fn state(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for VariablePool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VariablePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        write!(
            f,
            "VariablePool {{ name={}, named={}, generation={} }}",
            self.config.name,
            state.names.len(),
            state.generation
        )
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VariableError::EmptyName);
    }
    if name == NO_VARIABLE_NAME {
        return Err(VariableError::ReservedName(name.to_string()));
    }
    Ok(())
}

/// Looks `name` up in the process-wide pool.
pub fn variable_with_name(name: &str) -> Variable {
    VariablePool::global().find_by_name(name)
}

/// Clears the process-wide pool.
pub fn clear_variable_pool() {
    VariablePool::global().clear()
}
