use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::VariableType;
use crate::error::Result;
use crate::variable_pool::VariablePool;

/// Placeholder name of `Variable::NO_VARIABLE`. Pools refuse to bind it.
pub const NO_VARIABLE_NAME: &str = "__NOVAR__";

/// A handle on a variable minted by a `VariablePool`.
///
/// The pool owns the canonical record; a `Variable` only carries the id plus a
/// cached copy of the fields needed for display and ordering. Equality, hashing
/// and `Ord` all go through the id alone, so two handles with the same id are the
/// same variable even if they were obtained separately.
#[derive(Clone, Eq)]
pub struct Variable {
    id: u64,
    rank: u64,
    ty: VariableType,
    // None only for the sentinel
    name: Option<Arc<str>>,
}

impl Variable {
    /// The absence of a variable. Never equal to anything a pool hands out.
    pub const NO_VARIABLE: Variable = Variable {
        id: 0,
        rank: 0,
        ty: VariableType::Real,
        name: None,
    };

    pub(crate) fn new(id: u64, rank: u64, ty: VariableType, name: Arc<str>) -> Variable {
        debug_assert!(id != 0, "id 0 is reserved for NO_VARIABLE");
        Variable {
            id,
            rank,
            ty,
            name: Some(name),
        }
    }

    /// Mints an anonymous variable in the process-wide pool.
    pub fn fresh(ty: VariableType) -> Variable {
        VariablePool::global().create_fresh(ty)
    }

    /// Mints a new variable in the process-wide pool and binds `name` to it,
    /// replacing any previous binding.
    pub fn named(name: &str, ty: VariableType) -> Result<Variable> {
        VariablePool::global().create_fresh_named(name, ty)
    }

    /// Looks `name` up in the process-wide pool, minting it if needed.
    pub fn get_or_create(name: &str, ty: VariableType) -> Result<Variable> {
        VariablePool::global().get_or_create(name, ty)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn rank(&self) -> u64 {
        self.rank
    }

    pub fn var_type(&self) -> VariableType {
        self.ty
    }

    pub fn name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => NO_VARIABLE_NAME,
        }
    }

    pub fn is_no_variable(&self) -> bool {
        self.id == Self::NO_VARIABLE.id
    }

    /// Sort key for the rank order: rank first, id as the tiebreak.
    pub fn rank_key(&self) -> (u64, u64) {
        (self.rank, self.id)
    }

    /// Compares by rank, falling back to id. Unlike `Ord`, which follows
    /// creation order across the whole pool, this groups variables by their
    /// position within their own type.
    pub fn rank_cmp(&self, other: &Variable) -> Ordering {
        self.rank_key().cmp(&other.rank_key())
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_no_variable() {
            write!(f, "<NOVARIABLE>")
        } else {
            write!(f, "<Variable {} [id = {}]>", self.name(), self.id)
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use fnv::FnvHashSet;
    use itertools::Itertools;

    use super::*;

    fn var(id: u64, rank: u64, ty: VariableType, name: &str) -> Variable {
        Variable::new(id, rank, ty, Arc::from(name))
    }

    #[test]
    fn test_equality_follows_id() {
        let a = var(1, 0, VariableType::Real, "a");
        let a_again = var(1, 0, VariableType::Real, "a");
        let b = var(2, 1, VariableType::Real, "a");

        assert_eq!(a, a_again);
        assert_ne!(a, b);

        let set: FnvHashSet<Variable> = vec![a.clone(), a_again, b.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
        assert!(set.contains(&b));
    }

    #[test]
    fn test_no_variable() {
        let nv = Variable::NO_VARIABLE;
        assert!(nv.is_no_variable());
        assert_eq!(nv.name(), NO_VARIABLE_NAME);
        assert_eq!(format!("{:?}", nv), "<NOVARIABLE>");
        assert_ne!(nv, var(1, 0, VariableType::Bool, "x"));
    }

    #[test]
    fn test_formatting() {
        let x = var(7, 2, VariableType::Int, "x");
        assert_eq!(format!("{:?}", x), "<Variable x [id = 7]>");
        assert_eq!(x.to_string(), "x");
    }

    #[test]
    fn test_orders() {
        // Real vars minted first get low ids but the bool var has the lowest rank
        let p = var(1, 0, VariableType::Real, "p");
        let q = var(2, 1, VariableType::Real, "q");
        let b = var(3, 0, VariableType::Bool, "b");

        let by_id = vec![b.clone(), q.clone(), p.clone()].into_iter().sorted().collect_vec();
        assert_eq!(by_id, vec![p.clone(), q.clone(), b.clone()]);

        let by_rank = vec![q.clone(), b.clone(), p.clone()]
            .into_iter()
            .sorted_by(|l, r| l.rank_cmp(r))
            .collect_vec();
        assert_eq!(by_rank, vec![p, b, q]);
    }
}
