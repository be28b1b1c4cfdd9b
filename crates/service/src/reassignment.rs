//! Moves dependent rows off an entity that is about to be deleted.
//!
//! A [`Reassignment`] names one dependent set (a foreign key column on some
//! entity) and the condition that picks replacement targets. Dependents are
//! spread over the targets round-robin: row `i`, in id order, goes to
//! candidate `i % candidates.len()`. Candidate order is shuffled so repeated
//! deletes do not always load the same target first.
//!
//! Nothing here opens or closes a transaction. Callers run every
//! reassignment of one delete, plus the delete itself, on a single
//! [`DatabaseTransaction`] and finish it with [`settle`].

use rand::seq::SliceRandom;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Most dependent ids bound into one `UPDATE ... WHERE id IN (..)`.
/// Postgres caps a statement at 65535 bind parameters.
pub const UPDATE_CHUNK: usize = 1_000;

/// Result of a delete that went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub id: Uuid,
    /// Rows whose foreign key was rewritten before the delete.
    pub reassigned: u64,
}

/// Dependent ids grouped by the target they move to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    moves: Vec<(Uuid, Vec<Uuid>)>,
}

impl Plan {
    /// `(target, dependents)` pairs; targets that receive nothing are omitted.
    pub fn moves(&self) -> &[(Uuid, Vec<Uuid>)] {
        &self.moves
    }

    /// Number of dependents covered.
    pub fn len(&self) -> usize {
        self.moves.iter().map(|(_, rows)| rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn target_of(&self, dependent: Uuid) -> Option<Uuid> {
        self.moves
            .iter()
            .find(|(_, rows)| rows.contains(&dependent))
            .map(|(target, _)| *target)
    }
}

/// Distribute `dependents` over `candidates`, dependent `i` going to
/// candidate `i % candidates.len()`.
///
/// Returns `None` when there is something to move but nowhere to move it.
pub fn round_robin(dependents: &[Uuid], candidates: &[Uuid]) -> Option<Plan> {
    if dependents.is_empty() {
        return Some(Plan::default());
    }
    if candidates.is_empty() {
        return None;
    }
    let mut buckets: Vec<Vec<Uuid>> = vec![Vec::new(); candidates.len()];
    for (i, id) in dependents.iter().enumerate() {
        buckets[i % candidates.len()].push(*id);
    }
    let moves = candidates
        .iter()
        .copied()
        .zip(buckets)
        .filter(|(_, rows)| !rows.is_empty())
        .collect();
    Some(Plan { moves })
}

/// One dependent set of an entity being deleted.
///
/// `D` owns the foreign key, `T` is the entity the key points at (and the
/// source of replacement targets).
pub struct Reassignment<D: EntityTrait, T: EntityTrait> {
    /// Kind of the entity being deleted, for errors.
    pub entity: &'static str,
    /// Label of the dependent set, e.g. `packages.courier_id`.
    pub dependents: &'static str,
    pub dependent_id: D::Column,
    /// Column rewritten on each dependent; rows match while it equals the deleted id.
    pub foreign_key: D::Column,
    pub target_id: T::Column,
    /// Which `T` rows may take over. The deleted row itself is always excluded.
    pub candidates: Condition,
}

impl<D: EntityTrait, T: EntityTrait> Reassignment<D, T> {
    /// Rewrite every dependent of `from` and return how many rows moved.
    ///
    /// Fails with [`ServiceError::NoReplacementAvailable`] before touching
    /// anything when dependents exist and the candidate pool is empty.
    #[instrument(skip(self, conn), fields(entity = self.entity, dependents = self.dependents))]
    pub async fn run<C: ConnectionTrait>(&self, conn: &C, from: Uuid) -> Result<u64, ServiceError> {
        let rows: Vec<Uuid> = D::find()
            .select_only()
            .column(self.dependent_id)
            .filter(self.foreign_key.eq(from))
            .order_by_asc(self.dependent_id)
            .into_tuple()
            .all(conn)
            .await?;
        if rows.is_empty() {
            return Ok(0);
        }

        let mut pool: Vec<Uuid> = T::find()
            .select_only()
            .column(self.target_id)
            .filter(self.candidates.clone())
            .filter(self.target_id.ne(from))
            .order_by_asc(self.target_id)
            .into_tuple()
            .all(conn)
            .await?;
        pool.shuffle(&mut rand::thread_rng());

        let plan = round_robin(&rows, &pool).ok_or(ServiceError::NoReplacementAvailable {
            entity: self.entity,
            id: from,
            dependents: self.dependents,
        })?;

        let mut moved = 0;
        for (target, ids) in plan.moves() {
            for chunk in ids.chunks(UPDATE_CHUNK) {
                let res = D::update_many()
                    .col_expr(self.foreign_key, Expr::value(*target))
                    .filter(self.dependent_id.is_in(chunk.iter().copied()))
                    .exec(conn)
                    .await?;
                moved += res.rows_affected;
            }
        }
        debug!(%from, moved, candidates = pool.len(), "reassigned");
        Ok(moved)
    }
}

/// Commit on success, roll back on failure. A rollback error is logged and
/// the failure itself is returned.
pub async fn settle<T>(txn: DatabaseTransaction, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rb) = txn.rollback().await {
                warn!(error = %rb, "rollback_failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn nothing_to_move_is_an_empty_plan() {
        let plan = round_robin(&[], &[]).expect("empty dependents never fail");
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn dependents_without_candidates_fail() {
        assert!(round_robin(&ids(3), &[]).is_none());
    }

    #[test]
    fn single_candidate_takes_everything() {
        let deps = ids(3);
        let only = Uuid::new_v4();
        let plan = round_robin(&deps, &[only]).unwrap();
        assert_eq!(plan.moves().len(), 1);
        assert_eq!(plan.len(), 3);
        for d in &deps {
            assert_eq!(plan.target_of(*d), Some(only));
        }
    }

    #[test]
    fn dependent_i_goes_to_candidate_i_mod_m() {
        let deps = ids(7);
        let cands = ids(3);
        let plan = round_robin(&deps, &cands).unwrap();
        for (i, d) in deps.iter().enumerate() {
            assert_eq!(plan.target_of(*d), Some(cands[i % cands.len()]));
        }
    }

    #[test]
    fn load_is_balanced_within_one() {
        for (n, m) in [(1, 1), (5, 2), (10, 3), (2, 5), (100, 7)] {
            let plan = round_robin(&ids(n), &ids(m)).unwrap();
            assert_eq!(plan.len(), n);
            let floor = n / m;
            let ceil = n.div_ceil(m);
            let sizes: Vec<usize> = plan.moves().iter().map(|(_, rows)| rows.len()).collect();
            for s in &sizes {
                assert!(*s >= floor.max(1) && *s <= ceil, "n={n} m={m} sizes={sizes:?}");
            }
            // Candidates left out received floor(n/m) == 0 rows.
            if sizes.len() < m {
                assert_eq!(floor, 0);
            }
        }
    }

    #[test]
    fn more_candidates_than_dependents_skips_idle_targets() {
        let plan = round_robin(&ids(2), &ids(5)).unwrap();
        assert_eq!(plan.moves().len(), 2);
    }
}
