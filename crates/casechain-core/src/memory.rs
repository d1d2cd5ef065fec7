//! In-memory implementation of `CaseStore`.
//!
//! Each case lives behind its own `Mutex`, and the id → case map behind an
//! `RwLock`.  An append holds the map's read lock only long enough to clone
//! the case's `Arc`, then holds the case's mutex for the whole
//! read-head/write-head sequence.  Appends to one case are serialized;
//! appends to different cases run in parallel.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

use tracing::{debug, info, warn};

use casechain_audit::{verify_case, ChainReport};
use casechain_contracts::{
    case::CaseFile,
    error::{ClosureError, ClosureResult},
    event::{CandidateEvent, ClosureEvent},
};

use crate::{
    engine::{append_event, ClosureEngine},
    traits::CaseStore,
};

fn poisoned(what: &str, e: impl std::fmt::Display) -> ClosureError {
    ClosureError::StoreError {
        reason: format!("{} lock poisoned: {}", what, e),
    }
}

/// A process-local case store.
///
/// Built with `new()`, appends go straight to the chain.  Built with
/// `with_engine()`, every append is authorized first.
pub struct InMemoryCaseStore {
    cases: RwLock<HashMap<String, Arc<Mutex<CaseFile>>>>,
    engine: Option<ClosureEngine>,
}

impl InMemoryCaseStore {
    pub fn new() -> Self {
        Self {
            cases: RwLock::new(HashMap::new()),
            engine: None,
        }
    }

    pub fn with_engine(engine: ClosureEngine) -> Self {
        Self {
            cases: RwLock::new(HashMap::new()),
            engine: Some(engine),
        }
    }

    /// Create and store a fresh `OPEN` case.
    pub fn open(
        &self,
        case_id: impl Into<String>,
        env: impl Into<String>,
        system: impl Into<String>,
    ) -> ClosureResult<CaseFile> {
        let case = CaseFile::open(case_id, env, system);
        self.insert(case.clone())?;
        Ok(case)
    }

    fn entry(&self, case_id: &str) -> ClosureResult<Arc<Mutex<CaseFile>>> {
        let cases = self.cases.read().map_err(|e| poisoned("case map", e))?;
        cases
            .get(case_id)
            .cloned()
            .ok_or_else(|| ClosureError::CaseNotFound {
                case_id: case_id.to_string(),
            })
    }
}

impl Default for InMemoryCaseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseStore for InMemoryCaseStore {
    fn insert(&self, case: CaseFile) -> ClosureResult<()> {
        if let Err(e) = verify_case(&case) {
            warn!(case_id = %case.case_id, error = %e, "refusing to store case with a corrupted chain");
            return Err(e);
        }

        let mut cases = self.cases.write().map_err(|e| poisoned("case map", e))?;
        if cases.contains_key(&case.case_id) {
            return Err(ClosureError::DuplicateCase {
                case_id: case.case_id,
            });
        }

        debug!(
            case_id = %case.case_id,
            env = %case.env,
            system = %case.system,
            event_count = case.events.len(),
            "case stored"
        );
        cases.insert(case.case_id.clone(), Arc::new(Mutex::new(case)));
        Ok(())
    }

    fn get(&self, case_id: &str) -> ClosureResult<CaseFile> {
        let entry = self.entry(case_id)?;
        let case = entry.lock().map_err(|e| poisoned("case", e))?;
        Ok(case.clone())
    }

    fn append(&self, case_id: &str, candidate: CandidateEvent) -> ClosureResult<ClosureEvent> {
        let entry = self.entry(case_id)?;
        let mut case = entry.lock().map_err(|e| poisoned("case", e))?;

        let event = match &self.engine {
            Some(engine) => engine.append(&mut case, candidate)?.clone(),
            None => append_event(&mut case, candidate)?.clone(),
        };

        if case.is_closed() {
            info!(case_id = %case_id, head = %case.last_hash, "case closed");
        }
        Ok(event)
    }

    fn verify(&self, case_id: &str) -> ClosureResult<ChainReport> {
        let entry = self.entry(case_id)?;
        let case = entry.lock().map_err(|e| poisoned("case", e))?;
        verify_case(&case).inspect_err(|e| {
            warn!(case_id = %case_id, error = %e, "case chain failed verification");
        })
    }

    fn case_ids(&self) -> ClosureResult<Vec<String>> {
        let cases = self.cases.read().map_err(|e| poisoned("case map", e))?;
        let mut ids: Vec<String> = cases.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
