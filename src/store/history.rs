use super::disk::{load_json, save_json};
use crate::core::Transaction;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Newest-first log of conversions, rewritten to disk on every change.
pub struct HistoryStore {
    path: PathBuf,
    transactions: Vec<Transaction>,
}

impl HistoryStore {
    /// Opens the log at `path`. A missing file starts an empty log; an
    /// unreadable one is logged and also starts empty.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let transactions = match load_json::<Vec<Transaction>>(&path) {
            Ok(Some(transactions)) => transactions,
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(error = ?e, "Error loading history, starting empty");
                Vec::new()
            }
        };
        debug!("History has {} transactions", transactions.len());

        Self { path, transactions }
    }

    pub fn add(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
        self.save();
    }

    pub fn get_all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
        self.save();
    }

    fn save(&self) {
        if let Err(e) = save_json(&self.path, &self.transactions) {
            error!(error = ?e, "Error saving history");
        }
    }
}
