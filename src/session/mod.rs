//! Host-side simulator state with write-through persistence.
//!
//! The session owns the editable inputs, the last computed schedules and the
//! executed-round selection. Every mutation is written to the key-value store
//! on a best-effort basis; a failed write is logged and the in-memory state
//! stands.

pub mod keys;

use crate::config::Config;
use crate::domain::format::format_number_string;
use crate::domain::{
    ExecutionSelection, InputForm, InvalidInputError, Policy, Schedule, Schedules,
    SelectionScope, Summary,
};
use crate::engine;
use crate::store::{KeyValueStore, StoreError};
use keys::StorageKeys;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub key_prefix: String,
    pub selection_scope: SelectionScope,
    pub max_split_count: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            key_prefix: "split_".to_string(),
            selection_scope: SelectionScope::Shared,
            max_split_count: 1000,
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            key_prefix: config.storage_key_prefix.clone(),
            selection_scope: config.selection_scope,
            max_split_count: config.max_split_count,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error("No calculation results; run a calculation first")]
    NoResults,
    #[error("Round {round} is outside 1..={count}")]
    RoundOutOfRange { round: u32, count: usize },
}

/// Partial update of the editable inputs. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPatch {
    pub item_name: Option<String>,
    pub current_price: Option<String>,
    pub total_capital: Option<String>,
    pub split_count: Option<String>,
    pub drop_rate: Option<String>,
    pub martingale_multiplier: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    NothingToSave,
}

/// What the presentation layer shows for the active tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub item_name: String,
    pub inputs: InputForm,
    pub active_tab: Policy,
    pub selection_scope: SelectionScope,
    pub executed_rounds: Vec<u32>,
    pub schedule: Option<Schedule>,
    pub summary: Option<Summary>,
}

#[derive(Debug)]
pub struct SimulatorSession {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    options: SessionOptions,
    item_name: String,
    form: InputForm,
    active_tab: Policy,
    results: Option<Schedules>,
    selection: ExecutionSelection,
}

impl SimulatorSession {
    /// Restore a session from the store.
    ///
    /// Entries that fail to decode are logged and replaced by defaults.
    ///
    /// # Errors
    /// Returns an error only if the store itself cannot be read.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        options: SessionOptions,
    ) -> Result<Self, StoreError> {
        let storage_keys = StorageKeys::new(options.key_prefix.clone());
        let defaults = InputForm::default();

        let item_name = read_or(&*store, &storage_keys.key(keys::ITEM_NAME), String::new()).await?;
        let form = InputForm {
            current_price: read_or(
                &*store,
                &storage_keys.key(keys::CURRENT_PRICE),
                defaults.current_price,
            )
            .await?,
            total_capital: read_or(
                &*store,
                &storage_keys.key(keys::TOTAL_CAPITAL),
                defaults.total_capital,
            )
            .await?,
            split_count: read_or(
                &*store,
                &storage_keys.key(keys::SPLIT_COUNT),
                defaults.split_count,
            )
            .await?,
            drop_rate: read_or(
                &*store,
                &storage_keys.key(keys::DROP_RATE),
                defaults.drop_rate,
            )
            .await?,
            martingale_multiplier: read_or(
                &*store,
                &storage_keys.key(keys::MARTINGALE_MULTIPLIER),
                defaults.martingale_multiplier,
            )
            .await?,
        };
        let active_tab = read_or(
            &*store,
            &storage_keys.key(keys::ACTIVE_TAB),
            Policy::default(),
        )
        .await?;
        let results: Option<Schedules> =
            read_or(&*store, &storage_keys.key(keys::RESULTS), None).await?;

        let mut selection = read_or(
            &*store,
            &storage_keys.key(keys::EXECUTED_ROWS),
            ExecutionSelection::new(options.selection_scope),
        )
        .await?;
        if selection.scope() != options.selection_scope {
            warn!(
                stored = ?selection.scope(),
                configured = ?options.selection_scope,
                "Discarding executed rounds stored under a different selection scope"
            );
            selection = ExecutionSelection::new(options.selection_scope);
        }

        info!(
            has_results = results.is_some(),
            active_tab = %active_tab,
            "Session restored"
        );

        Ok(Self {
            store,
            keys: storage_keys,
            options,
            item_name,
            form,
            active_tab,
            results,
            selection,
        })
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn form(&self) -> &InputForm {
        &self.form
    }

    pub fn active_tab(&self) -> Policy {
        self.active_tab
    }

    pub fn results(&self) -> Option<&Schedules> {
        self.results.as_ref()
    }

    pub fn selection(&self) -> &ExecutionSelection {
        &self.selection
    }

    /// Apply edits to the label and inputs.
    ///
    /// Price and capital are regrouped with thousands separators as entered.
    pub async fn update_inputs(&mut self, patch: InputPatch) {
        if let Some(item_name) = patch.item_name {
            self.item_name = item_name;
            self.persist(keys::ITEM_NAME, Some(&self.item_name)).await;
        }
        if let Some(price) = patch.current_price {
            self.form.current_price = format_number_string(&price);
            self.persist(keys::CURRENT_PRICE, Some(&self.form.current_price))
                .await;
        }
        if let Some(capital) = patch.total_capital {
            self.form.total_capital = format_number_string(&capital);
            self.persist(keys::TOTAL_CAPITAL, Some(&self.form.total_capital))
                .await;
        }
        if let Some(count) = patch.split_count {
            self.form.split_count = count;
            self.persist(keys::SPLIT_COUNT, Some(&self.form.split_count))
                .await;
        }
        if let Some(rate) = patch.drop_rate {
            self.form.drop_rate = rate;
            self.persist(keys::DROP_RATE, Some(&self.form.drop_rate)).await;
        }
        if let Some(multiplier) = patch.martingale_multiplier {
            self.form.martingale_multiplier = multiplier;
            self.persist(
                keys::MARTINGALE_MULTIPLIER,
                Some(&self.form.martingale_multiplier),
            )
            .await;
        }
    }

    /// Run the engine over the current inputs.
    ///
    /// On success both schedules are cached and the selection is cleared.
    /// On invalid input nothing changes, including previous results.
    pub async fn calculate(&mut self) -> Result<&Schedules, SessionError> {
        let params = self
            .form
            .parse()
            .and_then(|p| p.ensure_count_within(self.options.max_split_count))
            .map_err(|e| {
                warn!(error = %e, "Calculation rejected");
                e
            })?;

        let schedules = engine::compute(&params);
        info!(
            count = params.count(),
            price = params.price(),
            capital = params.capital(),
            drop_rate = params.drop_rate_percent(),
            multiplier = params.multiplier(),
            "Calculated split schedules"
        );

        self.selection.clear();
        self.persist(keys::RESULTS, Some(&schedules)).await;
        self.persist(keys::EXECUTED_ROWS, Some(&self.selection)).await;

        let schedules = self.results.insert(schedules);
        Ok(&*schedules)
    }

    /// Flip the executed flag of a round on the active tab.
    ///
    /// Returns whether the round is now marked executed.
    pub async fn toggle_round(&mut self, round: u32) -> Result<bool, SessionError> {
        let schedules = self.results.as_ref().ok_or(SessionError::NoResults)?;
        let schedule = schedules.get(self.active_tab);
        if !schedule.contains_round(round) {
            return Err(SessionError::RoundOutOfRange {
                round,
                count: schedule.len(),
            });
        }

        let executed = self.selection.toggle(self.active_tab, round);
        self.persist(keys::EXECUTED_ROWS, Some(&self.selection)).await;
        Ok(executed)
    }

    pub async fn switch_tab(&mut self, policy: Policy) {
        self.active_tab = policy;
        self.persist(keys::ACTIVE_TAB, Some(&self.active_tab)).await;
    }

    /// Restore defaults and remove every persisted key.
    pub async fn reset(&mut self) {
        self.item_name.clear();
        self.form = InputForm::default();
        self.active_tab = Policy::default();
        self.results = None;
        self.selection = ExecutionSelection::new(self.options.selection_scope);

        for key in self.keys.all() {
            if let Err(e) = self.store.remove(&key).await {
                warn!(key = %key, error = %e, "Failed to remove stored entry");
            }
        }
        info!("Session reset");
    }

    /// Persistence is write-through, so saving only reports whether there is
    /// anything worth keeping.
    pub fn save(&self) -> SaveOutcome {
        if self.results.is_some() {
            info!("Calculation results saved");
            SaveOutcome::Saved
        } else {
            SaveOutcome::NothingToSave
        }
    }

    /// The active schedule and its summary over the executed rounds.
    pub fn view(&self) -> SessionView {
        let executed = self.selection.rounds(self.active_tab);
        let schedule = self.results.as_ref().map(|r| r.get(self.active_tab));

        SessionView {
            item_name: self.item_name.clone(),
            inputs: self.form.clone(),
            active_tab: self.active_tab,
            selection_scope: self.selection.scope(),
            executed_rounds: executed.iter().copied().collect(),
            summary: schedule.map(|s| engine::aggregate(s, executed)),
            schedule: schedule.cloned(),
        }
    }

    async fn persist<T: Serialize + ?Sized>(&self, name: &str, value: Option<&T>) {
        let key = self.keys.key(name);
        let encoded = match value.map(serde_json::to_string).transpose() {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode entry");
                return;
            }
        };
        if let Err(e) = self.store.put(&key, encoded).await {
            warn!(key = %key, error = %e, "Failed to persist entry");
        }
    }
}

async fn read_or<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    default: T,
) -> Result<T, StoreError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(default);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key, error = %e, "Ignoring unreadable stored entry");
            Ok(default)
        }
    }
}
