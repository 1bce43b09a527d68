//! The session owner.
//!
//! [`CollectionSession`] holds the seed list, the latest live snapshot, the
//! merged set and the filter state, and threads them through the pure
//! reconcile and query functions as events arrive.

mod commands;
mod driver;

pub use commands::{CommandParseError, FilterCommand, COMMANDS_HELP};
pub use driver::{RenderPolicy, SessionDriver};

use crate::catalog::{
    reconcile, run_query, FilterState, FilterUpdate, MergedRecord, MergedRecordSet, Record,
};
use crate::render::Renderer;
use std::io;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct CollectionSession {
    seed: Option<Vec<Record>>,
    live: Vec<Record>,
    live_updates: usize,
    merged: MergedRecordSet,
    filter: FilterState,
}

impl CollectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_seed_loaded(&mut self, seed: Vec<Record>) {
        info!("Seed data arrived: {} records", seed.len());
        self.seed = Some(seed);
        self.rebuild();
    }

    /// Replaces the live list with a new snapshot.
    pub fn on_live_snapshot(&mut self, live: Vec<Record>) {
        self.live_updates += 1;
        info!(
            "Live snapshot #{} arrived: {} records",
            self.live_updates,
            live.len()
        );
        self.live = live;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let seed = self.seed.as_deref().unwrap_or_default();
        self.merged = reconcile(seed, &self.live);
        let stats = self.merged.stats();
        debug!(
            "Reconciled {} seed + {} live into {} records ({} overridden, {} new, {} duplicates collapsed)",
            stats.seed_input,
            stats.live_input,
            self.merged.len(),
            stats.overridden_seed,
            stats.live_only,
            stats.duplicates_collapsed
        );
    }

    pub fn apply_filter(&mut self, update: FilterUpdate) {
        self.filter.apply(update);
        debug!("Filter applied: {}", self.filter);
    }

    pub fn reset_filter(&mut self) {
        self.filter.reset();
        debug!("Filter reset");
    }

    /// Applies an interactive command as an edit of the current filter form.
    pub fn handle_command(&mut self, command: FilterCommand) -> CommandOutcome {
        let mut form = self.filter.to_update();
        match command {
            FilterCommand::Search(term) => form.search_term = Some(term),
            FilterCommand::Years { from, to } => {
                form.year_from = from;
                form.year_to = to;
            }
            FilterCommand::YearFrom(year) => form.year_from = year,
            FilterCommand::YearTo(year) => form.year_to = year,
            FilterCommand::Format(format) => form.format = format,
            FilterCommand::Reset => {
                self.reset_filter();
                return CommandOutcome::Continue;
            }
            FilterCommand::Quit => return CommandOutcome::Quit,
        }
        self.apply_filter(form);
        CommandOutcome::Continue
    }

    pub fn display_list(&self) -> Vec<&MergedRecord> {
        run_query(&self.merged, &self.filter)
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> io::Result<()> {
        let display = self.display_list();
        renderer.render(&display, self.merged.len())
    }

    pub fn merged(&self) -> &MergedRecordSet {
        &self.merged
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn seed_loaded(&self) -> bool {
        self.seed.is_some()
    }

    /// Number of live snapshots received so far.
    pub fn live_updates(&self) -> usize {
        self.live_updates
    }
}
