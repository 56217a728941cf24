//! The blocking event loop.
//!
//! Each iteration polls the viewport (a size change is handled as a resize),
//! draws, waits for one key, runs it through dispatch and `update`, and
//! executes the resulting effect against the collaborators.  Collaborator
//! calls run inline, so a slow network request stalls input until it
//! returns.

use std::fmt::Display;
use std::ops::ControlFlow;

use anyhow::Result;

use super::input;
use super::state::{Notice, ScreenState};
use super::terminal::Console;
use super::update::{update, Effect};
use crate::config::Bindings;
use crate::core::item::Item;
use crate::core::layout::LayoutMetrics;
use crate::launch::Launcher;
use crate::source::ItemSource;
use crate::ui::screen::ScreenView;

pub struct Controller<C, S, L> {
    console: C,
    source: S,
    launcher: L,
    bindings: Bindings,
    help: Vec<String>,
    state: ScreenState,
    /// The snapshot from the last successful retrieve.
    items: Vec<Item>,
    metrics: LayoutMetrics,
    notice: Option<Notice>,
}

impl<C: Console, S: ItemSource, L: Launcher> Controller<C, S, L> {
    pub fn new(console: C, source: S, launcher: L, bindings: Bindings) -> Self {
        let help = bindings.help_lines();
        Self {
            console,
            source,
            launcher,
            bindings,
            help,
            state: ScreenState::new(),
            items: Vec::new(),
            metrics: LayoutMetrics::default(),
            notice: None,
        }
    }

    /// Run until the user quits.  Only terminal I/O errors end the loop
    /// early; collaborator failures are shown and the session goes on.
    pub fn run(&mut self) -> Result<()> {
        self.sync_layout()?;
        self.refresh();

        loop {
            self.sync_layout()?;
            self.render()?;

            let Some(key) = self.console.next_key()? else {
                continue;
            };
            self.notice = None;

            let Some(action) = input::dispatch(&self.bindings, &self.state.mode, key) else {
                continue;
            };
            let state = std::mem::take(&mut self.state);
            let (state, effect) = update(state, action, &self.metrics, &self.items);
            self.state = state;

            if let Some(effect) = effect {
                if self.apply(effect).is_break() {
                    tracing::debug!("quit requested");
                    return Ok(());
                }
            }
        }
    }

    /// Recompute the layout for the current viewport, treating a size
    /// change as a resize of the selection.
    fn sync_layout(&mut self) -> Result<()> {
        let viewport = self.console.viewport()?;
        let metrics = LayoutMetrics::compute(viewport, self.items.len());
        let state = std::mem::take(&mut self.state);
        self.state = if viewport != self.metrics.viewport {
            tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
            state.resized(&metrics, self.items.len())
        } else {
            state.reclamp(&metrics, self.items.len())
        };
        self.metrics = metrics;
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let view = ScreenView {
            state: &self.state,
            metrics: &self.metrics,
            items: &self.items,
            help: &self.help,
            notice: self.notice.as_ref(),
        };
        self.console.draw(&view)?;
        Ok(())
    }

    fn apply(&mut self, effect: Effect) -> ControlFlow<()> {
        tracing::debug!(?effect, "applying effect");
        match effect {
            Effect::Quit => return ControlFlow::Break(()),
            Effect::Refresh => {
                if self.refresh() {
                    self.info(format!("Reading list refreshed ({} items).", self.items.len()));
                }
            }
            Effect::Archive { item_id } => match self.source.archive(&item_id) {
                Ok(()) => {
                    if self.refresh() {
                        self.info("Item archived.");
                    }
                }
                Err(err) => self.report("Archive failed", err),
            },
            Effect::Delete { item_id } => match self.source.delete(&item_id) {
                Ok(()) => {
                    if self.refresh() {
                        self.info("Item deleted.");
                    }
                }
                Err(err) => self.report("Delete failed", err),
            },
            Effect::Copy { url } => match self.launcher.copy(&url) {
                Ok(()) => self.info("Link copied to clipboard."),
                Err(err) => self.report("Copy failed", err),
            },
            Effect::Open { url } => match self.launcher.open(&url) {
                Ok(()) => self.info("Opened in browser."),
                Err(err) => self.report("Open failed", err),
            },
            Effect::Mail { subject, body } => match self.launcher.mail(&subject, &body) {
                Ok(()) => self.info("Opened new mail."),
                Err(err) => self.report("Mail failed", err),
            },
        }
        ControlFlow::Continue(())
    }

    /// Replace the snapshot.  On failure the previous snapshot stays.
    fn refresh(&mut self) -> bool {
        match self.source.retrieve() {
            Ok(items) => {
                self.items = items;
                self.metrics = LayoutMetrics::compute(self.metrics.viewport, self.items.len());
                let state = std::mem::take(&mut self.state);
                self.state = state.reclamp(&self.metrics, self.items.len());
                true
            }
            Err(err) => {
                self.report("Refresh failed", err);
                false
            }
        }
    }

    fn info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Info(message.into()));
    }

    fn report(&mut self, context: &str, err: impl Display) {
        tracing::warn!(error = %err, "{context}");
        self.notice = Some(Notice::Error(format!("{context}: {err}")));
    }
}

#[cfg(test)]
impl<C, S, L> Controller<C, S, L> {
    fn parts(&self) -> (&ScreenState, &[Item], &S, &L, Option<&Notice>) {
        (&self.state, &self.items, &self.source, &self.launcher, self.notice.as_ref())
    }

    fn console(&self) -> &C {
        &self.console
    }
}
