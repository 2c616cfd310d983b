//! Terminal implementations of the controller's display and dialog capabilities.

use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
    time::Duration,
};

use client_core::{TranscriptRenderer, UserPrompt};
use console::{style, Term};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use shared::domain::Role;
use tracing::warn;

use crate::{config::Settings, input::HELP};

/// Drops escape sequences and control characters so backend text cannot
/// restyle or move the terminal cursor. Newlines and tabs are kept.
pub fn sanitize(text: &str) -> String {
    console::strip_ansi_codes(text)
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

pub struct TerminalRenderer {
    term: Term,
    indicator: Mutex<Option<ProgressBar>>,
    indicator_text: String,
    welcome_title: String,
    welcome_text: String,
    input_enabled: AtomicBool,
}

impl TerminalRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            term: Term::stdout(),
            indicator: Mutex::new(None),
            indicator_text: settings.indicator_text.clone(),
            welcome_title: settings.welcome_title.clone(),
            welcome_text: settings.welcome_text.clone(),
            input_enabled: AtomicBool::new(true),
        }
    }

    pub fn print_prompt(&self, continuing: bool) {
        if !self.input_enabled.load(Ordering::SeqCst) {
            return;
        }
        let marker = if continuing { "… " } else { "› " };
        self.write(|term| {
            term.write_str(&style(marker).cyan().bold().to_string())?;
            term.flush()
        });
    }

    pub fn print_help(&self) {
        self.write(|term| term.write_line(&style(HELP).dim().to_string()));
    }

    fn indicator(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.indicator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write<F>(&self, f: F)
    where
        F: FnOnce(&Term) -> io::Result<()>,
    {
        if let Err(err) = f(&self.term) {
            warn!(error = %err, "terminal: write failed");
        }
    }

    fn show_placeholder(&self) -> io::Result<()> {
        self.term.write_line("")?;
        self.term
            .write_line(&style(format!("  ✦ {}", self.welcome_title)).bold().to_string())?;
        for line in self.welcome_text.lines() {
            self.term
                .write_line(&style(format!("    {line}")).dim().to_string())?;
        }
        self.term.write_line("")
    }
}

impl TranscriptRenderer for TerminalRenderer {
    fn append_entry(&self, role: Role, text: &str) {
        let label = match role {
            Role::User => style("you").cyan().bold(),
            Role::Assistant => style("assistant").green().bold(),
        };
        let body = sanitize(text);
        self.write(|term| {
            term.write_line(&label.to_string())?;
            for line in body.lines() {
                term.write_line(&format!("  {line}"))?;
            }
            term.write_line("")
        });
    }

    fn show_indicator(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(spinner.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        pb.set_message(self.indicator_text.clone());
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Some(previous) = self.indicator().replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn remove_indicator(&self) {
        if let Some(pb) = self.indicator().take() {
            pb.finish_and_clear();
        }
    }

    fn clear_and_show_placeholder(&self) {
        self.write(|term| {
            term.clear_screen()?;
            self.show_placeholder()
        });
    }

    fn dismiss_placeholder(&self) {
        // The placeholder is the only thing on screen before the first message.
        self.write(|term| term.clear_screen());
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.store(enabled, Ordering::SeqCst);
    }

    // The submitted line was already consumed from stdin.
    fn clear_input(&self) {}

    fn focus_input(&self) {
        self.write(|term| term.flush());
    }
}

pub struct DialogPrompt;

impl UserPrompt for DialogPrompt {
    fn confirm(&self, message: &str) -> bool {
        match Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(confirmed) => confirmed,
            Err(err) => {
                warn!(error = %err, "terminal: confirmation prompt failed");
                false
            }
        }
    }

    fn notify_error(&self, message: &str) {
        let line = style(format!("✖ {message}")).red().bold().to_string();
        if let Err(err) = Term::stderr().write_line(&line) {
            warn!(error = %err, "terminal: failed to show error");
        }
    }
}
