use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Datelike, Duration, Local, NaiveDateTime, Timelike, Weekday};
use futures::future::join_all;
use log::{debug, info, warn};

use super::sync_model::SyncRunSummary;
use super::sync_traits::RemoteFetcherTrait;
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::constants::{STORE_KEY_WEEKLY_SUMMARY_SENT, WEEKLY_SUMMARY_HOUR};
use crate::errors::Result;
use crate::i18n::TranslatorTrait;
use crate::ledger::{detect_newly_closed, merge};
use crate::notifications::{trade_closed_tag, weekly_summary_tag, Notification, NotificationSinkTrait};
use crate::settings::Settings;
use crate::statements::parse_statement;
use crate::store::{get_value, put_value, StoreTrait};
use crate::trades::Trade;

/// The sync scheduler. Woken by an external trigger (user refresh or a
/// periodic wake-up), it walks every account with a remote source through
/// fetch → normalize → reconcile → detect events → persist, isolating
/// per-account failures and writing the store at most once per run.
pub struct SyncService {
    fetcher: Arc<dyn RemoteFetcherTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    store: Arc<dyn StoreTrait>,
    notification_sink: Arc<dyn NotificationSinkTrait>,
    translator: Arc<dyn TranslatorTrait>,
    /// Re-entrancy guard: a trigger arriving while a run is in flight is a
    /// no-op, not a queued run.
    running: AtomicBool,
    initial_run_done: AtomicBool,
}

impl SyncService {
    pub fn new(
        fetcher: Arc<dyn RemoteFetcherTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        store: Arc<dyn StoreTrait>,
        notification_sink: Arc<dyn NotificationSinkTrait>,
        translator: Arc<dyn TranslatorTrait>,
    ) -> Self {
        Self {
            fetcher,
            account_repository,
            store,
            notification_sink,
            translator,
            running: AtomicBool::new(false),
            initial_run_done: AtomicBool::new(false),
        }
    }

    /// Runs one sync pass over all accounts. Returns a summary with
    /// `ran == false` when another run was already in flight.
    pub async fn run_sync(&self, settings: &Settings) -> Result<SyncRunSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("sync: run already in flight, ignoring trigger");
            return Ok(SyncRunSummary::default());
        }

        let result = self.run_sync_inner(settings).await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// The once-per-process startup pass; subsequent calls are no-ops and
    /// periodic wake-ups go through `run_sync` directly.
    pub async fn run_initial_sync(&self, settings: &Settings) -> Result<SyncRunSummary> {
        if self.initial_run_done.swap(true, Ordering::SeqCst) {
            debug!("sync: initial run already performed");
            return Ok(SyncRunSummary::default());
        }
        self.run_sync(settings).await
    }

    async fn run_sync_inner(&self, settings: &Settings) -> Result<SyncRunSummary> {
        let mut summary = SyncRunSummary {
            ran: true,
            ..Default::default()
        };

        // The store is read once at run start and written at most once at
        // run end.
        let mut accounts = self.account_repository.load_all()?;
        let targets: Vec<(usize, String)> = accounts
            .iter()
            .enumerate()
            .filter_map(|(index, account)| account.data_url.clone().map(|url| (index, url)))
            .collect();
        if targets.is_empty() {
            debug!("sync: no accounts with a remote source");
        }

        // Fetches go out concurrently; mutation starts only after all of
        // them have resolved.
        let bodies = join_all(
            targets
                .iter()
                .map(|(_, url)| self.fetcher.fetch_statement(url)),
        )
        .await;

        let mut any_changed = false;
        for ((index, url), body) in targets.iter().zip(bodies) {
            let account = &mut accounts[*index];
            let raw = match body {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "sync: fetch failed for account '{}' ({}): {}",
                        account.name, url, e
                    );
                    summary.accounts_failed += 1;
                    continue;
                }
            };

            let batch = match parse_statement(&raw) {
                Ok(batch) => batch,
                Err(e) => {
                    warn!("sync: statement for account '{}' is invalid: {}", account.name, e);
                    summary.accounts_failed += 1;
                    continue;
                }
            };

            // Suspicious empty fetch against a non-empty ledger: keep the
            // prior state rather than silently losing data.
            if batch.is_empty() && !account.trades.is_empty() {
                warn!(
                    "sync: empty statement for account '{}' with {} existing trades, keeping ledger",
                    account.name,
                    account.trades.len()
                );
                summary.accounts_skipped += 1;
                continue;
            }

            let newly_closed = detect_newly_closed(&batch, &account.trades);
            if settings.notifications.trade_closed {
                for trade in &newly_closed {
                    if self.emit_trade_closed(&settings.language, trade) {
                        summary.notifications_sent += 1;
                    }
                }
            }

            let outcome = merge(&account.trades, batch);
            let ledger_changed = !outcome.noop
                && (!outcome.added.is_empty()
                    || !outcome.changed.is_empty()
                    || outcome.merged.len() != account.trades.len());
            if !ledger_changed {
                debug!("sync: account '{}' is up to date", account.name);
                summary.accounts_skipped += 1;
                continue;
            }

            account.trades = outcome.merged;
            account.last_updated = Some(chrono::Utc::now().naive_utc());
            any_changed = true;
            summary.accounts_synced += 1;
            info!(
                "sync: account '{}' updated ({} added, {} changed)",
                account.name,
                outcome.added.len(),
                outcome.changed.len()
            );
        }

        if any_changed {
            self.account_repository.save_all(&accounts)?;
        }

        summary.notifications_sent +=
            self.maybe_send_weekly_summary(settings, &accounts, Local::now().naive_local())?;

        Ok(summary)
    }

    fn emit_trade_closed(&self, language: &str, trade: &Trade) -> bool {
        let mut params = HashMap::new();
        params.insert("symbol", trade.symbol.clone());
        params.insert("type", trade.trade_type.to_string());
        params.insert("size", format!("{:.2}", trade.size));
        params.insert("profit", format!("{:.2}", trade.profit));

        let notification = Notification {
            tag: trade_closed_tag(trade.ticket),
            title: self
                .translator
                .translate(language, "notification.trade_closed.title", &HashMap::new()),
            body: self
                .translator
                .translate(language, "notification.trade_closed.body", &params),
        };

        match self.notification_sink.notify(notification) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "sync: could not show trade-closed notification for ticket {}: {}",
                    trade.ticket, e
                );
                false
            }
        }
    }

    /// Sends at most one weekly summary per account per ISO week, gated by a
    /// Sunday-evening window and the persisted last-sent stamp. Public so the
    /// host can wire it to its own side schedule.
    pub fn maybe_send_weekly_summary(
        &self,
        settings: &Settings,
        accounts: &[Account],
        now: NaiveDateTime,
    ) -> Result<usize> {
        if !settings.notifications.weekly_summary {
            return Ok(0);
        }
        if now.weekday() != Weekday::Sun || now.hour() < WEEKLY_SUMMARY_HOUR {
            return Ok(0);
        }

        let iso_week = now.iso_week();
        if let Some(last_sent) =
            get_value::<NaiveDateTime>(self.store.as_ref(), STORE_KEY_WEEKLY_SUMMARY_SENT)?
        {
            if last_sent.iso_week() == iso_week {
                debug!("sync: weekly summary already sent this week");
                return Ok(0);
            }
        }

        let week_ago = now - Duration::days(7);
        let mut sent = 0;
        for account in accounts {
            let closed_this_week: Vec<&Trade> = account
                .trades
                .iter()
                .filter(|t| {
                    !t.trade_type.is_balance()
                        && t.is_closed()
                        && t.close_time > week_ago
                        && t.close_time <= now
                })
                .collect();
            if closed_this_week.is_empty() {
                continue;
            }

            let net_profit: f64 = closed_this_week.iter().map(|t| t.net_value()).sum();
            let mut params = HashMap::new();
            params.insert("account", account.name.clone());
            params.insert("trades", closed_this_week.len().to_string());
            params.insert("profit", format!("{:.2}", net_profit));

            let notification = Notification {
                tag: weekly_summary_tag(&account.id, iso_week.year(), iso_week.week()),
                title: self.translator.translate(
                    &settings.language,
                    "notification.weekly_summary.title",
                    &params,
                ),
                body: self.translator.translate(
                    &settings.language,
                    "notification.weekly_summary.body",
                    &params,
                ),
            };
            match self.notification_sink.notify(notification) {
                Ok(()) => sent += 1,
                Err(e) => warn!(
                    "sync: could not show weekly summary for account '{}': {}",
                    account.name, e
                ),
            }
        }

        // Stamp only when something went out, so trades closing later within
        // the same window still get their summary.
        if sent > 0 {
            put_value(self.store.as_ref(), STORE_KEY_WEEKLY_SUMMARY_SENT, &now)?;
        }
        Ok(sent)
    }
}
