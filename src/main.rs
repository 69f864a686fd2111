//! Dental Scan
//!
//! Interactive front end for the scan pipeline:
//! - `scan <image>` classifies a photo and stores the result
//! - `history [all|week|month|3months]` lists stored scans
//! - `show <id|last>` prints findings with guidance
//! - `delete <id>` removes a stored scan

use anyhow::{Context, Result};
use chrono::Utc;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

use dental_scan::classifier::{DentalClassifier, HttpClassifier, UnavailableClassifier};
use dental_scan::guidance::ConditionGuidance;
use dental_scan::history::{HistoryAggregator, TimeWindow};
use dental_scan::store::{ScanRecordStore, SqliteScanStore};
use dental_scan::{ClassificationOrchestrator, ScanConfig, ScanError, ScanResult};

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dental_scan=info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = ScanConfig::from_env()?;

    println!("\n{}", "═".repeat(60));
    println!("🦷 Dental Scan v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "═".repeat(60));

    let classifier: Arc<dyn DentalClassifier> = match &config.classifier_url {
        Some(url) => {
            println!("🧠 Classifier: {}", url);
            Arc::new(HttpClassifier::new(Some(url.clone()), config.classifier_timeout)?)
        }
        None => {
            println!("🧠 Classifier: not configured (default findings only)");
            Arc::new(UnavailableClassifier)
        }
    };

    let store = SqliteScanStore::new(&config.db_path).await?;
    let orchestrator = ClassificationOrchestrator::new(classifier);
    let aggregator = config.aggregator();

    println!("💾 Store: {:?} ({} scans)", store.path(), store.count().await?);
    println!(
        "\n💡 Commands: 'scan <image>' | 'history [{}]' | 'show <id|last>' | 'delete <id>' | 'quit'\n",
        window_choices()
    );

    let mut session = Session::new(&orchestrator, &store, aggregator);

    loop {
        print!("🦷 > ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        if session.handle(input.trim()).await == Flow::Quit {
            break;
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// REPL state. Store failures are printed and never end the session.
struct Session<'a> {
    orchestrator: &'a ClassificationOrchestrator,
    store: &'a dyn ScanRecordStore,
    aggregator: HistoryAggregator,
    last_scan: Option<ScanResult>,
}

impl<'a> Session<'a> {
    fn new(
        orchestrator: &'a ClassificationOrchestrator,
        store: &'a dyn ScanRecordStore,
        aggregator: HistoryAggregator,
    ) -> Self {
        Self { orchestrator, store, aggregator, last_scan: None }
    }

    async fn handle(&mut self, line: &str) -> Flow {
        if line.is_empty() {
            return Flow::Continue;
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("\n👋 Goodbye!\n");
                return Flow::Quit;
            }
            "scan" => self.scan(arg).await,
            "history" => self.history(arg).await,
            "show" => self.show(arg).await,
            "delete" => self.delete(arg).await,
            other => println!("⚠️  Unknown command '{}'", other),
        }
        Flow::Continue
    }

    async fn scan(&mut self, arg: &str) {
        if arg.is_empty() {
            println!("⚠️  Usage: scan <image path>");
            return;
        }
        let bytes = match tokio::fs::read(arg).await {
            Ok(b) => b,
            Err(e) => {
                println!("❌ Could not read '{}': {}", arg, e);
                return;
            }
        };
        match self.orchestrator.run_and_record(bytes, self.store).await {
            Ok(scan) => {
                info!("Recorded scan {}", scan.id());
                print_scan(&scan);
                self.last_scan = Some(scan);
            }
            Err(e) if e.downcast_ref::<ScanError>().is_some() => {
                println!("❌ {}. Nothing was saved.", e);
            }
            Err(e) => println!("❌ Scan failed: {:#}", e),
        }
    }

    async fn history(&self, arg: &str) {
        let window = match arg.parse::<TimeWindow>() {
            Ok(w) => w,
            Err(e) => {
                println!("⚠️  {} (choose one of: {})", e, window_choices());
                return;
            }
        };
        match self.store.list_all().await {
            Ok(snapshot) => print_history(&self.aggregator, &snapshot, window),
            Err(e) => println!("❌ Could not load history: {:#}", e),
        }
    }

    async fn show(&self, arg: &str) {
        let scan = if arg.is_empty() || arg == "last" {
            self.last_scan.clone()
        } else {
            let Ok(id) = Uuid::parse_str(arg) else {
                println!("⚠️  '{}' is not a scan id", arg);
                return;
            };
            match self.store.get(id).await {
                Ok(scan) => scan,
                Err(e) => {
                    println!("❌ Could not load scan {}: {:#}", id, e);
                    return;
                }
            }
        };
        match scan {
            Some(scan) => print_scan(&scan),
            None => println!("📭 No such scan."),
        }
    }

    async fn delete(&mut self, arg: &str) {
        let Ok(id) = Uuid::parse_str(arg) else {
            println!("⚠️  Usage: delete <scan id>");
            return;
        };
        match self.store.delete(id).await {
            Ok(true) => {
                if self.last_scan.as_ref().map(|s| s.id()) == Some(id) {
                    self.last_scan = None;
                }
                println!("🗑️  Deleted {}", id);
            }
            Ok(false) => println!("📭 No such scan."),
            Err(e) => println!("❌ Could not delete {}: {:#}", id, e),
        }
    }
}

/// `all|week|month|3months`, one keyword per window.
fn window_choices() -> String {
    TimeWindow::ALL
        .iter()
        .map(|w| w.keyword())
        .collect::<Vec<_>>()
        .join("|")
}

fn print_scan(scan: &ScanResult) {
    println!("\n📋 Scan {} at {}", scan.id(), scan.timestamp().format("%Y-%m-%d %H:%M"));
    for condition in scan.conditions_by_confidence() {
        let guidance = ConditionGuidance::for_result(condition);
        println!(
            "  • {:<20} {:<12} {:>5.1}%  {}",
            condition.name().display_name(),
            condition.risk().label(),
            condition.confidence() * 100.0,
            guidance.advisory.title
        );
        if let Some(first) = guidance.recommendations.first() {
            println!("      ↳ {}", first);
        }
    }
    let breakdown = scan.breakdown();
    println!(
        "  Overall: {} high priority, {} to monitor, {} low risk\n",
        breakdown.high, breakdown.medium, breakdown.low
    );
}

fn print_history(aggregator: &HistoryAggregator, snapshot: &[ScanResult], window: TimeWindow) {
    let summary = aggregator.summarize(snapshot, window, Utc::now());
    println!(
        "\n📜 {} | {} scans | this month: {} | health score: {}",
        summary.window,
        summary.rows.len(),
        summary.monthly_count,
        summary.health_score
    );
    if summary.rows.is_empty() {
        println!("   No scan history yet. Take your first dental scan to see results here.\n");
        return;
    }
    for row in &summary.rows {
        println!(
            "  {}  {}  {:>2} conditions  {}{}",
            row.timestamp.format("%Y-%m-%d %H:%M"),
            row.id,
            row.condition_count,
            row.highest_risk.map(|r| r.label()).unwrap_or("-"),
            if row.has_image { "  📷" } else { "" }
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use dental_scan::store::InMemoryScanStore;
    use image::{DynamicImage, ImageFormat};
    use tempfile::NamedTempFile;

    struct BrokenStore;

    #[async_trait]
    impl ScanRecordStore for BrokenStore {
        async fn insert(&self, _scan: ScanResult) -> Result<()> {
            bail!("disk full")
        }
        async fn list_all(&self) -> Result<Vec<ScanResult>> {
            bail!("database is locked")
        }
        async fn delete(&self, _id: Uuid) -> Result<bool> {
            bail!("database is locked")
        }
        async fn get(&self, _id: Uuid) -> Result<Option<ScanResult>> {
            bail!("database is locked")
        }
        async fn count(&self) -> Result<usize> {
            bail!("database is locked")
        }
    }

    fn orchestrator() -> ClassificationOrchestrator {
        ClassificationOrchestrator::new(Arc::new(UnavailableClassifier))
    }

    #[tokio::test]
    async fn test_store_errors_keep_session_alive() {
        let orchestrator = orchestrator();
        let store = BrokenStore;
        let mut session = Session::new(&orchestrator, &store, HistoryAggregator::new());
        let id = Uuid::new_v4();

        assert_eq!(session.handle("history week").await, Flow::Continue);
        assert_eq!(session.handle(&format!("show {id}")).await, Flow::Continue);
        assert_eq!(session.handle(&format!("delete {id}")).await, Flow::Continue);
        assert_eq!(session.handle("quit").await, Flow::Quit);
    }

    #[tokio::test]
    async fn test_scan_then_delete_clears_last() -> Result<()> {
        let file = NamedTempFile::new()?;
        DynamicImage::new_rgb8(8, 8).save_with_format(file.path(), ImageFormat::Png)?;
        let path = file.path().to_string_lossy().to_string();

        let orchestrator = orchestrator();
        let store = InMemoryScanStore::new();
        let mut session = Session::new(&orchestrator, &store, HistoryAggregator::new());

        assert_eq!(session.handle(&format!("scan {path}")).await, Flow::Continue);
        let scan = session.last_scan.clone().context("scan was not recorded")?;
        assert_eq!(store.count().await?, 1);

        assert_eq!(session.handle(&format!("delete {}", scan.id())).await, Flow::Continue);
        assert!(session.last_scan.is_none());
        assert_eq!(store.count().await?, 0);
        Ok(())
    }
}
