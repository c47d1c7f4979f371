//! # chatmerge CLI
//!
//! Command-line interface for the chatmerge library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use chatmerge::ChatmergeError;
use chatmerge::cli::Args;
use chatmerge::enrich::OEmbedClient;
use chatmerge::pipeline::{Pipeline, RunReport};
use chatmerge::progress::{no_progress, stderr_progress};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Installs the log subscriber. Invalid filters fall back to `info`.
fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

async fn run() -> Result<(), ChatmergeError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    setup_logging(&args.log_level);

    let config = args.to_config();

    println!("📦 chatmerge v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Folder:   {}", args.folder.display());
    println!("🕒 Timezone: {}", config.timezone);
    if config.enrich.offline {
        println!("📴 Mode:     Offline (cached metadata only)");
    } else {
        println!(
            "🌐 Lookups:  up to {} at once, {}s timeout",
            config.enrich.effective_concurrency(),
            config.enrich.timeout_secs
        );
    }
    println!();

    let source = OEmbedClient::new(config.enrich.timeout())?;
    let progress = if args.quiet {
        no_progress()
    } else {
        stderr_progress()
    };
    let pipeline = Pipeline::new(config, source).with_progress(progress);

    println!("⏳ Processing...");
    let report = pipeline.run(&args.folder).await?;
    let total_time = total_start.elapsed();

    println!(
        "✅ Done! Output saved to {}",
        args.folder
            .join(&pipeline.config().artifacts().output_json)
            .display()
    );

    print_summary(&report);

    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());

    print_diagnostics(&report);
    Ok(())
}

fn print_summary(report: &RunReport) {
    let stats = &report.stats;
    println!();
    println!("📊 Summary:");
    println!("   Files:       {}", stats.files_merged);
    println!("   Rows:        {}", stats.rows_merged);
    println!("   Videos:      {}", report.videos.len());
    println!("   Chats:       {}", report.chat_count());
    println!("   Super chats: {}", report.super_chat_count());
    println!(
        "   Lookups:     {} issued, {} ok, {} failed, {} cached",
        stats.lookups_issued, stats.lookups_succeeded, stats.lookups_failed, stats.cache_hits
    );
    if stats.skipped_offline > 0 {
        println!("   Skipped:     {} (offline)", stats.skipped_offline);
    }
}

fn print_diagnostics(report: &RunReport) {
    if report.diagnostics.is_empty() {
        return;
    }
    println!();
    println!("⚠️  Diagnostics ({}):", report.diagnostics.len());
    for diagnostic in &report.diagnostics {
        println!("   - {}", diagnostic);
    }
}
