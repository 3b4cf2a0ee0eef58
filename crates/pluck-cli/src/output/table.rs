use pluck_core::summary::Summary;
use pluck_core::trace::{ExtractionTrace, TraceOutcome};
use pluck_core::{ExtractionResult, TaskRecord, TransactionRecord};
use rust_decimal::Decimal;

pub fn print(
    result: &ExtractionResult,
    trace: Option<&ExtractionTrace>,
    summary: Option<&Summary>,
) {
    match result {
        ExtractionResult::Tasks(tasks) => print_tasks(tasks),
        ExtractionResult::Transactions(txns) => print_transactions(txns),
    }

    if let Some(summary) = summary {
        print_summary(summary);
    }
    if let Some(trace) = trace {
        print_trace(trace);
    }
}

fn print_tasks(tasks: &[TaskRecord]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let width = tasks
        .iter()
        .map(|t| t.title.chars().count())
        .max()
        .unwrap_or(5)
        .max("Title".len());

    println!("  {:<width$}  {:<10}  Weight", "Title", "Due");
    println!("  {}", "-".repeat(width + 20));
    for t in tasks {
        let weight = t
            .weight
            .map(|w| format!("{}%", w.normalize()))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<width$}  {:<10}  {}",
            t.title,
            t.due.as_deref().unwrap_or("-"),
            weight
        );
    }
    println!("\n{} task(s)", tasks.len());
}

fn print_transactions(txns: &[TransactionRecord]) {
    if txns.is_empty() {
        println!("No transactions found.");
        return;
    }

    let width = txns
        .iter()
        .map(|t| t.description.chars().count())
        .max()
        .unwrap_or(11)
        .max("Description".len());

    println!("  {:<10}  {:<width$}  {:>12}", "Date", "Description", "Amount");
    println!("  {}", "-".repeat(width + 28));
    for t in txns {
        println!(
            "  {:<10}  {:<width$}  {:>12}",
            t.date,
            t.description,
            money(t.amount)
        );
    }
    println!("\n{} transaction(s)", txns.len());
}

fn print_summary(summary: &Summary) {
    println!("\nSummary:");
    println!("  Credits      {:>12}", money(summary.credits));
    println!("  Debits       {:>12}", money(summary.debits));
    println!("  Net outflow  {:>12}", money(summary.net_outflow));
    println!("  Runway       {:>12}", format!("{} days", summary.runway_days));

    if !summary.totals.is_empty() {
        println!("\n  By description:");
        for (description, total) in &summary.totals {
            println!("    {description}  {}", money(*total));
        }
    }
}

fn print_trace(trace: &ExtractionTrace) {
    println!(
        "\nTrace ({} accepted, {} duplicate, {} rejected):",
        trace.count(TraceOutcome::Accepted),
        trace.count(TraceOutcome::Duplicate),
        trace.count(TraceOutcome::Rejected)
    );
    for e in &trace.entries {
        let outcome = match e.outcome {
            TraceOutcome::Accepted => "accepted",
            TraceOutcome::Duplicate => "duplicate",
            TraceOutcome::Rejected => "rejected",
        };
        println!(
            "  {:<9} {:<34} @{:<6} {}",
            outcome,
            e.pattern_id,
            e.offset,
            e.matched_text.trim()
        );
        if let Some(ref reason) = e.reason {
            println!("            {reason}");
        }
        for note in &e.notes {
            println!("            note: {note}");
        }
    }
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
