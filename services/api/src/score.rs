use clap::Args;
use receipt_points::error::AppError;
use receipt_points::receipts::{
    Points, Receipt, ReceiptSubmission, ScoreBreakdown, ScoreComponent, ScoringEngine,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Receipt JSON file in the same shape accepted by POST /receipts/process
    pub(crate) file: PathBuf,
    /// Print the breakdown as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    retailer: &'a str,
    points: Points,
    components: &'a [ScoreComponent],
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;
    let (receipt, breakdown) = score_json(&raw)?;

    if args.json {
        let report = ScoreReport {
            retailer: &receipt.retailer,
            points: breakdown.total,
            components: &breakdown.components,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_breakdown(&receipt, &breakdown));
    }
    Ok(())
}

fn score_json(raw: &str) -> Result<(Receipt, ScoreBreakdown), AppError> {
    let submission: ReceiptSubmission = serde_json::from_str(raw)?;
    let receipt = Receipt::try_from(submission)?;
    let breakdown = ScoringEngine::new().breakdown(&receipt);
    Ok((receipt, breakdown))
}

fn render_breakdown(receipt: &Receipt, breakdown: &ScoreBreakdown) -> String {
    let mut out = format!(
        "Receipt from {} on {} at {}\n",
        receipt.retailer,
        receipt.purchase_date,
        receipt.purchase_time.format("%H:%M")
    );

    if breakdown.components.is_empty() {
        out.push_str("- no rules matched\n");
    }
    for component in &breakdown.components {
        out.push_str(&format!(
            "- {:>3} {}: {}\n",
            component.points,
            component.rule.label(),
            component.notes
        ));
    }
    out.push_str(&format!("Total: {} points\n", breakdown.total));
    out
}
